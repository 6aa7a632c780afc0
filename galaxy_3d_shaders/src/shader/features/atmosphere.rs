/// Atmospheric scattering seen from the ground of a planet.

use crate::attribute::{AttributeMask, AttributeType as T};
use crate::error::Result;
use crate::shader::prefix::{define, PrefixInput, ShaderFeature};
use crate::shader::uniform::{AtmosphereTerm, Uniform, UniformKind};
use crate::shader::uniform_registry::UniformRegistry;

const UNIFORMS: [(&str, AtmosphereTerm); 19] = [
    ("fAlpha", AtmosphereTerm::Alpha),
    ("fCameraHeight", AtmosphereTerm::CameraHeight),
    ("fCameraHeight2", AtmosphereTerm::CameraHeight2),
    ("fInnerRadius", AtmosphereTerm::InnerRadius),
    ("fInnerRadius2", AtmosphereTerm::InnerRadius2),
    ("fOuterRadius", AtmosphereTerm::OuterRadius),
    ("fOuterRadius2", AtmosphereTerm::OuterRadius2),
    ("fKrESun", AtmosphereTerm::KrESun),
    ("fKmESun", AtmosphereTerm::KmESun),
    ("fKr4PI", AtmosphereTerm::Kr4Pi),
    ("fKm4PI", AtmosphereTerm::Km4Pi),
    ("fScale", AtmosphereTerm::Scale),
    ("fScaleDepth", AtmosphereTerm::ScaleDepth),
    ("fScaleOverScaleDepth", AtmosphereTerm::ScaleOverScaleDepth),
    ("g", AtmosphereTerm::G),
    ("nSamples", AtmosphereTerm::Samples),
    ("v3PlanetPos", AtmosphereTerm::PlanetPos),
    ("v3LightPos", AtmosphereTerm::LightPos),
    ("v3InvWavelength", AtmosphereTerm::InvWavelength),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct AtmosphereGroundFeature;

impl ShaderFeature for AtmosphereGroundFeature {
    fn name(&self) -> &'static str {
        "atmosphere-ground"
    }

    fn implemented(&self) -> AttributeMask {
        AttributeMask::of(T::ATMOSPHERE)
    }

    fn write_prefix(&self, input: &PrefixInput<'_>, prefix: &mut String) {
        if input.attributes.has(T::ATMOSPHERE) {
            define(prefix, "atmosphereGround");
        }
    }

    fn register_uniforms(&self, _input: &PrefixInput<'_>, registry: &mut UniformRegistry) -> Result<()> {
        let mask = AttributeMask::of(T::ATMOSPHERE);
        for (alias, term) in UNIFORMS {
            registry.register(Uniform::with_material(alias, mask), Some(UniformKind::Atmosphere(term)))?;
        }
        Ok(())
    }
}
