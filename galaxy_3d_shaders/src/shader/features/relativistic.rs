/// Relativistic aberration and gravitational wave distortion of vertices.

use crate::attribute::{AttributeMask, AttributeType as T};
use crate::error::Result;
use crate::shader::prefix::{define, PrefixInput, ShaderFeature};
use crate::shader::uniform::{Uniform, UniformKind as K};
use crate::shader::uniform_registry::UniformRegistry;

#[derive(Debug, Default, Clone, Copy)]
pub struct RelativisticFeature;

impl ShaderFeature for RelativisticFeature {
    fn name(&self) -> &'static str {
        "relativistic"
    }

    fn implemented(&self) -> AttributeMask {
        AttributeMask::from_types(&[T::RELATIVISTIC, T::GRAVITATIONAL_WAVE])
    }

    fn write_prefix(&self, input: &PrefixInput<'_>, prefix: &mut String) {
        if input.attributes.has(T::RELATIVISTIC) {
            define(prefix, "relativisticEffects");
        }
        if input.attributes.has(T::GRAVITATIONAL_WAVE) {
            define(prefix, "gravitationalWaves");
        }
    }

    fn register_uniforms(&self, _input: &PrefixInput<'_>, registry: &mut UniformRegistry) -> Result<()> {
        let relativistic = AttributeMask::of(T::RELATIVISTIC);
        registry.register(Uniform::with_overall("u_velDir", relativistic), Some(K::VelocityDir))?;
        registry.register(Uniform::with_overall("u_vc", relativistic), Some(K::Vc))?;

        let wave = AttributeMask::of(T::GRAVITATIONAL_WAVE);
        registry.register(Uniform::with_overall("u_gw", wave), Some(K::Gw))?;
        registry.register(Uniform::with_overall("u_gwmat3", wave), Some(K::GwMat3))?;
        registry.register(Uniform::with_overall("u_ts", wave), Some(K::Ts))?;
        registry.register(Uniform::with_overall("u_omgw", wave), Some(K::Omgw))?;
        registry.register(Uniform::with_overall("u_hterms", wave), Some(K::Hterms))?;
        Ok(())
    }
}
