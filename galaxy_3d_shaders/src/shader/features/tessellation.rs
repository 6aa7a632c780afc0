/// Tessellated surfaces displaced by a height map. Only meaningful in
/// templates that carry tessellation control and evaluation stages.

use crate::attribute::{AttributeMask, AttributeType as T};
use crate::error::Result;
use crate::shader::prefix::{define, PrefixInput, ShaderFeature};
use crate::shader::uniform::{Uniform, UniformKind as K};
use crate::shader::uniform_registry::UniformRegistry;

#[derive(Debug, Default, Clone, Copy)]
pub struct TessellationFeature;

impl ShaderFeature for TessellationFeature {
    fn name(&self) -> &'static str {
        "tessellation"
    }

    fn implemented(&self) -> AttributeMask {
        AttributeMask::from_types(&[T::TESS_QUALITY, T::HEIGHT_SCALE])
    }

    fn write_prefix(&self, input: &PrefixInput<'_>, prefix: &mut String) {
        define(prefix, "tessellationFlag");
        if input.attributes.has(T::HEIGHT_TEXTURE) && input.attributes.has(T::HEIGHT_SCALE) {
            define(prefix, "heightFlag");
        }
    }

    fn register_uniforms(&self, _input: &PrefixInput<'_>, registry: &mut UniformRegistry) -> Result<()> {
        registry.register(
            Uniform::with_material("u_tessQuality", AttributeMask::of(T::TESS_QUALITY)),
            Some(K::Float(T::TESS_QUALITY)),
        )?;
        registry.register(
            Uniform::with_material("u_heightScale", AttributeMask::of(T::HEIGHT_SCALE)),
            Some(K::Float(T::HEIGHT_SCALE)),
        )?;
        Ok(())
    }
}
