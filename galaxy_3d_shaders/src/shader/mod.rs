//! Shader module: variant generation, uniform dispatch, program binary
//! cache, pooling and the per-frame binder.

pub mod features;
mod binder;
mod prefix;
mod program_cache;
mod provider;
mod render_context;
mod system;
mod template;
mod uniform;
mod uniform_registry;
mod variant;

pub use binder::{BinderStats, RenderBinder};
pub use prefix::{assemble_source, define, define_value, generate_prefix, PrefixInput, ShaderFeature};
pub use program_cache::{
    cache_file_name, content_hash, parse_cache_file_name,
    CompiledProgram, ProgramCache, StageSource, DEFAULT_PROGRAM_NAME,
};
pub use provider::{ContextEvent, ShaderProvider};
pub use render_context::{RenderContext, TextureBinder};
pub use system::{ShaderHandle, ShaderProviderKey, ShaderSystem};
pub use template::ShaderTemplate;
pub use uniform::{
    AtmosphereTerm, FrameInputs, ObjectInputs, Uniform, UniformInput, UniformKind, UniformScope,
};
pub use uniform_registry::{UniformId, UniformRegistry};
pub use variant::{ShaderVariant, ShaderVariantKey, VariantState, OPTIONAL_ATTRIBUTES};

#[cfg(test)]
pub(crate) mod test_fixtures;
