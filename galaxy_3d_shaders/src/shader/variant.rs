/// ShaderVariant - one compiled specialisation of a template.
///
/// A variant is identified by the exact attribute mask and vertex mask of the
/// renderable it was built for. It owns its GPU program and its uniform
/// registry; attribute locations follow the vertex layout order.

use slotmap::new_key_type;
use crate::attribute::{AttributeMask, AttributeType};
use crate::config::ShaderConfig;
use crate::device::{GraphicsDevice, ProgramHandle};
use crate::error::{Error, Result};
use crate::renderable::Renderable;
use super::prefix::PrefixInput;
use super::program_cache::ProgramCache;
use super::template::ShaderTemplate;
use super::uniform_registry::UniformRegistry;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key of a variant inside its provider's pool
    pub struct ShaderVariantKey;
}

/// Attributes a variant tolerates without being built for them
pub const OPTIONAL_ATTRIBUTES: AttributeMask = AttributeMask::from_bits(
    AttributeMask::of(AttributeType::CULL_FACE).bits() | AttributeMask::of(AttributeType::DEPTH_TEST).bits(),
);

/// Variant lifecycle
///
/// ```text
/// Compiled -> Idle <-> Active
///     \         \        \
///      +---------+--------+--> Disposed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantState {
    /// Program linked, registry initialized, not yet handed out
    Compiled,
    /// Pooled, not bound
    Idle,
    /// Bound between `begin` and `end`
    Active,
    /// Program released; the variant must not be used again
    Disposed,
}

#[derive(Debug)]
pub struct ShaderVariant {
    name: String,
    attribute_mask: AttributeMask,
    vertex_mask: u64,
    lighting: bool,
    prefix: String,
    program: ProgramHandle,
    from_cache: bool,
    registry: UniformRegistry,
    attribute_locations: Vec<Option<u32>>,
    state: VariantState,
}

impl ShaderVariant {
    /// Specialise `template` for `renderable`, compile it (or load it from
    /// the cache) and resolve its uniforms.
    ///
    /// # Errors
    ///
    /// - `UnimplementedAttribute` in strict mode
    /// - `CompileError` / `LinkError` from the compiler
    /// - `MissingUniform` in pedantic mode
    pub fn build(
        template: &ShaderTemplate,
        device: &mut dyn GraphicsDevice,
        cache: &ProgramCache,
        config: &ShaderConfig,
        renderable: &Renderable,
    ) -> Result<Self> {
        let combined_mask = renderable.combined_mask();
        let unsupported = combined_mask.difference(template.implemented() | OPTIONAL_ATTRIBUTES);
        if !unsupported.is_empty() {
            if config.strict {
                crate::engine_error!("galaxy3d::ShaderVariant",
                    "Template '{}' does not implement {:?}", template.name(), unsupported);
                return Err(Error::UnimplementedAttribute {
                    name: template.name().to_string(),
                    unsupported,
                });
            }
            crate::engine_warn!("galaxy3d::ShaderVariant",
                "Template '{}' ignores unimplemented attributes {:?}", template.name(), unsupported);
        }

        let attributes = renderable.combined_attributes();
        let input = PrefixInput::new(renderable, &attributes, config);
        let prefix = template.prefix(&input);
        let sources = template.assemble(&prefix);
        let compiled = cache.compile(device, Some(template.name()), &sources)?;

        let mut registry = UniformRegistry::new();
        let mut initialized = template.register_uniforms(&input, &mut registry);
        if initialized.is_ok() {
            initialized = registry.init(device, compiled.program, renderable, config.pedantic, template.name());
        }
        if let Err(e) = initialized {
            device.delete_program(compiled.program);
            return Err(e);
        }

        let attribute_locations = renderable
            .vertex_layout()
            .attributes()
            .iter()
            .map(|attribute| device.attribute_location(compiled.program, &attribute.alias))
            .collect();

        Ok(Self {
            name: template.name().to_string(),
            attribute_mask: combined_mask | OPTIONAL_ATTRIBUTES,
            vertex_mask: renderable.vertex_mask(),
            lighting: renderable.has_lighting(),
            prefix,
            program: compiled.program,
            from_cache: compiled.from_cache,
            registry,
            attribute_locations,
            state: VariantState::Compiled,
        })
    }

    /// Whether this variant was built for exactly what `renderable` needs
    pub fn can_render(&self, renderable: &Renderable) -> bool {
        self.state != VariantState::Disposed
            && (renderable.combined_mask() | OPTIONAL_ATTRIBUTES) == self.attribute_mask
            && renderable.vertex_mask() == self.vertex_mask
            && renderable.has_lighting() == self.lighting
    }

    /// Release the program. Pass `None` when the context is already gone.
    pub fn dispose(&mut self, device: Option<&mut dyn GraphicsDevice>) {
        if self.state == VariantState::Disposed {
            return;
        }
        if let Some(device) = device {
            device.delete_program(self.program);
        }
        self.state = VariantState::Disposed;
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Combined mask it was built for, optional attributes included
    pub fn attribute_mask(&self) -> AttributeMask {
        self.attribute_mask
    }

    pub fn vertex_mask(&self) -> u64 {
        self.vertex_mask
    }

    pub fn lighting(&self) -> bool {
        self.lighting
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Loaded from a cached binary rather than compiled
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    pub fn registry(&self) -> &UniformRegistry {
        &self.registry
    }

    /// Vertex attribute locations, in vertex layout order
    pub fn attribute_locations(&self) -> &[Option<u32>] {
        &self.attribute_locations
    }

    pub fn state(&self) -> VariantState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: VariantState) {
        if self.state != VariantState::Disposed {
            self.state = state;
        }
    }
}
