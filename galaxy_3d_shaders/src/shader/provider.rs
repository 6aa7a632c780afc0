/// ShaderProvider - pool of variants of one template.
///
/// Lookup walks the pool in insertion order and returns the first variant
/// whose `can_render` holds; at most one can match because a variant is only
/// built when none does.

use slotmap::SlotMap;
use crate::config::ShaderConfig;
use crate::device::GraphicsDevice;
use crate::error::Result;
use crate::renderable::Renderable;
use super::program_cache::ProgramCache;
use super::template::ShaderTemplate;
use super::variant::{ShaderVariant, ShaderVariantKey, VariantState};

/// Context events the pool reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextEvent {
    /// Drop every variant and release its program
    ClearShaders,
    /// The context died with its objects: drop every variant without
    /// touching the device
    ContextLost,
}

#[derive(Debug)]
pub struct ShaderProvider {
    template: ShaderTemplate,
    variants: SlotMap<ShaderVariantKey, ShaderVariant>,
    /// Insertion order, scanned by `find`
    order: Vec<ShaderVariantKey>,
}

impl ShaderProvider {
    pub fn new(template: ShaderTemplate) -> Self {
        Self {
            template,
            variants: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn template(&self) -> &ShaderTemplate {
        &self.template
    }

    /// Pooled variant able to render `renderable`, if any
    pub fn find(&self, renderable: &Renderable) -> Option<ShaderVariantKey> {
        self.order
            .iter()
            .copied()
            .find(|&key| self.variants.get(key).is_some_and(|v| v.can_render(renderable)))
    }

    /// Pooled variant for `renderable`, built and pooled on first request
    pub fn get_shader(
        &mut self,
        device: &mut dyn GraphicsDevice,
        cache: &ProgramCache,
        config: &ShaderConfig,
        renderable: &Renderable,
    ) -> Result<ShaderVariantKey> {
        let key = match self.find(renderable) {
            Some(key) => key,
            None => {
                let variant = ShaderVariant::build(&self.template, device, cache, config, renderable)?;
                let key = self.variants.insert(variant);
                self.order.push(key);
                crate::engine_info!("galaxy3d::ShaderProvider",
                    "New '{}' variant, {} in pool", self.template.name(), self.order.len());
                key
            }
        };

        if let Some(variant) = self.variants.get_mut(key) {
            if variant.state() == VariantState::Compiled {
                variant.set_state(VariantState::Idle);
            }
        }
        Ok(key)
    }

    pub fn variant(&self, key: ShaderVariantKey) -> Option<&ShaderVariant> {
        self.variants.get(key)
    }

    pub fn variant_mut(&mut self, key: ShaderVariantKey) -> Option<&mut ShaderVariant> {
        self.variants.get_mut(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> &[ShaderVariantKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Dispose every variant and empty the pool
    pub fn clear_shaders(&mut self, device: &mut dyn GraphicsDevice) {
        let count = self.order.len();
        for (_, mut variant) in self.variants.drain() {
            variant.dispose(Some(&mut *device));
        }
        self.order.clear();
        crate::engine_info!("galaxy3d::ShaderProvider",
            "Cleared {} '{}' variants", count, self.template.name());
    }

    pub fn handle_event(&mut self, device: &mut dyn GraphicsDevice, event: ContextEvent) {
        match event {
            ContextEvent::ClearShaders => self.clear_shaders(device),
            ContextEvent::ContextLost => {
                let count = self.order.len();
                for (_, mut variant) in self.variants.drain() {
                    variant.dispose(None);
                }
                self.order.clear();
                crate::engine_info!("galaxy3d::ShaderProvider",
                    "Context lost, forgot {} '{}' variants", count, self.template.name());
            }
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
