/// ShaderSystem - everything the shader subsystem keeps per graphics
/// context.
///
/// Owns the device, the configuration, the program cache, the render state
/// cache, the providers and the frame binder. There is one per context and it
/// is passed explicitly to whoever renders. `dispose` releases every program;
/// a plain drop assumes the context is going away with it.

use slotmap::{new_key_type, SlotMap};
use crate::camera::Camera;
use crate::config::ShaderConfig;
use crate::device::GraphicsDevice;
use crate::error::{protocol_violation, Result};
use crate::renderable::Renderable;
use super::binder::{BinderStats, RenderBinder};
use super::program_cache::ProgramCache;
use super::provider::{ContextEvent, ShaderProvider};
use super::render_context::RenderContext;
use super::template::ShaderTemplate;
use super::variant::{ShaderVariant, ShaderVariantKey};

new_key_type! {
    /// Stable key of a provider inside a ShaderSystem
    pub struct ShaderProviderKey;
}

/// A variant of a given provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle {
    pub provider: ShaderProviderKey,
    pub variant: ShaderVariantKey,
}

pub struct ShaderSystem<D: GraphicsDevice> {
    device: D,
    config: ShaderConfig,
    cache: ProgramCache,
    context: RenderContext,
    providers: SlotMap<ShaderProviderKey, ShaderProvider>,
    binder: RenderBinder,
    active: Option<ShaderHandle>,
}

impl<D: GraphicsDevice> ShaderSystem<D> {
    pub fn new(device: D, config: ShaderConfig) -> Self {
        let cache = ProgramCache::new(&config, &device);
        let texture_units = config.max_texture_units.min(device.max_texture_units());
        crate::engine_debug!("galaxy3d::ShaderSystem",
            "Shader system ready (cache {}, {} texture units)",
            if cache.is_enabled() { "on" } else { "off" }, texture_units);
        Self {
            device,
            config,
            cache,
            context: RenderContext::new(texture_units),
            providers: SlotMap::with_key(),
            binder: RenderBinder::new(),
            active: None,
        }
    }

    // ===== ACCESSORS =====

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn config(&self) -> &ShaderConfig {
        &self.config
    }

    pub fn cache(&self) -> &ProgramCache {
        &self.cache
    }

    pub fn render_context(&self) -> &RenderContext {
        &self.context
    }

    pub fn provider(&self, key: ShaderProviderKey) -> Option<&ShaderProvider> {
        self.providers.get(key)
    }

    pub fn variant(&self, handle: ShaderHandle) -> Option<&ShaderVariant> {
        self.providers.get(handle.provider)?.variant(handle.variant)
    }

    /// Pooled variants over every provider
    pub fn variant_count(&self) -> usize {
        self.providers.values().map(ShaderProvider::len).sum()
    }

    /// Counters of the current (or last) frame
    pub fn stats(&self) -> BinderStats {
        self.binder.stats()
    }

    pub fn active(&self) -> Option<ShaderHandle> {
        self.active
    }

    // ===== POOL =====

    pub fn add_provider(&mut self, template: ShaderTemplate) -> ShaderProviderKey {
        crate::engine_debug!("galaxy3d::ShaderSystem", "Provider '{}' added", template.name());
        self.providers.insert(ShaderProvider::new(template))
    }

    /// Pooled variant of `provider` for `renderable`, built on first request
    pub fn get_shader(&mut self, provider: ShaderProviderKey, renderable: &Renderable) -> Result<ShaderHandle> {
        let Some(pool) = self.providers.get_mut(provider) else {
            return Err(protocol_violation("galaxy3d::ShaderSystem",
                "get_shader on an unknown provider".to_string()));
        };
        let variant = pool.get_shader(&mut self.device, &self.cache, &self.config, renderable)?;
        Ok(ShaderHandle { provider, variant })
    }

    /// Dispose variants on a context event. An active frame is abandoned.
    pub fn handle_event(&mut self, event: ContextEvent) {
        crate::engine_info!("galaxy3d::ShaderSystem", "Context event {:?}", event);
        let device: Option<&mut dyn GraphicsDevice> = match event {
            ContextEvent::ClearShaders => Some(&mut self.device),
            ContextEvent::ContextLost => None,
        };
        self.binder.abort(device);
        self.active = None;
        for provider in self.providers.values_mut() {
            provider.handle_event(&mut self.device, event);
        }
        if event == ContextEvent::ContextLost {
            self.device.forget_programs();
        }
    }

    // ===== FRAME =====

    pub fn begin(&mut self, handle: ShaderHandle, camera: &Camera, time: f32) -> Result<()> {
        let Some(variant) = self.providers.get_mut(handle.provider).and_then(|p| p.variant_mut(handle.variant)) else {
            return Err(protocol_violation("galaxy3d::ShaderSystem",
                "begin with a disposed or unknown variant".to_string()));
        };
        self.binder.begin(&mut self.device, &mut self.context, variant, camera, time)?;
        self.active = Some(handle);
        Ok(())
    }

    pub fn render(&mut self, renderable: &Renderable) -> Result<()> {
        let variant = self
            .active
            .and_then(|handle| self.providers.get(handle.provider)?.variant(handle.variant));
        let Some(variant) = variant else {
            return Err(protocol_violation("galaxy3d::ShaderSystem",
                "render called outside begin/end".to_string()));
        };
        self.binder.render(&mut self.device, &mut self.context, &self.config, variant, renderable)
    }

    pub fn end(&mut self) -> Result<()> {
        let variant = self
            .active
            .take()
            .and_then(|handle| self.providers.get_mut(handle.provider)?.variant_mut(handle.variant));
        let Some(variant) = variant else {
            return Err(protocol_violation("galaxy3d::ShaderSystem",
                "end called without begin".to_string()));
        };
        self.binder.end(&mut self.device, variant)
    }

    /// Release every program and hand the device back
    pub fn dispose(mut self) -> D {
        self.binder.abort(Some(&mut self.device));
        self.active = None;
        for provider in self.providers.values_mut() {
            provider.clear_shaders(&mut self.device);
        }
        self.providers.clear();
        self.device
    }
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
