/// RenderContext - fixed-function state cache and texture unit binder.
///
/// Only changes reach the device. `begin` forgets everything, so the first
/// request of a frame always goes through: something outside this subsystem
/// may have touched the context between frames.

use crate::device::{BlendFactor, CompareOp, CullMode, GraphicsDevice, TextureHandle};

// ============================================================================
// Texture binder
// ============================================================================

/// Least-recently-used texture unit allocator
///
/// A reused texture becomes the most recent one, so a sampler set for it
/// stays valid while later textures of the same object are bound.
#[derive(Debug, Clone)]
pub struct TextureBinder {
    units: Vec<Option<TextureHandle>>,
    /// Use stamp of each unit, 0 for never used
    last_used: Vec<u64>,
    clock: u64,
    binds: u32,
    reuses: u32,
}

impl TextureBinder {
    pub fn new(unit_count: u32) -> Self {
        let count = unit_count.max(1) as usize;
        Self {
            units: vec![None; count],
            last_used: vec![0; count],
            clock: 0,
            binds: 0,
            reuses: 0,
        }
    }

    /// Unit holding `texture`, binding it to the least recently used unit
    /// if needed
    pub fn bind(&mut self, device: &mut dyn GraphicsDevice, texture: TextureHandle) -> u32 {
        self.clock += 1;
        if let Some(unit) = self.units.iter().position(|bound| *bound == Some(texture)) {
            self.last_used[unit] = self.clock;
            self.reuses += 1;
            return unit as u32;
        }
        let unit = self.least_recently_used();
        self.units[unit] = Some(texture);
        self.last_used[unit] = self.clock;
        self.binds += 1;
        device.bind_texture(unit as u32, texture);
        unit as u32
    }

    /// Lowest free unit, otherwise the one with the oldest stamp
    fn least_recently_used(&self) -> usize {
        self.last_used
            .iter()
            .enumerate()
            .min_by_key(|&(unit, stamp)| (*stamp, unit))
            .map(|(unit, _)| unit)
            .unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.units.iter_mut().for_each(|unit| *unit = None);
        self.last_used.iter_mut().for_each(|stamp| *stamp = 0);
        self.clock = 0;
        self.binds = 0;
        self.reuses = 0;
    }

    pub fn unit_count(&self) -> u32 {
        self.units.len() as u32
    }

    /// Device binds since the last reset
    pub fn binds(&self) -> u32 {
        self.binds
    }

    /// Requests served by an already bound unit since the last reset
    pub fn reuses(&self) -> u32 {
        self.reuses
    }
}

// ============================================================================
// Render context
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct DepthTest {
    func: Option<CompareOp>,
    near: f32,
    far: f32,
}

#[derive(Debug, Clone)]
pub struct RenderContext {
    blending: Option<(bool, BlendFactor, BlendFactor)>,
    cull_face: Option<CullMode>,
    depth_test: Option<DepthTest>,
    depth_mask: Option<bool>,
    textures: TextureBinder,
}

impl RenderContext {
    pub fn new(texture_units: u32) -> Self {
        Self {
            blending: None,
            cull_face: None,
            depth_test: None,
            depth_mask: None,
            textures: TextureBinder::new(texture_units),
        }
    }

    /// Forget cached state; called at the start of every frame
    pub fn begin(&mut self) {
        self.blending = None;
        self.cull_face = None;
        self.depth_test = None;
        self.depth_mask = None;
        self.textures.reset();
    }

    pub fn set_blending(
        &mut self,
        device: &mut dyn GraphicsDevice,
        enabled: bool,
        source: BlendFactor,
        destination: BlendFactor,
    ) {
        let unchanged = match self.blending {
            // Factors are irrelevant while blending stays off
            Some((false, _, _)) => !enabled,
            Some(current) => current == (enabled, source, destination),
            None => false,
        };
        if !unchanged {
            device.set_blending(enabled, source, destination);
            self.blending = Some((enabled, source, destination));
        }
    }

    pub fn set_cull_face(&mut self, device: &mut dyn GraphicsDevice, mode: CullMode) {
        if self.cull_face != Some(mode) {
            device.set_cull_face(mode);
            self.cull_face = Some(mode);
        }
    }

    /// `None` disables the depth test
    pub fn set_depth_test(&mut self, device: &mut dyn GraphicsDevice, func: Option<CompareOp>, near: f32, far: f32) {
        let state = DepthTest { func, near, far };
        if self.depth_test != Some(state) {
            device.set_depth_test(func, near, far);
            self.depth_test = Some(state);
        }
    }

    pub fn set_depth_mask(&mut self, device: &mut dyn GraphicsDevice, mask: bool) {
        if self.depth_mask != Some(mask) {
            device.set_depth_mask(mask);
            self.depth_mask = Some(mask);
        }
    }

    /// Texture unit now holding `texture`
    pub fn bind_texture(&mut self, device: &mut dyn GraphicsDevice, texture: TextureHandle) -> u32 {
        self.textures.bind(device, texture)
    }

    pub fn textures(&self) -> &TextureBinder {
        &self.textures
    }
}

#[cfg(test)]
#[path = "render_context_tests.rs"]
mod tests;
