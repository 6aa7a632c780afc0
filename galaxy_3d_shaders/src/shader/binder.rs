/// RenderBinder - the `begin` / `render` / `end` protocol of one frame.
///
/// `begin` binds a variant's program and pushes its global uniforms once.
/// Each `render` binds the material when it differs from the previous one,
/// pushes the local uniforms, rebinds the mesh when it changed and draws.
/// `end` unbinds the mesh and the program.
///
/// Calling `render` or `end` outside a frame, or `begin` inside one, is a
/// protocol violation.

use crate::attribute::{AttributeSet, AttributeType, AttributeValue};
use crate::camera::Camera;
use crate::config::ShaderConfig;
use crate::device::{
    BlendFactor, GraphicsDevice, MeshId, ProgramHandle, UniformLocation, UniformValue,
};
use crate::error::{protocol_violation, Result};
use crate::renderable::Renderable;
use super::render_context::RenderContext;
use super::uniform::{FrameInputs, ObjectInputs, UniformInput};
use super::variant::{ShaderVariant, VariantState};

/// Counters of the current (or last) frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinderStats {
    pub draws: u32,
    pub material_binds: u32,
    pub mesh_binds: u32,
    /// Objects skipped because of a degenerate transform or a variant that
    /// cannot render them
    pub skipped: u32,
}

/// Tags that drive fixed-function state. The environment may carry them
/// too, so they take part in the material comparison.
const STATE_TAGS: [AttributeType; 4] = [
    AttributeType::BLENDING,
    AttributeType::CULL_FACE,
    AttributeType::DEPTH_TEST,
    AttributeType::ALPHA_TEST,
];

/// What decides whether a material has to be bound again
#[derive(Debug, Clone, PartialEq)]
struct MaterialState {
    material: AttributeSet,
    environment: AttributeSet,
}

impl MaterialState {
    fn of(renderable: &Renderable) -> Self {
        let environment = renderable
            .environment
            .iter()
            .flat_map(AttributeSet::iter)
            .filter(|attribute| STATE_TAGS.contains(&attribute.ty()))
            .cloned()
            .collect();
        Self { material: renderable.material.clone(), environment }
    }
}

#[derive(Debug)]
struct Frame {
    program: ProgramHandle,
    camera: Camera,
    time: f32,
    last_material: Option<MaterialState>,
    last_mesh: Option<MeshId>,
}

#[derive(Debug, Default)]
pub struct RenderBinder {
    frame: Option<Frame>,
    stats: BinderStats,
}

impl RenderBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.frame.is_some()
    }

    pub fn stats(&self) -> BinderStats {
        self.stats
    }

    /// Start a frame with `variant`
    pub fn begin(
        &mut self,
        device: &mut dyn GraphicsDevice,
        context: &mut RenderContext,
        variant: &mut ShaderVariant,
        camera: &Camera,
        time: f32,
    ) -> Result<()> {
        if self.frame.is_some() {
            return Err(protocol_violation("galaxy3d::RenderBinder",
                format!("begin('{}') called inside an active frame", variant.name())));
        }
        if variant.state() == VariantState::Disposed {
            return Err(protocol_violation("galaxy3d::RenderBinder",
                format!("begin('{}') on a disposed variant", variant.name())));
        }

        context.begin();
        device.use_program(Some(variant.program()));

        let frame = FrameInputs { camera, time };
        let registry = variant.registry();
        for &id in registry.global_ids() {
            let (Some(kind), Some(location)) = (registry.kind(id), registry.location(id)) else {
                continue;
            };
            if let Some(input) = kind.resolve(&frame, None) {
                apply(device, context, location, input);
            }
        }

        variant.set_state(VariantState::Active);
        self.stats = BinderStats::default();
        self.frame = Some(Frame {
            program: variant.program(),
            camera: camera.clone(),
            time,
            last_material: None,
            last_mesh: None,
        });
        Ok(())
    }

    /// Draw one object with the active variant
    pub fn render(
        &mut self,
        device: &mut dyn GraphicsDevice,
        context: &mut RenderContext,
        config: &ShaderConfig,
        variant: &ShaderVariant,
        renderable: &Renderable,
    ) -> Result<()> {
        let Some(frame) = self.frame.as_mut() else {
            return Err(protocol_violation("galaxy3d::RenderBinder",
                "render called outside begin/end".to_string()));
        };
        if frame.program != variant.program() || variant.state() != VariantState::Active {
            return Err(protocol_violation("galaxy3d::RenderBinder",
                format!("render with '{}', which is not the active variant", variant.name())));
        }

        if renderable.is_degenerate() {
            self.stats.skipped += 1;
            return Ok(());
        }
        if !variant.can_render(renderable) {
            crate::engine_warn!("galaxy3d::RenderBinder",
                "Variant '{}' cannot render mesh {}, skipped", variant.name(), renderable.mesh_part.mesh.0);
            self.stats.skipped += 1;
            return Ok(());
        }

        let attributes = renderable.combined_attributes();

        let state = MaterialState::of(renderable);
        if frame.last_material.as_ref() != Some(&state) {
            bind_material(device, context, config, variant, &attributes);
            frame.last_material = Some(state);
            self.stats.material_binds += 1;
        }

        let inputs = FrameInputs { camera: &frame.camera, time: frame.time };
        let object = ObjectInputs { renderable, attributes: &attributes };
        let registry = variant.registry();
        for &id in registry.local_ids() {
            let (Some(kind), Some(location)) = (registry.kind(id), registry.location(id)) else {
                continue;
            };
            if let Some(input) = kind.resolve(&inputs, Some(&object)) {
                apply(device, context, location, input);
            }
        }

        let part = &renderable.mesh_part;
        if frame.last_mesh != Some(part.mesh) {
            if let Some(previous) = frame.last_mesh.take() {
                device.unbind_mesh(previous, variant.attribute_locations());
            }
            device.bind_mesh(part.mesh, &part.layout, variant.attribute_locations())?;
            frame.last_mesh = Some(part.mesh);
            self.stats.mesh_binds += 1;
        }

        device.draw(part)?;
        self.stats.draws += 1;
        Ok(())
    }

    /// Close the frame
    pub fn end(&mut self, device: &mut dyn GraphicsDevice, variant: &mut ShaderVariant) -> Result<()> {
        let Some(frame) = self.frame.take() else {
            return Err(protocol_violation("galaxy3d::RenderBinder",
                "end called without begin".to_string()));
        };
        if let Some(mesh) = frame.last_mesh {
            device.unbind_mesh(mesh, variant.attribute_locations());
        }
        device.use_program(None);
        variant.set_state(VariantState::Idle);
        Ok(())
    }

    /// Drop the current frame without touching its variant, which may
    /// already be gone
    pub fn abort(&mut self, device: Option<&mut dyn GraphicsDevice>) {
        if self.frame.take().is_some() {
            if let Some(device) = device {
                device.use_program(None);
            }
            crate::engine_debug!("galaxy3d::RenderBinder", "Frame aborted");
        }
    }
}

fn apply(device: &mut dyn GraphicsDevice, context: &mut RenderContext, location: UniformLocation, input: UniformInput) {
    match input {
        UniformInput::Value(value) => device.set_uniform(location, value),
        UniformInput::Texture(texture) => {
            let unit = context.bind_texture(device, texture);
            device.set_uniform(location, UniformValue::Int(unit as i32));
        }
    }
}

/// Blending, culling, depth and alpha test of one material
fn bind_material(
    device: &mut dyn GraphicsDevice,
    context: &mut RenderContext,
    config: &ShaderConfig,
    variant: &ShaderVariant,
    attributes: &AttributeSet,
) {
    let registry = variant.registry();

    match attributes.value(AttributeType::BLENDING) {
        Some(AttributeValue::Blending(blend)) => {
            context.set_blending(device, true, blend.source, blend.destination);
            if let Some(location) = registry.location_of("u_opacity") {
                device.set_uniform(location, UniformValue::Float(blend.opacity));
            }
        }
        _ => context.set_blending(device, false, BlendFactor::One, BlendFactor::Zero),
    }

    let cull = match attributes.value(AttributeType::CULL_FACE) {
        Some(AttributeValue::CullFace(mode)) => *mode,
        _ => config.default_cull_face,
    };
    context.set_cull_face(device, cull);

    let (func, near, far, mask) = match attributes.value(AttributeType::DEPTH_TEST) {
        Some(AttributeValue::DepthTest(depth)) => (depth.func, depth.near, depth.far, depth.mask),
        _ => (Some(config.default_depth_func), 0.0, 1.0, true),
    };
    context.set_depth_test(device, func, near, far);
    context.set_depth_mask(device, mask);

    if let Some(threshold) = attributes.value(AttributeType::ALPHA_TEST).and_then(AttributeValue::as_float) {
        if let Some(location) = registry.location_of("u_alphaTest") {
            device.set_uniform(location, UniformValue::Float(threshold));
        }
    }
}

#[cfg(test)]
#[path = "binder_tests.rs"]
mod tests;
