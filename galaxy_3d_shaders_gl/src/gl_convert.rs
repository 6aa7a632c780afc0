/// Pure conversions from device types to GL enums

use galaxy_3d_shaders::galaxy3d::device::{BlendFactor, CompareOp, CullMode, PrimitiveTopology, ShaderStage};
use galaxy_3d_shaders::galaxy3d::renderable::{VertexAttributeDesc, VertexUsage};

pub(crate) fn stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
        ShaderStage::TessEvaluation => glow::TESS_EVALUATION_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub(crate) fn blend_factor_to_gl(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
    }
}

pub(crate) fn compare_op_to_gl(op: CompareOp) -> u32 {
    match op {
        CompareOp::Never => glow::NEVER,
        CompareOp::Less => glow::LESS,
        CompareOp::Equal => glow::EQUAL,
        CompareOp::LessOrEqual => glow::LEQUAL,
        CompareOp::Greater => glow::GREATER,
        CompareOp::NotEqual => glow::NOTEQUAL,
        CompareOp::GreaterOrEqual => glow::GEQUAL,
        CompareOp::Always => glow::ALWAYS,
    }
}

/// Face to cull, `None` when culling is disabled
pub(crate) fn cull_mode_to_gl(mode: CullMode) -> Option<u32> {
    match mode {
        CullMode::None => None,
        CullMode::Front => Some(glow::FRONT),
        CullMode::Back => Some(glow::BACK),
    }
}

pub(crate) fn topology_to_gl(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::TriangleList => glow::TRIANGLES,
        PrimitiveTopology::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveTopology::LineList => glow::LINES,
        PrimitiveTopology::PointList => glow::POINTS,
        PrimitiveTopology::Patches => glow::PATCHES,
    }
}

/// `(size, type, normalized)` for `glVertexAttribPointer`
pub(crate) fn vertex_attribute_format(attribute: &VertexAttributeDesc) -> (i32, u32, bool) {
    if attribute.usage == VertexUsage::COLOR_PACKED {
        (4, glow::UNSIGNED_BYTE, true)
    } else {
        (attribute.components as i32, glow::FLOAT, false)
    }
}

/// `glGetProgramBinary` is core since GL 4.1 and GLES 3.0; it is only worth
/// using when the driver exposes at least one binary format
pub(crate) fn program_binary_available(major: u32, minor: u32, embedded: bool, formats: i32) -> bool {
    let core = if embedded { major >= 3 } else { (major, minor) >= (4, 1) };
    core && formats > 0
}

#[cfg(test)]
#[path = "gl_convert_tests.rs"]
mod tests;
