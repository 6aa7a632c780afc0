/// Handles, stages and fixed-function state enums shared by every backend

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

// ===== HANDLES =====

/// Linked GPU program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Compiled shader stage object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageHandle(pub u32);

/// Texture registered with the device by the asset layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Mesh registered with the device by the asset layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Location of a uniform inside the currently used program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

// ===== SHADER STAGES =====

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Tessellation control shader
    TessControl,
    /// Tessellation evaluation shader
    TessEvaluation,
    /// Geometry shader
    Geometry,
    /// Fragment/Pixel shader
    Fragment,
}

impl ShaderStage {
    /// Pipeline order; stage sources are hashed and compiled in this order
    pub const ALL: [ShaderStage; 5] = [
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
    ];

    /// Human-readable stage name used in compile logs
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex shader",
            ShaderStage::TessControl => "Tessellation control shader",
            ShaderStage::TessEvaluation => "Tessellation evaluation shader",
            ShaderStage::Geometry => "Geometry shader",
            ShaderStage::Fragment => "Fragment shader",
        }
    }

    pub fn order(self) -> usize {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::TessControl => 1,
            ShaderStage::TessEvaluation => 2,
            ShaderStage::Geometry => 3,
            ShaderStage::Fragment => 4,
        }
    }
}

/// Opaque driver-specific program binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramBinary {
    /// Driver binary format enum (`GL_PROGRAM_BINARY_FORMAT`)
    pub format: u32,
    pub data: Vec<u8>,
}

// ===== PRIMITIVES =====

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    LineList,
    PointList,
    /// Tessellation patches
    Patches,
}

// ===== RASTERIZATION / DEPTH / BLEND =====

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Comparison operator for the depth test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Blend factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

// ===== UNIFORM VALUES =====

/// Value pushed to a uniform location
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}
