/// Render attributes: a type tag plus a typed payload.
///
/// Tags `0..64` describe the material, tags `64..128` the environment
/// (lights, fog, shadows, relativistic effects). A tag appears at most once
/// in an `AttributeSet`.

use glam::{Mat3, Mat4, Vec3, Vec4};
use crate::device::{BlendFactor, CompareOp, CullMode, TextureHandle};

// ===== ATTRIBUTE TYPE =====

/// Attribute type tag (bit index in an `AttributeMask`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeType(u8);

impl AttributeType {
    /// Number of available tags (mask width)
    pub const COUNT: usize = 128;

    /// First environment tag
    pub const FIRST_ENVIRONMENT: u8 = 64;

    // Material colors
    pub const DIFFUSE_COLOR: AttributeType = AttributeType(0);
    pub const SPECULAR_COLOR: AttributeType = AttributeType(1);
    pub const EMISSIVE_COLOR: AttributeType = AttributeType(2);
    pub const METALLIC_COLOR: AttributeType = AttributeType(3);
    pub const ROUGHNESS_COLOR: AttributeType = AttributeType(4);

    // Material textures
    pub const DIFFUSE_TEXTURE: AttributeType = AttributeType(8);
    pub const SPECULAR_TEXTURE: AttributeType = AttributeType(9);
    pub const NORMAL_TEXTURE: AttributeType = AttributeType(10);
    pub const EMISSIVE_TEXTURE: AttributeType = AttributeType(11);
    pub const METALLIC_TEXTURE: AttributeType = AttributeType(12);
    pub const ROUGHNESS_TEXTURE: AttributeType = AttributeType(13);
    pub const HEIGHT_TEXTURE: AttributeType = AttributeType(14);
    pub const AO_TEXTURE: AttributeType = AttributeType(15);

    // Material state and scalars
    pub const BLENDING: AttributeType = AttributeType(20);
    pub const CULL_FACE: AttributeType = AttributeType(21);
    pub const DEPTH_TEST: AttributeType = AttributeType(22);
    pub const ALPHA_TEST: AttributeType = AttributeType(23);
    pub const SHININESS: AttributeType = AttributeType(24);
    pub const HEIGHT_SCALE: AttributeType = AttributeType(25);
    pub const TESS_QUALITY: AttributeType = AttributeType(26);

    // Material cubemaps
    pub const REFLECTION_CUBEMAP: AttributeType = AttributeType(30);
    pub const DIFFUSE_CUBEMAP: AttributeType = AttributeType(31);
    pub const NORMAL_CUBEMAP: AttributeType = AttributeType(32);
    pub const SPECULAR_CUBEMAP: AttributeType = AttributeType(33);

    pub const ATMOSPHERE: AttributeType = AttributeType(40);

    // Environment
    pub const FOG_COLOR: AttributeType = AttributeType(64);
    pub const DIRECTIONAL_LIGHTS: AttributeType = AttributeType(65);
    pub const POINT_LIGHTS: AttributeType = AttributeType(66);
    pub const SHADOW_MAP: AttributeType = AttributeType(67);
    pub const TIME: AttributeType = AttributeType(68);
    pub const PREV_PROJ_VIEW: AttributeType = AttributeType(69);
    pub const ECLIPSING_BODY: AttributeType = AttributeType(70);
    pub const RELATIVISTIC: AttributeType = AttributeType(80);
    pub const GRAVITATIONAL_WAVE: AttributeType = AttributeType(81);

    /// Build a tag from its raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 128`.
    pub const fn new(index: u8) -> Self {
        assert!((index as usize) < Self::COUNT, "attribute type index out of range");
        Self(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn is_environment(self) -> bool {
        self.0 >= Self::FIRST_ENVIRONMENT
    }

    /// Name used in `#define <alias>Flag` lines and diagnostics
    pub fn alias(self) -> &'static str {
        match self {
            Self::DIFFUSE_COLOR => "diffuseColor",
            Self::SPECULAR_COLOR => "specularColor",
            Self::EMISSIVE_COLOR => "emissiveColor",
            Self::METALLIC_COLOR => "metallicColor",
            Self::ROUGHNESS_COLOR => "roughnessColor",
            Self::DIFFUSE_TEXTURE => "diffuseTexture",
            Self::SPECULAR_TEXTURE => "specularTexture",
            Self::NORMAL_TEXTURE => "normalTexture",
            Self::EMISSIVE_TEXTURE => "emissiveTexture",
            Self::METALLIC_TEXTURE => "metallicTexture",
            Self::ROUGHNESS_TEXTURE => "roughnessTexture",
            Self::HEIGHT_TEXTURE => "heightTexture",
            Self::AO_TEXTURE => "aoTexture",
            Self::BLENDING => "blended",
            Self::CULL_FACE => "cullface",
            Self::DEPTH_TEST => "depthStencil",
            Self::ALPHA_TEST => "alphaTest",
            Self::SHININESS => "shininess",
            Self::HEIGHT_SCALE => "heightScale",
            Self::TESS_QUALITY => "tessQuality",
            Self::REFLECTION_CUBEMAP => "reflectionCubemap",
            Self::DIFFUSE_CUBEMAP => "diffuseCubemap",
            Self::NORMAL_CUBEMAP => "normalCubemap",
            Self::SPECULAR_CUBEMAP => "specularCubemap",
            Self::ATMOSPHERE => "atmosphere",
            Self::FOG_COLOR => "fogColor",
            Self::DIRECTIONAL_LIGHTS => "directionalLights",
            Self::POINT_LIGHTS => "pointLights",
            Self::SHADOW_MAP => "shadowMap",
            Self::TIME => "time",
            Self::PREV_PROJ_VIEW => "prevProjView",
            Self::ECLIPSING_BODY => "eclipsingBody",
            Self::RELATIVISTIC => "relativistic",
            Self::GRAVITATIONAL_WAVE => "gravitationalWave",
            _ => "unknown",
        }
    }
}

// ===== PAYLOAD BLOCKS =====

/// Blend factors and opacity of a translucent material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendState {
    pub source: BlendFactor,
    pub destination: BlendFactor,
    pub opacity: f32,
}

/// Depth test configuration. `func == None` disables the test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthState {
    pub func: Option<CompareOp>,
    pub near: f32,
    pub far: f32,
    pub mask: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub position: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowMap {
    pub texture: TextureHandle,
    pub proj_view: Mat4,
    pub pcf_offset: f32,
}

/// Gravitational wave terms (strain, rotation, phase and polarisation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitationalWave {
    pub gw: Vec4,
    pub gw_mat3: Mat3,
    pub ts: f32,
    pub omgw: f32,
    pub hterms: Vec4,
}

/// Scattering parameters of an atmosphere seen from the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereParams {
    pub alpha: f32,
    pub camera_height: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub kr_esun: f32,
    pub km_esun: f32,
    pub kr_4pi: f32,
    pub km_4pi: f32,
    pub scale_depth: f32,
    pub g: f32,
    pub samples: i32,
    pub planet_pos: Vec3,
    pub light_pos: Vec3,
    pub inv_wavelength: Vec3,
}

impl AtmosphereParams {
    /// `1 / (outer - inner)`, zero for a degenerate shell
    pub fn scale(&self) -> f32 {
        let thickness = self.outer_radius - self.inner_radius;
        if thickness > 0.0 { 1.0 / thickness } else { 0.0 }
    }

    pub fn scale_over_scale_depth(&self) -> f32 {
        if self.scale_depth > 0.0 { self.scale() / self.scale_depth } else { 0.0 }
    }
}

// ===== ATTRIBUTE VALUE =====

/// Typed payload of an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Color(Vec4),
    Float(f32),
    Matrix(Mat4),
    Texture(TextureHandle),
    Blending(BlendState),
    CullFace(CullMode),
    DepthTest(DepthState),
    DirectionalLights(Vec<DirectionalLight>),
    PointLights(Vec<PointLight>),
    ShadowMap(ShadowMap),
    Relativistic { velocity_dir: Vec3, vc: f32 },
    GravitationalWave(GravitationalWave),
    Atmosphere(AtmosphereParams),
    EclipsingBody { position: Vec3, radius: f32 },
}

impl AttributeValue {
    pub fn as_color(&self) -> Option<Vec4> {
        match self {
            AttributeValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<Mat4> {
        match self {
            AttributeValue::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<TextureHandle> {
        match self {
            AttributeValue::Texture(t) => Some(*t),
            _ => None,
        }
    }
}

// ===== ATTRIBUTE =====

/// A tagged piece of render state
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    ty: AttributeType,
    value: AttributeValue,
}

impl Attribute {
    pub fn new(ty: AttributeType, value: AttributeValue) -> Self {
        Self { ty, value }
    }

    pub fn ty(&self) -> AttributeType {
        self.ty
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    // ===== CONSTRUCTORS =====

    pub fn color(ty: AttributeType, color: Vec4) -> Self {
        Self::new(ty, AttributeValue::Color(color))
    }

    pub fn float(ty: AttributeType, value: f32) -> Self {
        Self::new(ty, AttributeValue::Float(value))
    }

    pub fn texture(ty: AttributeType, texture: TextureHandle) -> Self {
        Self::new(ty, AttributeValue::Texture(texture))
    }

    pub fn diffuse_color(color: Vec4) -> Self {
        Self::color(AttributeType::DIFFUSE_COLOR, color)
    }

    pub fn diffuse_texture(texture: TextureHandle) -> Self {
        Self::texture(AttributeType::DIFFUSE_TEXTURE, texture)
    }

    pub fn normal_texture(texture: TextureHandle) -> Self {
        Self::texture(AttributeType::NORMAL_TEXTURE, texture)
    }

    pub fn blending(source: BlendFactor, destination: BlendFactor, opacity: f32) -> Self {
        Self::new(
            AttributeType::BLENDING,
            AttributeValue::Blending(BlendState { source, destination, opacity }),
        )
    }

    pub fn cull_face(mode: CullMode) -> Self {
        Self::new(AttributeType::CULL_FACE, AttributeValue::CullFace(mode))
    }

    pub fn depth_test(func: Option<CompareOp>, near: f32, far: f32, mask: bool) -> Self {
        Self::new(
            AttributeType::DEPTH_TEST,
            AttributeValue::DepthTest(DepthState { func, near, far, mask }),
        )
    }

    pub fn alpha_test(threshold: f32) -> Self {
        Self::float(AttributeType::ALPHA_TEST, threshold)
    }

    pub fn fog_color(color: Vec4) -> Self {
        Self::color(AttributeType::FOG_COLOR, color)
    }

    pub fn directional_lights(lights: Vec<DirectionalLight>) -> Self {
        Self::new(AttributeType::DIRECTIONAL_LIGHTS, AttributeValue::DirectionalLights(lights))
    }

    pub fn point_lights(lights: Vec<PointLight>) -> Self {
        Self::new(AttributeType::POINT_LIGHTS, AttributeValue::PointLights(lights))
    }

    pub fn shadow_map(shadow_map: ShadowMap) -> Self {
        Self::new(AttributeType::SHADOW_MAP, AttributeValue::ShadowMap(shadow_map))
    }

    pub fn time(seconds: f32) -> Self {
        Self::float(AttributeType::TIME, seconds)
    }

    pub fn prev_proj_view(matrix: Mat4) -> Self {
        Self::new(AttributeType::PREV_PROJ_VIEW, AttributeValue::Matrix(matrix))
    }

    pub fn eclipsing_body(position: Vec3, radius: f32) -> Self {
        Self::new(
            AttributeType::ECLIPSING_BODY,
            AttributeValue::EclipsingBody { position, radius },
        )
    }

    pub fn relativistic(velocity_dir: Vec3, vc: f32) -> Self {
        Self::new(
            AttributeType::RELATIVISTIC,
            AttributeValue::Relativistic { velocity_dir, vc },
        )
    }

    pub fn gravitational_wave(wave: GravitationalWave) -> Self {
        Self::new(AttributeType::GRAVITATIONAL_WAVE, AttributeValue::GravitationalWave(wave))
    }

    pub fn atmosphere(params: AtmosphereParams) -> Self {
        Self::new(AttributeType::ATMOSPHERE, AttributeValue::Atmosphere(params))
    }
}
