/// Uniform descriptors and setter kinds.
///
/// A `Uniform` says when a uniform applies (masks the renderable must carry).
/// A `UniformKind` says where its value comes from. Kinds are plain enum
/// values resolved by one pure function, so the per-object loop is a
/// `match`, not a virtual call.

use glam::{Mat3, Vec3};
use crate::attribute::{
    AtmosphereParams, AttributeMask, AttributeSet, AttributeType, AttributeValue,
};
use crate::camera::Camera;
use crate::device::{TextureHandle, UniformValue};
use crate::renderable::Renderable;

// ===== UNIFORM DESCRIPTOR =====

/// Named uniform slot with its applicability masks
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    pub alias: String,
    /// Tags the material must carry
    pub material_mask: AttributeMask,
    /// Tags the environment must carry
    pub environment_mask: AttributeMask,
    /// Tags material ∪ environment must carry
    pub overall_mask: AttributeMask,
}

impl Uniform {
    /// Uniform that always applies
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            material_mask: AttributeMask::EMPTY,
            environment_mask: AttributeMask::EMPTY,
            overall_mask: AttributeMask::EMPTY,
        }
    }

    pub fn with_material(alias: impl Into<String>, mask: AttributeMask) -> Self {
        Self { material_mask: mask, ..Self::new(alias) }
    }

    pub fn with_environment(alias: impl Into<String>, mask: AttributeMask) -> Self {
        Self { environment_mask: mask, ..Self::new(alias) }
    }

    pub fn with_overall(alias: impl Into<String>, mask: AttributeMask) -> Self {
        Self { overall_mask: mask, ..Self::new(alias) }
    }

    /// Whether `renderable` carries everything this uniform needs
    pub fn validate(&self, renderable: &Renderable) -> bool {
        let material = renderable.material.mask();
        let environment = renderable
            .environment
            .as_ref()
            .map(AttributeSet::mask)
            .unwrap_or(AttributeMask::EMPTY);
        material.contains(self.material_mask)
            && environment.contains(self.environment_mask)
            && (material | environment).contains(self.overall_mask)
    }
}

// ===== SETTER KINDS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformScope {
    /// Set once per `begin`
    Global,
    /// Set once per `render`
    Local,
}

/// Derived atmosphere terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtmosphereTerm {
    Alpha,
    CameraHeight,
    CameraHeight2,
    InnerRadius,
    InnerRadius2,
    OuterRadius,
    OuterRadius2,
    KrESun,
    KmESun,
    Kr4Pi,
    Km4Pi,
    Scale,
    ScaleDepth,
    ScaleOverScaleDepth,
    G,
    Samples,
    PlanetPos,
    LightPos,
    InvWavelength,
}

/// Where a uniform's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    // Global
    ProjTrans,
    ViewTrans,
    ProjViewTrans,
    CameraPosition,
    CameraDirection,
    CameraUp,
    CameraNearFar,
    Time,

    // Object
    WorldTrans,
    NormalMatrix,

    // Attribute payloads
    Color(AttributeType),
    Texture(AttributeType),
    Float(AttributeType),
    Matrix(AttributeType),

    // Lights and shadows
    DirLightColor(u8),
    DirLightDirection(u8),
    PointLightColor(u8),
    PointLightPosition(u8),
    PointLightIntensity(u8),
    ShadowMapProjViewTrans,
    ShadowTexture,
    ShadowPcfOffset,
    EclipsingBodyPos,
    EclipsingBodyRadius,

    // Relativistic effects
    VelocityDir,
    Vc,
    Gw,
    GwMat3,
    Ts,
    Omgw,
    Hterms,

    Atmosphere(AtmosphereTerm),
}

/// Per-frame inputs of global setters
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub camera: &'a Camera,
    /// Seconds since the application started
    pub time: f32,
}

/// Per-object inputs of local setters
#[derive(Debug, Clone, Copy)]
pub struct ObjectInputs<'a> {
    pub renderable: &'a Renderable,
    /// Environment then material
    pub attributes: &'a AttributeSet,
}

/// What a setter produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformInput {
    Value(UniformValue),
    /// Bind to a texture unit and set the sampler to the unit index
    Texture(TextureHandle),
}

impl UniformKind {
    pub fn scope(self) -> UniformScope {
        match self {
            UniformKind::ProjTrans
            | UniformKind::ViewTrans
            | UniformKind::ProjViewTrans
            | UniformKind::CameraPosition
            | UniformKind::CameraDirection
            | UniformKind::CameraUp
            | UniformKind::CameraNearFar
            | UniformKind::Time => UniformScope::Global,
            _ => UniformScope::Local,
        }
    }

    pub fn is_global(self) -> bool {
        self.scope() == UniformScope::Global
    }

    /// Compute the value for this kind.
    ///
    /// Local kinds return `None` without an object, and every kind returns
    /// `None` when the attribute it reads is absent (the uniform keeps its
    /// previous value, as GL does).
    pub fn resolve(self, frame: &FrameInputs<'_>, object: Option<&ObjectInputs<'_>>) -> Option<UniformInput> {
        use UniformValue as V;
        let value = |v: UniformValue| Some(UniformInput::Value(v));
        let camera = frame.camera;

        match self {
            UniformKind::ProjTrans => return value(V::Mat4(*camera.projection_matrix())),
            UniformKind::ViewTrans => return value(V::Mat4(*camera.view_matrix())),
            UniformKind::ProjViewTrans => return value(V::Mat4(camera.view_projection_matrix())),
            UniformKind::CameraPosition => return value(V::Vec3(camera.position())),
            UniformKind::CameraDirection => return value(V::Vec3(camera.direction())),
            UniformKind::CameraUp => return value(V::Vec3(camera.up())),
            UniformKind::CameraNearFar => return value(V::Vec2(camera.near_far())),
            UniformKind::Time => return value(V::Float(frame.time)),
            _ => {}
        }

        let object = object?;
        let attributes = object.attributes;
        let world = object.renderable.world_transform;

        match self {
            UniformKind::WorldTrans => value(V::Mat4(world)),
            UniformKind::NormalMatrix => value(V::Mat3(Mat3::from_mat4(world).inverse().transpose())),
            UniformKind::Color(ty) => attributes.value(ty)?.as_color().map(|c| UniformInput::Value(V::Vec4(c))),
            UniformKind::Texture(ty) => attributes.value(ty)?.as_texture().map(UniformInput::Texture),
            UniformKind::Float(ty) => attributes.value(ty)?.as_float().map(|f| UniformInput::Value(V::Float(f))),
            UniformKind::Matrix(ty) => attributes.value(ty)?.as_matrix().map(|m| UniformInput::Value(V::Mat4(m))),
            UniformKind::DirLightColor(i) => match attributes.value(AttributeType::DIRECTIONAL_LIGHTS)? {
                AttributeValue::DirectionalLights(lights) => {
                    value(V::Vec3(lights.get(i as usize).map(|l| l.color).unwrap_or(Vec3::ZERO)))
                }
                _ => None,
            },
            UniformKind::DirLightDirection(i) => match attributes.value(AttributeType::DIRECTIONAL_LIGHTS)? {
                AttributeValue::DirectionalLights(lights) => {
                    value(V::Vec3(lights.get(i as usize).map(|l| l.direction).unwrap_or(Vec3::NEG_Z)))
                }
                _ => None,
            },
            UniformKind::PointLightColor(i) => match attributes.value(AttributeType::POINT_LIGHTS)? {
                AttributeValue::PointLights(lights) => {
                    value(V::Vec3(lights.get(i as usize).map(|l| l.color).unwrap_or(Vec3::ZERO)))
                }
                _ => None,
            },
            UniformKind::PointLightPosition(i) => match attributes.value(AttributeType::POINT_LIGHTS)? {
                AttributeValue::PointLights(lights) => {
                    value(V::Vec3(lights.get(i as usize).map(|l| l.position).unwrap_or(Vec3::ZERO)))
                }
                _ => None,
            },
            UniformKind::PointLightIntensity(i) => match attributes.value(AttributeType::POINT_LIGHTS)? {
                AttributeValue::PointLights(lights) => {
                    value(V::Float(lights.get(i as usize).map(|l| l.intensity).unwrap_or(0.0)))
                }
                _ => None,
            },
            UniformKind::ShadowMapProjViewTrans => match attributes.value(AttributeType::SHADOW_MAP)? {
                AttributeValue::ShadowMap(shadow) => value(V::Mat4(shadow.proj_view)),
                _ => None,
            },
            UniformKind::ShadowTexture => match attributes.value(AttributeType::SHADOW_MAP)? {
                AttributeValue::ShadowMap(shadow) => Some(UniformInput::Texture(shadow.texture)),
                _ => None,
            },
            UniformKind::ShadowPcfOffset => match attributes.value(AttributeType::SHADOW_MAP)? {
                AttributeValue::ShadowMap(shadow) => value(V::Float(shadow.pcf_offset)),
                _ => None,
            },
            UniformKind::EclipsingBodyPos => match attributes.value(AttributeType::ECLIPSING_BODY)? {
                AttributeValue::EclipsingBody { position, .. } => value(V::Vec3(*position)),
                _ => None,
            },
            UniformKind::EclipsingBodyRadius => match attributes.value(AttributeType::ECLIPSING_BODY)? {
                AttributeValue::EclipsingBody { radius, .. } => value(V::Float(*radius)),
                _ => None,
            },
            UniformKind::VelocityDir => match attributes.value(AttributeType::RELATIVISTIC)? {
                AttributeValue::Relativistic { velocity_dir, .. } => value(V::Vec3(*velocity_dir)),
                _ => None,
            },
            UniformKind::Vc => match attributes.value(AttributeType::RELATIVISTIC)? {
                AttributeValue::Relativistic { vc, .. } => value(V::Float(*vc)),
                _ => None,
            },
            UniformKind::Gw
            | UniformKind::GwMat3
            | UniformKind::Ts
            | UniformKind::Omgw
            | UniformKind::Hterms => match attributes.value(AttributeType::GRAVITATIONAL_WAVE)? {
                AttributeValue::GravitationalWave(wave) => value(match self {
                    UniformKind::Gw => V::Vec4(wave.gw),
                    UniformKind::GwMat3 => V::Mat3(wave.gw_mat3),
                    UniformKind::Ts => V::Float(wave.ts),
                    UniformKind::Omgw => V::Float(wave.omgw),
                    _ => V::Vec4(wave.hterms),
                }),
                _ => None,
            },
            UniformKind::Atmosphere(term) => match attributes.value(AttributeType::ATMOSPHERE)? {
                AttributeValue::Atmosphere(params) => value(atmosphere_value(params, term)),
                _ => None,
            },
            _ => None,
        }
    }
}

fn atmosphere_value(params: &AtmosphereParams, term: AtmosphereTerm) -> UniformValue {
    use UniformValue as V;
    match term {
        AtmosphereTerm::Alpha => V::Float(params.alpha),
        AtmosphereTerm::CameraHeight => V::Float(params.camera_height),
        AtmosphereTerm::CameraHeight2 => V::Float(params.camera_height * params.camera_height),
        AtmosphereTerm::InnerRadius => V::Float(params.inner_radius),
        AtmosphereTerm::InnerRadius2 => V::Float(params.inner_radius * params.inner_radius),
        AtmosphereTerm::OuterRadius => V::Float(params.outer_radius),
        AtmosphereTerm::OuterRadius2 => V::Float(params.outer_radius * params.outer_radius),
        AtmosphereTerm::KrESun => V::Float(params.kr_esun),
        AtmosphereTerm::KmESun => V::Float(params.km_esun),
        AtmosphereTerm::Kr4Pi => V::Float(params.kr_4pi),
        AtmosphereTerm::Km4Pi => V::Float(params.km_4pi),
        AtmosphereTerm::Scale => V::Float(params.scale()),
        AtmosphereTerm::ScaleDepth => V::Float(params.scale_depth),
        AtmosphereTerm::ScaleOverScaleDepth => V::Float(params.scale_over_scale_depth()),
        AtmosphereTerm::G => V::Float(params.g),
        AtmosphereTerm::Samples => V::Int(params.samples),
        AtmosphereTerm::PlanetPos => V::Vec3(params.planet_pos),
        AtmosphereTerm::LightPos => V::Vec3(params.light_pos),
        AtmosphereTerm::InvWavelength => V::Vec3(params.inv_wavelength),
    }
}

#[cfg(test)]
#[path = "uniform_tests.rs"]
mod tests;
