/// Shared fixtures for the shader unit tests: templates whose declarations
/// the mock device understands, and renderable builders.

use std::sync::Arc;
use glam::{Mat4, Vec3, Vec4};
use crate::attribute::{Attribute, AttributeSet, DirectionalLight};
use crate::camera::Camera;
use crate::device::{MeshId, TextureHandle};
use crate::renderable::{MeshPart, Renderable, VertexAttributeDesc, VertexLayout};
use super::template::ShaderTemplate;

pub const VERTEX: &str = "#version 330 core
in vec3 a_position;
in vec3 a_normal;
in vec2 a_texCoord0;
uniform mat4 u_projTrans;
uniform mat4 u_viewTrans;
uniform mat4 u_projViewTrans;
uniform vec3 u_cameraPosition;
uniform vec3 u_cameraDirection;
uniform vec3 u_cameraUp;
uniform vec2 u_cameraNearFar;
uniform float u_time;
uniform mat4 u_worldTrans;
uniform mat3 u_normalMatrix;
uniform mat4 u_prevProjView;
uniform mat4 u_shadowMapProjViewTrans;
uniform vec3 u_velDir;
uniform float u_vc;
uniform vec4 u_gw;
uniform mat3 u_gwmat3;
uniform float u_ts;
uniform float u_omgw;
uniform vec4 u_hterms;
void main() {}
";

pub const FRAGMENT: &str = "#version 330 core
struct DirectionalLight { vec3 color; vec3 direction; };
uniform vec4 u_diffuseColor;
uniform vec4 u_specularColor;
uniform vec4 u_emissiveColor;
uniform sampler2D u_diffuseTexture;
uniform sampler2D u_normalTexture;
uniform float u_shininess;
uniform float u_opacity;
uniform float u_alphaTest;
uniform vec4 u_fogColor;
uniform DirectionalLight u_dirLights[numDirectionalLights];
uniform sampler2D u_shadowTexture;
uniform float u_shadowPCFOffset;
uniform vec3 u_eclipsingBodyPos;
uniform float u_eclipsingBodyRadius;
out vec4 fragColor;
void main() {}
";

/// The `default` template over `VERTEX` / `FRAGMENT`
pub fn default_template() -> ShaderTemplate {
    ShaderTemplate::default_shader(VERTEX, FRAGMENT)
}

pub fn layout() -> Arc<VertexLayout> {
    Arc::new(VertexLayout::new(vec![
        VertexAttributeDesc::position(),
        VertexAttributeDesc::normal(),
        VertexAttributeDesc::tex_coords(0),
    ]))
}

pub fn mesh(id: u64) -> MeshPart {
    MeshPart::new(MeshId(id), layout(), 36)
}

/// Unlit renderable on mesh 1
pub fn unlit(attributes: Vec<Attribute>) -> Renderable {
    Renderable::new(mesh(1), AttributeSet::from_attributes(attributes))
}

/// Renderable on mesh 1 with an environment
pub fn lit(material: Vec<Attribute>, environment: Vec<Attribute>) -> Renderable {
    unlit(material).with_environment(AttributeSet::from_attributes(environment))
}

pub fn sun() -> Attribute {
    Attribute::directional_lights(vec![DirectionalLight {
        color: Vec3::ONE,
        direction: Vec3::new(0.0, -1.0, 0.0),
    }])
}

pub fn diffuse_texture() -> Attribute {
    Attribute::diffuse_texture(TextureHandle(7))
}

pub fn fog() -> Attribute {
    Attribute::fog_color(Vec4::new(0.5, 0.5, 0.6, 1.0))
}

pub fn camera() -> Camera {
    Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 1.0, 16.0 / 9.0, 0.1, 100.0)
}

pub fn translated(renderable: Renderable, x: f32) -> Renderable {
    renderable.with_world_transform(Mat4::from_translation(Vec3::new(x, 0.0, 0.0)))
}
