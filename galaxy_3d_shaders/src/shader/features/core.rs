/// Core feature: camera/object transforms, vertex flags, material colors and
/// textures, lights, fog, shadows and the velocity buffer.

use crate::attribute::{AttributeMask, AttributeType as T};
use crate::error::Result;
use crate::renderable::VertexUsage;
use crate::shader::prefix::{define, define_value, PrefixInput, ShaderFeature};
use crate::shader::uniform::{Uniform, UniformKind as K};
use crate::shader::uniform_registry::UniformRegistry;

const TEXTURES: [T; 8] = [
    T::DIFFUSE_TEXTURE,
    T::SPECULAR_TEXTURE,
    T::NORMAL_TEXTURE,
    T::EMISSIVE_TEXTURE,
    T::METALLIC_TEXTURE,
    T::HEIGHT_TEXTURE,
    T::AO_TEXTURE,
    T::ROUGHNESS_TEXTURE,
];

const COLORS: [T; 5] = [
    T::DIFFUSE_COLOR,
    T::SPECULAR_COLOR,
    T::EMISSIVE_COLOR,
    T::METALLIC_COLOR,
    T::ROUGHNESS_COLOR,
];

const CUBEMAPS: [T; 3] = [T::DIFFUSE_CUBEMAP, T::NORMAL_CUBEMAP, T::SPECULAR_CUBEMAP];

#[derive(Debug, Default, Clone, Copy)]
pub struct CoreFeature;

fn flag(prefix: &mut String, ty: T) {
    define(prefix, &format!("{}Flag", ty.alias()));
}

/// `u_<alias>` uniform name of a material attribute
fn material_uniform(ty: T) -> String {
    format!("u_{}", ty.alias())
}

impl ShaderFeature for CoreFeature {
    fn name(&self) -> &'static str {
        "core"
    }

    fn implemented(&self) -> AttributeMask {
        let mut mask = AttributeMask::from_types(&TEXTURES) | AttributeMask::from_types(&COLORS);
        mask |= AttributeMask::from_types(&CUBEMAPS);
        mask | AttributeMask::from_types(&[
            T::BLENDING,
            T::CULL_FACE,
            T::DEPTH_TEST,
            T::ALPHA_TEST,
            T::SHININESS,
            T::REFLECTION_CUBEMAP,
            T::FOG_COLOR,
            T::DIRECTIONAL_LIGHTS,
            T::POINT_LIGHTS,
            T::SHADOW_MAP,
            T::TIME,
            T::PREV_PROJ_VIEW,
            T::ECLIPSING_BODY,
        ])
    }

    fn write_prefix(&self, input: &PrefixInput<'_>, prefix: &mut String) {
        let attributes = input.attributes;
        let config = input.config;
        let vertex = input.layout.mask();

        // Vertex layout
        if vertex.contains(VertexUsage::POSITION) {
            define(prefix, "positionFlag");
        }
        if vertex.intersects(VertexUsage::COLOR_UNPACKED | VertexUsage::COLOR_PACKED) {
            define(prefix, "colorFlag");
        }
        if vertex.contains(VertexUsage::BINORMAL) {
            define(prefix, "binormalFlag");
        }
        if vertex.contains(VertexUsage::TANGENT) {
            define(prefix, "tangentFlag");
        }
        if vertex.contains(VertexUsage::NORMAL) {
            define(prefix, "normalFlag");
        }

        // Lighting needs something to shade with
        let shadable = vertex.intersects(VertexUsage::NORMAL | VertexUsage::TANGENT | VertexUsage::BINORMAL);
        if shadable && input.lighting {
            define(prefix, "lightingFlag");
            define(prefix, "ambientCubemapFlag");
            define_value(prefix, "numDirectionalLights", config.num_directional_lights);
            define_value(prefix, "numPointLights", config.num_point_lights);
            if attributes.has(T::FOG_COLOR) {
                define(prefix, "fogFlag");
            }
            if attributes.has(T::SHADOW_MAP) {
                define(prefix, "shadowMapFlag");
            }
        }

        if attributes.has(T::ECLIPSING_BODY) {
            define(prefix, "eclipsingBodyFlag");
        }

        for attribute in input.layout.attributes() {
            if attribute.usage == VertexUsage::BONE_WEIGHT {
                define(prefix, &format!("boneWeight{}Flag", attribute.unit));
            } else if attribute.usage == VertexUsage::TEXTURE_COORDINATES {
                define(prefix, &format!("texCoord{}Flag", attribute.unit));
            }
        }

        // Material
        if attributes.has(T::BLENDING) {
            flag(prefix, T::BLENDING);
        }
        for ty in TEXTURES {
            if attributes.has(ty) {
                flag(prefix, ty);
            }
        }
        if attributes.has(T::TIME) {
            flag(prefix, T::TIME);
        }
        for ty in COLORS {
            if attributes.has(ty) {
                flag(prefix, ty);
            }
        }
        if attributes.has(T::ALPHA_TEST) {
            flag(prefix, T::ALPHA_TEST);
        }
        if attributes.has(T::SHININESS) {
            flag(prefix, T::SHININESS);
        }
        if attributes.has(T::PREV_PROJ_VIEW) {
            define(prefix, "velocityBufferFlag");
        }
        if attributes.has(T::METALLIC_COLOR) || attributes.has(T::METALLIC_TEXTURE) {
            define(prefix, "metallicFlag");
            if attributes.has(T::REFLECTION_CUBEMAP) {
                flag(prefix, T::REFLECTION_CUBEMAP);
            }
        }
        if config.ssr {
            define(prefix, "ssrFlag");
        }

        let mut cubemap = false;
        for ty in CUBEMAPS {
            if attributes.has(ty) {
                flag(prefix, ty);
                cubemap = true;
            }
        }
        if cubemap {
            define(prefix, "cubemapFlag");
        }

        if vertex.contains(VertexUsage::BONE_WEIGHT) && config.num_bones > 0 {
            define_value(prefix, "numBones", config.num_bones);
        }
    }

    fn register_uniforms(&self, input: &PrefixInput<'_>, registry: &mut UniformRegistry) -> Result<()> {
        // Global
        registry.register_with("u_projTrans", K::ProjTrans)?;
        registry.register_with("u_viewTrans", K::ViewTrans)?;
        registry.register_with("u_projViewTrans", K::ProjViewTrans)?;
        registry.register_with("u_cameraPosition", K::CameraPosition)?;
        registry.register_with("u_cameraDirection", K::CameraDirection)?;
        registry.register_with("u_cameraUp", K::CameraUp)?;
        registry.register_with("u_cameraNearFar", K::CameraNearFar)?;
        registry.register_with("u_time", K::Time)?;

        // Object
        registry.register_with("u_worldTrans", K::WorldTrans)?;
        registry.register_with("u_normalMatrix", K::NormalMatrix)?;

        // Material
        for ty in COLORS {
            registry.register(Uniform::with_material(material_uniform(ty), AttributeMask::of(ty)), Some(K::Color(ty)))?;
        }
        for ty in TEXTURES.into_iter().chain(CUBEMAPS).chain([T::REFLECTION_CUBEMAP]) {
            registry.register(Uniform::with_material(material_uniform(ty), AttributeMask::of(ty)), Some(K::Texture(ty)))?;
        }
        registry.register(
            Uniform::with_material("u_shininess", AttributeMask::of(T::SHININESS)),
            Some(K::Float(T::SHININESS)),
        )?;
        // Set by the binder while binding the material
        registry.register(Uniform::with_material("u_opacity", AttributeMask::of(T::BLENDING)), None)?;
        registry.register(Uniform::with_material("u_alphaTest", AttributeMask::of(T::ALPHA_TEST)), None)?;

        // Environment
        registry.register(
            Uniform::with_environment("u_fogColor", AttributeMask::of(T::FOG_COLOR)),
            Some(K::Color(T::FOG_COLOR)),
        )?;
        registry.register(
            Uniform::with_environment("u_prevProjView", AttributeMask::of(T::PREV_PROJ_VIEW)),
            Some(K::Matrix(T::PREV_PROJ_VIEW)),
        )?;
        let eclipse = AttributeMask::of(T::ECLIPSING_BODY);
        registry.register(Uniform::with_environment("u_eclipsingBodyPos", eclipse), Some(K::EclipsingBodyPos))?;
        registry.register(Uniform::with_environment("u_eclipsingBodyRadius", eclipse), Some(K::EclipsingBodyRadius))?;

        if input.lighting {
            let directional = AttributeMask::of(T::DIRECTIONAL_LIGHTS);
            for i in 0..input.config.num_directional_lights.min(u8::MAX as u32) as u8 {
                registry.register(
                    Uniform::with_environment(format!("u_dirLights[{}].color", i), directional),
                    Some(K::DirLightColor(i)),
                )?;
                registry.register(
                    Uniform::with_environment(format!("u_dirLights[{}].direction", i), directional),
                    Some(K::DirLightDirection(i)),
                )?;
            }

            let point = AttributeMask::of(T::POINT_LIGHTS);
            for i in 0..input.config.num_point_lights.min(u8::MAX as u32) as u8 {
                registry.register(
                    Uniform::with_environment(format!("u_pointLights[{}].color", i), point),
                    Some(K::PointLightColor(i)),
                )?;
                registry.register(
                    Uniform::with_environment(format!("u_pointLights[{}].position", i), point),
                    Some(K::PointLightPosition(i)),
                )?;
                registry.register(
                    Uniform::with_environment(format!("u_pointLights[{}].intensity", i), point),
                    Some(K::PointLightIntensity(i)),
                )?;
            }

            let shadow = AttributeMask::of(T::SHADOW_MAP);
            registry.register(Uniform::with_environment("u_shadowMapProjViewTrans", shadow), Some(K::ShadowMapProjViewTrans))?;
            registry.register(Uniform::with_environment("u_shadowTexture", shadow), Some(K::ShadowTexture))?;
            registry.register(Uniform::with_environment("u_shadowPCFOffset", shadow), Some(K::ShadowPcfOffset))?;
        }
        Ok(())
    }
}
