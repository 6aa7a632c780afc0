use glam::Vec4;
use crate::attribute::{Attribute, AttributeMask, AttributeType};
use crate::config::ShaderConfig;
use crate::device::mock_device::MockDevice;
use crate::device::{CompareOp, CullMode, TextureHandle};
use crate::error::Error;
use crate::renderable::Renderable;
use crate::shader::program_cache::ProgramCache;
use crate::shader::test_fixtures::{default_template, diffuse_texture, fog, lit, mesh, sun, unlit};
use crate::shader::variant::{VariantState, OPTIONAL_ATTRIBUTES};
use super::*;

struct Fixture {
    device: MockDevice,
    cache: ProgramCache,
    config: ShaderConfig,
    provider: ShaderProvider,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(ShaderConfig::default())
    }

    fn with_config(config: ShaderConfig) -> Self {
        Self {
            device: MockDevice::new(),
            cache: ProgramCache::disabled(),
            config,
            provider: ShaderProvider::new(default_template()),
        }
    }

    fn get(&mut self, renderable: &Renderable) -> crate::error::Result<ShaderVariantKey> {
        self.provider.get_shader(&mut self.device, &self.cache, &self.config, renderable)
    }
}

// ============================================================================
// Pooling
// ============================================================================

#[test]
fn test_same_masks_share_variant() {
    let mut f = Fixture::new();
    let a = f.get(&lit(vec![diffuse_texture()], vec![fog(), sun()])).unwrap();
    // Different payloads, same tags
    let b = f
        .get(&lit(vec![Attribute::diffuse_texture(TextureHandle(42))], vec![sun(), fog()]))
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(f.provider.len(), 1);
    assert_eq!(f.device.links, 1);
}

#[test]
fn test_different_masks_get_different_variants() {
    let mut f = Fixture::new();
    let textured = f.get(&unlit(vec![diffuse_texture()])).unwrap();
    let colored = f.get(&unlit(vec![Attribute::diffuse_color(Vec4::ONE)])).unwrap();

    assert_ne!(textured, colored);
    assert_eq!(f.provider.keys(), &[textured, colored]);
}

#[test]
fn test_lighting_presence_splits_variants() {
    let mut f = Fixture::new();
    let unlit_key = f.get(&unlit(vec![diffuse_texture()])).unwrap();
    let lit_key = f.get(&lit(vec![diffuse_texture()], vec![])).unwrap();
    assert_ne!(unlit_key, lit_key);
}

#[test]
fn test_optional_attributes_do_not_split_variants() {
    let mut f = Fixture::new();
    let plain = f.get(&unlit(vec![diffuse_texture()])).unwrap();
    let culled = f
        .get(&unlit(vec![
            diffuse_texture(),
            Attribute::cull_face(CullMode::None),
            Attribute::depth_test(Some(CompareOp::Less), 0.0, 1.0, false),
        ]))
        .unwrap();
    assert_eq!(plain, culled);
}

#[test]
fn test_vertex_layout_splits_variants() {
    use std::sync::Arc;
    use crate::device::MeshId;
    use crate::renderable::{MeshPart, VertexAttributeDesc, VertexLayout};

    let mut f = Fixture::new();
    let a = f.get(&unlit(vec![diffuse_texture()])).unwrap();
    let layout = Arc::new(VertexLayout::new(vec![VertexAttributeDesc::position(), VertexAttributeDesc::normal()]));
    let b = f
        .get(&Renderable::new(
            MeshPart::new(MeshId(9), layout, 3),
            crate::attribute::AttributeSet::from_attributes([diffuse_texture()]),
        ))
        .unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_get_shader_moves_variant_to_idle() {
    let mut f = Fixture::new();
    let key = f.get(&unlit(vec![])).unwrap();
    assert_eq!(f.provider.variant(key).unwrap().state(), VariantState::Idle);
}

// ============================================================================
// can_render
// ============================================================================

#[test]
fn test_can_render_exact_mask() {
    let mut f = Fixture::new();
    let key = f.get(&unlit(vec![diffuse_texture()])).unwrap();
    let variant = f.provider.variant(key).unwrap();

    assert!(variant.can_render(&unlit(vec![diffuse_texture()])));
    // Extra attribute
    assert!(!variant.can_render(&unlit(vec![diffuse_texture(), Attribute::diffuse_color(Vec4::ONE)])));
    // Missing attribute
    assert!(!variant.can_render(&unlit(vec![])));
    // Other mesh, same layout
    assert!(variant.can_render(&crate::renderable::Renderable::new(
        mesh(5),
        crate::attribute::AttributeSet::from_attributes([diffuse_texture()]),
    )));
}

#[test]
fn test_variant_mask_includes_optional() {
    let mut f = Fixture::new();
    let key = f.get(&unlit(vec![diffuse_texture()])).unwrap();
    let variant = f.provider.variant(key).unwrap();
    assert_eq!(
        variant.attribute_mask(),
        AttributeMask::of(AttributeType::DIFFUSE_TEXTURE) | OPTIONAL_ATTRIBUTES
    );
}

#[test]
fn test_variant_resolves_attribute_locations() {
    let mut f = Fixture::new();
    let key = f.get(&unlit(vec![])).unwrap();
    let variant = f.provider.variant(key).unwrap();
    assert_eq!(variant.attribute_locations(), &[Some(0), Some(1), Some(2)]);
    assert!(variant.prefix().starts_with("#define positionFlag\n"));
    assert!(!variant.from_cache());
}

// ============================================================================
// Strict / pedantic
// ============================================================================

#[test]
fn test_unimplemented_attribute_warns_by_default() {
    let mut f = Fixture::new();
    let atmosphere = Attribute::float(AttributeType::ATMOSPHERE, 1.0);
    assert!(f.get(&unlit(vec![atmosphere])).is_ok());
}

#[test]
fn test_unimplemented_attribute_strict() {
    let mut f = Fixture::with_config(ShaderConfig { strict: true, ..Default::default() });
    let atmosphere = Attribute::float(AttributeType::ATMOSPHERE, 1.0);

    match f.get(&unlit(vec![diffuse_texture(), atmosphere])) {
        Err(Error::UnimplementedAttribute { name, unsupported }) => {
            assert_eq!(name, "default");
            assert_eq!(unsupported, AttributeMask::of(AttributeType::ATMOSPHERE));
        }
        other => panic!("expected UnimplementedAttribute, got {:?}", other),
    }
    assert!(f.provider.is_empty());
    assert_eq!(f.device.stage_compiles, 0);
}

#[test]
fn test_pedantic_missing_uniform_releases_program() {
    let mut f = Fixture::with_config(ShaderConfig { pedantic: true, ..Default::default() });
    // Specular texture applies but the fixture sources never declare it
    let specular = Attribute::texture(AttributeType::SPECULAR_TEXTURE, TextureHandle(3));

    match f.get(&unlit(vec![specular])) {
        Err(Error::MissingUniform { alias, .. }) => assert_eq!(alias, "u_specularTexture"),
        other => panic!("expected MissingUniform, got {:?}", other),
    }
    assert_eq!(f.device.live_programs(), 0);
    assert!(f.provider.is_empty());
}

#[test]
fn test_compile_error_leaves_pool_untouched() {
    let mut f = Fixture::new();
    f.provider = ShaderProvider::new(crate::shader::template::ShaderTemplate::default_shader(
        "#error nope\n",
        "void main() {}\n",
    ));
    assert!(matches!(f.get(&unlit(vec![])), Err(Error::CompileError { .. })));
    assert!(f.provider.is_empty());
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_clear_shaders_empties_pool_and_deletes_programs() {
    let mut f = Fixture::new();
    f.get(&unlit(vec![diffuse_texture()])).unwrap();
    f.get(&unlit(vec![])).unwrap();
    assert_eq!(f.device.live_programs(), 2);

    f.provider.handle_event(&mut f.device, ContextEvent::ClearShaders);
    assert!(f.provider.is_empty());
    assert_eq!(f.device.live_programs(), 0);

    // Rebuilt from scratch
    f.get(&unlit(vec![])).unwrap();
    assert_eq!(f.provider.len(), 1);
    assert_eq!(f.device.links, 3);
}

#[test]
fn test_context_lost_forgets_without_device_calls() {
    let mut f = Fixture::new();
    let key = f.get(&unlit(vec![])).unwrap();
    f.device.clear_log();

    f.provider.handle_event(&mut f.device, ContextEvent::ContextLost);
    assert!(f.provider.is_empty());
    assert!(f.provider.variant(key).is_none());
    assert_eq!(f.device.count_commands("delete_program"), 0);
}
