use crate::device::mock_device::MockDevice;
use crate::device::{BlendFactor, CompareOp, CullMode, TextureHandle};
use super::*;

// ============================================================================
// Texture binder
// ============================================================================

#[test]
fn test_texture_binder_reuses_bound_unit() {
    let mut device = MockDevice::new();
    let mut binder = TextureBinder::new(4);

    assert_eq!(binder.bind(&mut device, TextureHandle(10)), 0);
    assert_eq!(binder.bind(&mut device, TextureHandle(11)), 1);
    assert_eq!(binder.bind(&mut device, TextureHandle(10)), 0);
    assert_eq!(binder.binds(), 2);
    assert_eq!(binder.reuses(), 1);
    assert_eq!(device.count_commands("bind_texture"), 2);
}

#[test]
fn test_texture_binder_evicts_least_recently_used() {
    let mut device = MockDevice::new();
    let mut binder = TextureBinder::new(2);

    binder.bind(&mut device, TextureHandle(1));
    binder.bind(&mut device, TextureHandle(2));
    // Texture 1 is the oldest
    assert_eq!(binder.bind(&mut device, TextureHandle(3)), 0);
    assert_eq!(binder.bind(&mut device, TextureHandle(1)), 1);
}

#[test]
fn test_texture_binder_reuse_protects_unit() {
    let mut device = MockDevice::new();
    let mut binder = TextureBinder::new(4);
    for id in 1..=4 {
        binder.bind(&mut device, TextureHandle(id));
    }

    let reused = binder.bind(&mut device, TextureHandle(1));
    let fresh = binder.bind(&mut device, TextureHandle(5));

    assert_eq!(reused, 0);
    assert_eq!(fresh, 1);
    // Texture 1 is still where its sampler points
    assert_eq!(binder.bind(&mut device, TextureHandle(1)), 0);
    assert_eq!(binder.reuses(), 2);
    assert_eq!(device.count_commands("bind_texture"), 5);
}

#[test]
fn test_texture_binder_reset() {
    let mut device = MockDevice::new();
    let mut binder = TextureBinder::new(2);
    binder.bind(&mut device, TextureHandle(1));
    binder.reset();

    assert_eq!(binder.binds(), 0);
    assert_eq!(binder.bind(&mut device, TextureHandle(1)), 0);
    assert_eq!(device.count_commands("bind_texture"), 2);
}

#[test]
fn test_texture_binder_has_at_least_one_unit() {
    assert_eq!(TextureBinder::new(0).unit_count(), 1);
}

// ============================================================================
// State cache
// ============================================================================

#[test]
fn test_redundant_state_is_filtered() {
    let mut device = MockDevice::new();
    let mut context = RenderContext::new(8);

    context.set_cull_face(&mut device, CullMode::Back);
    context.set_cull_face(&mut device, CullMode::Back);
    context.set_depth_test(&mut device, Some(CompareOp::LessOrEqual), 0.0, 1.0);
    context.set_depth_test(&mut device, Some(CompareOp::LessOrEqual), 0.0, 1.0);
    context.set_depth_mask(&mut device, true);
    context.set_depth_mask(&mut device, true);

    assert_eq!(device.count_commands("set_cull_face"), 1);
    assert_eq!(device.count_commands("set_depth_test"), 1);
    assert_eq!(device.count_commands("set_depth_mask"), 1);
}

#[test]
fn test_changes_reach_device() {
    let mut device = MockDevice::new();
    let mut context = RenderContext::new(8);

    context.set_cull_face(&mut device, CullMode::Back);
    context.set_cull_face(&mut device, CullMode::None);
    context.set_depth_test(&mut device, Some(CompareOp::Less), 0.0, 1.0);
    context.set_depth_test(&mut device, None, 0.0, 1.0);

    assert_eq!(device.count_commands("set_cull_face"), 2);
    assert_eq!(device.count_commands("set_depth_test"), 2);
}

#[test]
fn test_disabled_blending_ignores_factors() {
    let mut device = MockDevice::new();
    let mut context = RenderContext::new(8);

    context.set_blending(&mut device, false, BlendFactor::One, BlendFactor::Zero);
    context.set_blending(&mut device, false, BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
    assert_eq!(device.count_commands("set_blending"), 1);

    context.set_blending(&mut device, true, BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
    context.set_blending(&mut device, true, BlendFactor::SrcAlpha, BlendFactor::One);
    assert_eq!(device.count_commands("set_blending"), 3);
}

#[test]
fn test_begin_forgets_cached_state() {
    let mut device = MockDevice::new();
    let mut context = RenderContext::new(8);

    context.set_cull_face(&mut device, CullMode::Back);
    context.bind_texture(&mut device, TextureHandle(1));
    context.begin();
    context.set_cull_face(&mut device, CullMode::Back);
    context.bind_texture(&mut device, TextureHandle(1));

    assert_eq!(device.count_commands("set_cull_face"), 2);
    assert_eq!(device.count_commands("bind_texture"), 2);
    assert_eq!(context.textures().binds(), 1);
}
