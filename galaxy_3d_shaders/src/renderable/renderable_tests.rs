use std::sync::Arc;
use glam::{Mat4, Vec3, Vec4};
use crate::attribute::{Attribute, AttributeSet, AttributeType, AttributeValue};
use crate::device::MeshId;
use crate::renderable::{VertexAttributeDesc, VertexLayout};
use super::*;

fn mesh_part() -> MeshPart {
    let layout = Arc::new(VertexLayout::new(vec![
        VertexAttributeDesc::position(),
        VertexAttributeDesc::normal(),
    ]));
    MeshPart::new(MeshId(1), layout, 36)
}

#[test]
fn test_unlit_renderable() {
    let renderable = Renderable::new(
        mesh_part(),
        AttributeSet::from_attributes([Attribute::diffuse_color(Vec4::ONE)]),
    );
    assert!(!renderable.has_lighting());
    assert_eq!(renderable.combined_mask(), renderable.material.mask());
    assert_eq!(renderable.combined_attributes(), renderable.material);
}

#[test]
fn test_combined_attributes_material_wins() {
    let environment = AttributeSet::from_attributes([
        Attribute::fog_color(Vec4::ZERO),
        Attribute::diffuse_color(Vec4::ZERO),
    ]);
    let material = AttributeSet::from_attributes([Attribute::diffuse_color(Vec4::ONE)]);
    let renderable = Renderable::new(mesh_part(), material).with_environment(environment);

    let combined = renderable.combined_attributes();
    assert!(renderable.has_lighting());
    assert!(combined.has(AttributeType::FOG_COLOR));
    assert_eq!(
        combined.value(AttributeType::DIFFUSE_COLOR).and_then(AttributeValue::as_color),
        Some(Vec4::ONE)
    );
    assert_eq!(combined.mask(), renderable.combined_mask());
}

#[test]
fn test_vertex_mask_comes_from_layout() {
    let renderable = Renderable::new(mesh_part(), AttributeSet::new());
    assert_eq!(renderable.vertex_mask(), renderable.vertex_layout().mask_with_size_packed());
}

#[test]
fn test_degenerate_world_transform() {
    let renderable = Renderable::new(mesh_part(), AttributeSet::new());
    assert!(!renderable.is_degenerate());

    let flat = renderable.clone().with_world_transform(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));
    assert!(flat.is_degenerate());

    let moved = renderable.with_world_transform(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
    assert!(!moved.is_degenerate());
}
