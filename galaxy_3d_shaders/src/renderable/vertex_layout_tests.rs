use super::*;

fn pnt_layout() -> VertexLayout {
    VertexLayout::new(vec![
        VertexAttributeDesc::position(),
        VertexAttributeDesc::normal(),
        VertexAttributeDesc::tex_coords(0),
    ])
}

// ============================================================================
// Offsets and stride
// ============================================================================

#[test]
fn test_offsets_are_back_to_back() {
    let layout = pnt_layout();
    let offsets: Vec<u32> = layout.attributes().iter().map(|a| a.offset).collect();
    assert_eq!(offsets, vec![0, 12, 24]);
    assert_eq!(layout.stride(), 32);
}

#[test]
fn test_packed_color_is_four_bytes() {
    let layout = VertexLayout::new(vec![
        VertexAttributeDesc::position(),
        VertexAttributeDesc::color_packed(),
    ]);
    assert_eq!(layout.stride(), 16);
}

#[test]
fn test_aliases() {
    assert_eq!(VertexAttributeDesc::tex_coords(1).alias, "a_texCoord1");
    assert_eq!(VertexAttributeDesc::bone_weight(0).alias, "a_boneWeight0");
}

// ============================================================================
// Masks
// ============================================================================

#[test]
fn test_mask_is_union_of_usages() {
    let layout = pnt_layout();
    assert_eq!(
        layout.mask(),
        VertexUsage::POSITION | VertexUsage::NORMAL | VertexUsage::TEXTURE_COORDINATES
    );
    assert!(layout.has(VertexUsage::NORMAL));
    assert!(!layout.has(VertexUsage::TANGENT));
}

#[test]
fn test_packed_mask_includes_attribute_count() {
    let one_unit = pnt_layout();
    let two_units = VertexLayout::new(vec![
        VertexAttributeDesc::position(),
        VertexAttributeDesc::normal(),
        VertexAttributeDesc::tex_coords(0),
        VertexAttributeDesc::tex_coords(1),
    ]);

    assert_eq!(one_unit.mask(), two_units.mask());
    assert_ne!(one_unit.mask_with_size_packed(), two_units.mask_with_size_packed());
    assert_eq!(one_unit.mask_with_size_packed() >> 32, 3);
}

#[test]
fn test_empty_layout() {
    let layout = VertexLayout::default();
    assert!(layout.is_empty());
    assert_eq!(layout.mask_with_size_packed(), 0);
}
