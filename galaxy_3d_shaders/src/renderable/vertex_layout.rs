/// Vertex layout of a mesh as seen by the shader subsystem.
///
/// Only the usages, component counts and aliases matter here: they drive the
/// vertex `#define` flags, the variant's vertex mask and attribute location
/// lookup. Buffer ownership stays with the asset layer.

use bitflags::bitflags;

bitflags! {
    /// Semantic usage of a vertex attribute
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VertexUsage: u32 {
        const POSITION = 1;
        const COLOR_UNPACKED = 1 << 1;
        const COLOR_PACKED = 1 << 2;
        const NORMAL = 1 << 3;
        const TEXTURE_COORDINATES = 1 << 4;
        const GENERIC = 1 << 5;
        const BONE_WEIGHT = 1 << 6;
        const TANGENT = 1 << 7;
        const BINORMAL = 1 << 8;
    }
}

/// One attribute of a vertex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttributeDesc {
    pub usage: VertexUsage,
    /// Number of components (1..=4)
    pub components: u8,
    /// Texture/bone unit for multi-unit usages
    pub unit: u8,
    /// Name of the attribute in the shader source
    pub alias: String,
    /// Byte offset inside the vertex, filled by `VertexLayout::new`
    pub offset: u32,
}

impl VertexAttributeDesc {
    pub fn new(usage: VertexUsage, components: u8, unit: u8, alias: impl Into<String>) -> Self {
        Self { usage, components, unit, alias: alias.into(), offset: 0 }
    }

    pub fn position() -> Self {
        Self::new(VertexUsage::POSITION, 3, 0, "a_position")
    }

    pub fn normal() -> Self {
        Self::new(VertexUsage::NORMAL, 3, 0, "a_normal")
    }

    pub fn color() -> Self {
        Self::new(VertexUsage::COLOR_UNPACKED, 4, 0, "a_color")
    }

    pub fn color_packed() -> Self {
        Self::new(VertexUsage::COLOR_PACKED, 4, 0, "a_color")
    }

    pub fn tangent() -> Self {
        Self::new(VertexUsage::TANGENT, 3, 0, "a_tangent")
    }

    pub fn binormal() -> Self {
        Self::new(VertexUsage::BINORMAL, 3, 0, "a_binormal")
    }

    pub fn tex_coords(unit: u8) -> Self {
        Self::new(VertexUsage::TEXTURE_COORDINATES, 2, unit, format!("a_texCoord{}", unit))
    }

    pub fn bone_weight(unit: u8) -> Self {
        Self::new(VertexUsage::BONE_WEIGHT, 2, unit, format!("a_boneWeight{}", unit))
    }

    /// Size in bytes (packed colors take four bytes, everything else f32 components)
    pub fn size_bytes(&self) -> u32 {
        if self.usage == VertexUsage::COLOR_PACKED {
            4
        } else {
            self.components as u32 * 4
        }
    }
}

/// Ordered list of vertex attributes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexLayout {
    attributes: Vec<VertexAttributeDesc>,
    stride: u32,
}

impl VertexLayout {
    /// Lay attributes out back to back and compute the stride
    pub fn new(attributes: Vec<VertexAttributeDesc>) -> Self {
        let mut offset = 0;
        let attributes: Vec<_> = attributes
            .into_iter()
            .map(|mut attribute| {
                attribute.offset = offset;
                offset += attribute.size_bytes();
                attribute
            })
            .collect();
        Self { attributes, stride: offset }
    }

    pub fn attributes(&self) -> &[VertexAttributeDesc] {
        &self.attributes
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Union of every attribute usage
    pub fn mask(&self) -> VertexUsage {
        self.attributes
            .iter()
            .fold(VertexUsage::empty(), |mask, attribute| mask | attribute.usage)
    }

    pub fn has(&self, usage: VertexUsage) -> bool {
        self.mask().contains(usage)
    }

    /// Usage bits in the low word, attribute count in the high word.
    ///
    /// Two layouts with the same usages but a different number of
    /// attributes (e.g. one vs. two texture units) get different values.
    pub fn mask_with_size_packed(&self) -> u64 {
        self.mask().bits() as u64 | ((self.attributes.len() as u64) << 32)
    }
}

#[cfg(test)]
#[path = "vertex_layout_tests.rs"]
mod tests;
