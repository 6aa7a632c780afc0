/// Renderable - the object handed to the shader subsystem by the scene layer.
///
/// Read-only from the subsystem's point of view: variant selection, prefix
/// generation and uniform setters only ever borrow it.

use std::sync::Arc;
use glam::{Mat3, Mat4};
use crate::attribute::{AttributeMask, AttributeSet};
use crate::device::{MeshId, PrimitiveTopology};
use super::vertex_layout::VertexLayout;

/// Range of a mesh to draw
#[derive(Debug, Clone)]
pub struct MeshPart {
    pub mesh: MeshId,
    pub layout: Arc<VertexLayout>,
    pub primitive: PrimitiveTopology,
    /// First index (or vertex when not indexed)
    pub offset: u32,
    /// Number of indices (or vertices)
    pub count: u32,
    pub indexed: bool,
}

impl MeshPart {
    pub fn new(mesh: MeshId, layout: Arc<VertexLayout>, count: u32) -> Self {
        Self {
            mesh,
            layout,
            primitive: PrimitiveTopology::TriangleList,
            offset: 0,
            count,
            indexed: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderable {
    pub material: AttributeSet,
    /// Lights, fog, shadows. `None` renders unlit.
    pub environment: Option<AttributeSet>,
    pub mesh_part: MeshPart,
    pub world_transform: Mat4,
}

impl Renderable {
    pub fn new(mesh_part: MeshPart, material: AttributeSet) -> Self {
        Self {
            material,
            environment: None,
            mesh_part,
            world_transform: Mat4::IDENTITY,
        }
    }

    pub fn with_environment(mut self, environment: AttributeSet) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_world_transform(mut self, world_transform: Mat4) -> Self {
        self.world_transform = world_transform;
        self
    }

    /// Environment then material; material wins on conflicting tags
    pub fn combined_attributes(&self) -> AttributeSet {
        match &self.environment {
            Some(environment) => AttributeSet::combined(environment, &self.material),
            None => self.material.clone(),
        }
    }

    pub fn combined_mask(&self) -> AttributeMask {
        let environment = self
            .environment
            .as_ref()
            .map(AttributeSet::mask)
            .unwrap_or(AttributeMask::EMPTY);
        self.material.mask() | environment
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.mesh_part.layout
    }

    /// Packed vertex mask (see `VertexLayout::mask_with_size_packed`)
    pub fn vertex_mask(&self) -> u64 {
        self.mesh_part.layout.mask_with_size_packed()
    }

    pub fn has_lighting(&self) -> bool {
        self.environment.is_some()
    }

    /// True when the upper 3x3 of the world transform collapses the object
    pub fn is_degenerate(&self) -> bool {
        Mat3::from_mat4(self.world_transform).determinant() == 0.0
    }
}

#[cfg(test)]
#[path = "renderable_tests.rs"]
mod tests;
