//! Renderable module: the renderable contract consumed by the shader pool.

mod renderable;
mod vertex_layout;

pub use renderable::{MeshPart, Renderable};
pub use vertex_layout::{VertexAttributeDesc, VertexLayout, VertexUsage};
