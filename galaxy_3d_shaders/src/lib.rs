/*!
# Galaxy 3D Shaders

Shader-variant management and GPU program binary cache for the Galaxy 3D
renderer.

A renderable describes what it needs visually as an attribute set (material
plus environment) and a vertex layout. This crate turns that description into
a compiled, linked program and keeps it around:

- **AttributeSet**: typed render attributes indexed by a 128-bit mask
- **ShaderFeature**: independent slice of a shader, contributing `#define`
  lines and uniforms
- **UniformRegistry**: per-variant uniform table split into global and local
  setters
- **ProgramCache**: compiles and links stages, stores the driver binary on
  disk keyed by a hash of the sources
- **ShaderProvider**: pool of variants of one template
- **RenderBinder**: `begin` / `render` / `end` frame protocol
- **ShaderSystem**: all of the above for one graphics context

The graphics context itself sits behind the `GraphicsDevice` trait; the
OpenGL implementation lives in `galaxy_3d_shaders_gl`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod attribute;
pub mod camera;
pub mod config;
pub mod device;
pub mod renderable;
pub mod shader;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logger)
    pub use crate::engine::Engine;

    // Logging sub-module (types only; macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    pub mod attribute {
        pub use crate::attribute::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod config {
        pub use crate::config::*;
    }

    pub mod device {
        pub use crate::device::*;
    }

    pub mod renderable {
        pub use crate::renderable::*;
    }

    pub mod shader {
        pub use crate::shader::*;
    }
}

// Re-export math library at crate root
pub use glam;
