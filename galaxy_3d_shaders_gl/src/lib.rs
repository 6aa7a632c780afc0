/*!
# Galaxy 3D Shaders - OpenGL Backend

OpenGL implementation of the `GraphicsDevice` trait of `galaxy_3d_shaders`,
on top of the glow bindings.

The application creates the GL context (glutin, SDL, a browser canvas...),
wraps it in a `glow::Context` and hands it to `GlDevice::new`. Textures and
meshes are registered with the device to get the handles the shader system
works with.
*/

mod gl_convert;
mod gl_device;
#[cfg(feature = "gl-debug")]
mod debug;

pub use gl_device::{GlDevice, GlMesh};

#[cfg(feature = "gl-debug")]
pub use debug::{get_debug_stats, install_debug_callback, print_debug_stats_report, DebugStats};

pub use glow;
