//! Camera module: the camera state consumed by global uniforms.

mod camera;

pub use camera::Camera;
