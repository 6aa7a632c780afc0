/// Device module - the graphics-context seam and its shared types

pub mod graphics_device;
pub mod types;

pub use graphics_device::*;
pub use types::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
