//! Built-in shader features, composed by `ShaderTemplate` in this order:
//! core, relativistic, atmosphere ground, tessellation.

mod atmosphere;
mod core;
mod relativistic;
mod tessellation;

pub use self::atmosphere::AtmosphereGroundFeature;
pub use self::core::CoreFeature;
pub use self::relativistic::RelativisticFeature;
pub use self::tessellation::TessellationFeature;
