//! Attribute module: typed render attributes, sets and 128-bit masks.

mod attribute;
mod attribute_set;
mod mask;

pub use attribute::{
    Attribute, AttributeType, AttributeValue,
    AtmosphereParams, BlendState, DepthState, DirectionalLight,
    GravitationalWave, PointLight, ShadowMap,
};
pub use attribute_set::AttributeSet;
pub use mask::AttributeMask;
