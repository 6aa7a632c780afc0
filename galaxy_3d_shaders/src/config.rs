//! Shader subsystem configuration
//!
//! Plain data: the application fills it from its own settings layer.

use std::path::PathBuf;
use crate::device::{CompareOp, CullMode};

/// Configuration shared by the program cache, the shader providers and the
/// render binder
#[derive(Debug, Clone)]
pub struct ShaderConfig {
    /// Global "enable shader cache" flag
    pub shader_cache: bool,
    /// Safe graphics mode; forces cold compiles
    pub safe_mode: bool,
    /// Cache directory override. `None` uses the platform cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Fail variant creation on attributes no feature implements
    pub strict: bool,
    /// Fail variant creation when an applicable uniform has no location
    pub pedantic: bool,
    pub num_directional_lights: u32,
    pub num_point_lights: u32,
    /// Bones per skinned vertex, 0 disables `numBones`
    pub num_bones: u32,
    /// Cull mode for materials without a cull-face attribute
    pub default_cull_face: CullMode,
    /// Depth function for materials without a depth-test attribute
    pub default_depth_func: CompareOp,
    /// Screen-space reflections
    pub ssr: bool,
    /// Upper bound on texture units handed out per frame
    pub max_texture_units: u32,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            shader_cache: true,
            safe_mode: false,
            cache_dir: None,
            strict: false,
            pedantic: false,
            num_directional_lights: 2,
            num_point_lights: 0,
            num_bones: 0,
            default_cull_face: CullMode::Back,
            default_depth_func: CompareOp::LessOrEqual,
            ssr: false,
            max_texture_units: 16,
        }
    }
}

impl ShaderConfig {
    /// Whether the configuration allows the binary cache at all
    pub fn cache_allowed(&self) -> bool {
        self.shader_cache && !self.safe_mode
    }

    /// Explicit directory, else `<platform cache dir>/shaders`
    pub fn resolve_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(default_cache_dir)
    }
}

/// Platform cache directory for program binaries
///
/// - Linux: `$XDG_CACHE_HOME/galaxy3d/shaders` (or `~/.cache/galaxy3d/shaders`)
/// - macOS: `~/Library/Caches/org.galaxy3d.galaxy3d/shaders`
/// - Windows: `%LOCALAPPDATA%\galaxy3d\galaxy3d\cache\shaders`
pub fn default_cache_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "galaxy3d", "galaxy3d")
        .map(|dirs| dirs.cache_dir().join("shaders"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
