/// Prefix generation.
///
/// A variant is a shader template specialised by a block of `#define` lines.
/// Each `ShaderFeature` contributes its own lines and uniforms; the template
/// lists its features in a fixed order and the generator walks them in that
/// order, so equal inputs always give byte-identical prefixes and therefore
/// the same cache key.

use std::fmt::Write;
use crate::attribute::{AttributeMask, AttributeSet};
use crate::config::ShaderConfig;
use crate::error::Result;
use crate::renderable::{Renderable, VertexLayout};
use super::uniform_registry::UniformRegistry;

/// Everything a feature may look at while specialising a variant
#[derive(Debug, Clone, Copy)]
pub struct PrefixInput<'a> {
    /// Environment then material
    pub attributes: &'a AttributeSet,
    pub layout: &'a VertexLayout,
    /// An environment is present
    pub lighting: bool,
    pub config: &'a ShaderConfig,
}

impl<'a> PrefixInput<'a> {
    pub fn new(renderable: &'a Renderable, attributes: &'a AttributeSet, config: &'a ShaderConfig) -> Self {
        Self {
            attributes,
            layout: renderable.vertex_layout(),
            lighting: renderable.has_lighting(),
            config,
        }
    }
}

/// One independent slice of shader functionality
pub trait ShaderFeature: Send + Sync {
    fn name(&self) -> &'static str;

    /// Attribute tags this feature knows how to render
    fn implemented(&self) -> AttributeMask;

    /// Append this feature's `#define` lines
    fn write_prefix(&self, input: &PrefixInput<'_>, prefix: &mut String);

    /// Register this feature's uniforms and setters
    fn register_uniforms(&self, input: &PrefixInput<'_>, registry: &mut UniformRegistry) -> Result<()>;
}

/// Append `#define <flag>\n`
pub fn define(prefix: &mut String, flag: &str) {
    prefix.push_str("#define ");
    prefix.push_str(flag);
    prefix.push('\n');
}

/// Append `#define <name> <value>\n`
pub fn define_value(prefix: &mut String, name: &str, value: impl std::fmt::Display) {
    let _ = writeln!(prefix, "#define {} {}", name, value);
}

/// Walk `features` in order and concatenate their prefix lines
pub fn generate_prefix(features: &[Box<dyn ShaderFeature>], input: &PrefixInput<'_>) -> String {
    let mut prefix = String::new();
    for feature in features {
        feature.write_prefix(input, &mut prefix);
    }
    prefix
}

/// Insert `prefix` into a template source.
///
/// GLSL wants `#version` first, so when the template starts with one the
/// prefix goes right after that line; otherwise it is prepended.
pub fn assemble_source(prefix: &str, template: &str) -> String {
    let body = template.trim_start_matches('\u{feff}');
    let trimmed = body.trim_start();
    if trimmed.starts_with("#version") {
        let (version, rest) = match trimmed.find('\n') {
            Some(end) => trimmed.split_at(end + 1),
            None => (trimmed, ""),
        };
        let mut source = String::with_capacity(version.len() + prefix.len() + rest.len() + 1);
        source.push_str(version);
        if !version.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(prefix);
        source.push_str(rest);
        source
    } else {
        let mut source = String::with_capacity(prefix.len() + body.len());
        source.push_str(prefix);
        source.push_str(body);
        source
    }
}

#[cfg(test)]
#[path = "prefix_tests.rs"]
mod tests;
