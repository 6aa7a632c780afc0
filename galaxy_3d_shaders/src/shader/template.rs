/// ShaderTemplate - named set of stage sources plus the features that
/// specialise them.
///
/// Features are walked in the order they were added. The presets below add
/// them in the canonical order (core, relativistic, atmosphere ground,
/// tessellation) so the prefix of a given renderable never changes between
/// runs.

use std::fmt;
use crate::attribute::AttributeMask;
use crate::device::ShaderStage;
use crate::error::Result;
use super::features::{AtmosphereGroundFeature, CoreFeature, RelativisticFeature, TessellationFeature};
use super::prefix::{assemble_source, generate_prefix, PrefixInput, ShaderFeature};
use super::program_cache::{StageSource, DEFAULT_PROGRAM_NAME};
use super::uniform_registry::UniformRegistry;

pub struct ShaderTemplate {
    name: String,
    stages: Vec<StageSource>,
    features: Vec<Box<dyn ShaderFeature>>,
}

impl ShaderTemplate {
    /// Vertex + fragment template with no features
    pub fn new(name: impl Into<String>, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: vec![
                StageSource::new(ShaderStage::Vertex, vertex),
                StageSource::new(ShaderStage::Fragment, fragment),
            ],
            features: Vec::new(),
        }
    }

    // ===== PRESETS =====

    /// The `default` shader: core feature only
    pub fn default_shader(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(DEFAULT_PROGRAM_NAME, vertex, fragment).with_feature(CoreFeature)
    }

    /// Core + relativistic effects
    pub fn relativistic(name: impl Into<String>, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(name, vertex, fragment)
            .with_feature(CoreFeature)
            .with_feature(RelativisticFeature)
    }

    /// Planet surface seen through its atmosphere
    pub fn ground(name: impl Into<String>, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::relativistic(name, vertex, fragment).with_feature(AtmosphereGroundFeature)
    }

    /// Tessellated planet surface: all four features, five stages
    pub fn tessellated_ground(
        name: impl Into<String>,
        vertex: impl Into<String>,
        tess_control: impl Into<String>,
        tess_evaluation: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self::ground(name, vertex, fragment)
            .with_stage(ShaderStage::TessControl, tess_control)
            .with_stage(ShaderStage::TessEvaluation, tess_evaluation)
            .with_feature(TessellationFeature)
    }

    // ===== BUILDER =====

    /// Add or replace a stage
    pub fn with_stage(mut self, stage: ShaderStage, source: impl Into<String>) -> Self {
        let source = StageSource::new(stage, source);
        match self.stages.iter_mut().find(|s| s.stage == stage) {
            Some(existing) => *existing = source,
            None => {
                self.stages.push(source);
                self.stages.sort_by_key(|s| s.stage.order());
            }
        }
        self
    }

    pub fn with_feature(mut self, feature: impl ShaderFeature + 'static) -> Self {
        self.features.push(Box::new(feature));
        self
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage sources without prefix, in pipeline order
    pub fn stages(&self) -> &[StageSource] {
        &self.stages
    }

    pub fn features(&self) -> &[Box<dyn ShaderFeature>] {
        &self.features
    }

    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        self.stages.iter().any(|s| s.stage == stage)
    }

    /// Union of what every feature implements
    pub fn implemented(&self) -> AttributeMask {
        self.features
            .iter()
            .fold(AttributeMask::EMPTY, |mask, feature| mask | feature.implemented())
    }

    // ===== SPECIALISATION =====

    pub fn prefix(&self, input: &PrefixInput<'_>) -> String {
        generate_prefix(&self.features, input)
    }

    /// Every stage with `prefix` inserted
    pub fn assemble(&self, prefix: &str) -> Vec<StageSource> {
        self.stages
            .iter()
            .map(|s| StageSource::new(s.stage, assemble_source(prefix, &s.source)))
            .collect()
    }

    pub fn register_uniforms(&self, input: &PrefixInput<'_>, registry: &mut UniformRegistry) -> Result<()> {
        for feature in &self.features {
            feature.register_uniforms(input, registry)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShaderTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderTemplate")
            .field("name", &self.name)
            .field("stages", &self.stages.iter().map(|s| s.stage).collect::<Vec<_>>())
            .field("features", &self.features.iter().map(|x| x.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
