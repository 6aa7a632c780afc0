/// Uniform registry of one shader variant.
///
/// Uniforms are registered before the program exists. `init` runs once
/// against the linked program and the renderable the variant was built for:
/// it fetches locations, drops the uniforms that do not apply, and splits the
/// remaining setters into global and local id lists so the render loop never
/// scans the whole table.

use rustc_hash::FxHashMap;
use crate::device::{GraphicsDevice, ProgramHandle, UniformLocation};
use crate::error::{protocol_violation, Error, Result};
use crate::renderable::Renderable;
use super::uniform::{Uniform, UniformKind, UniformScope};

/// Index of a registered uniform
pub type UniformId = usize;

#[derive(Debug, Clone)]
struct UniformEntry {
    uniform: Uniform,
    kind: Option<UniformKind>,
    location: Option<UniformLocation>,
}

#[derive(Debug, Default)]
pub struct UniformRegistry {
    entries: Vec<UniformEntry>,
    by_alias: FxHashMap<String, UniformId>,
    global_ids: Vec<UniformId>,
    local_ids: Vec<UniformId>,
    initialized: bool,
}

impl UniformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a uniform and its setter.
    ///
    /// Registering an alias twice overwrites the descriptor and setter and
    /// returns the existing id.
    pub fn register(&mut self, uniform: Uniform, kind: Option<UniformKind>) -> Result<UniformId> {
        if self.initialized {
            return Err(protocol_violation(
                "galaxy3d::UniformRegistry",
                format!("Cannot register uniform '{}' after init", uniform.alias),
            ));
        }
        if let Some(&id) = self.by_alias.get(&uniform.alias) {
            self.entries[id] = UniformEntry { uniform, kind, location: None };
            return Ok(id);
        }
        let id = self.entries.len();
        self.by_alias.insert(uniform.alias.clone(), id);
        self.entries.push(UniformEntry { uniform, kind, location: None });
        Ok(id)
    }

    /// Register an always-applicable uniform with a setter
    pub fn register_with(&mut self, alias: &str, kind: UniformKind) -> Result<UniformId> {
        self.register(Uniform::new(alias), Some(kind))
    }

    pub fn uniform_id(&self, alias: &str) -> Option<UniformId> {
        self.by_alias.get(alias).copied()
    }

    /// Resolve locations against `program`.
    ///
    /// # Errors
    ///
    /// - `ProtocolViolation` on a second call
    /// - `MissingUniform` when `pedantic` is set and an applicable uniform
    ///   has no location
    pub fn init(
        &mut self,
        device: &mut dyn GraphicsDevice,
        program: ProgramHandle,
        renderable: &Renderable,
        pedantic: bool,
        program_name: &str,
    ) -> Result<()> {
        if self.initialized {
            return Err(protocol_violation(
                "galaxy3d::UniformRegistry",
                format!("Uniform registry of '{}' initialized twice", program_name),
            ));
        }
        self.initialized = true;

        for (id, entry) in self.entries.iter_mut().enumerate() {
            if !entry.uniform.validate(renderable) {
                entry.location = None;
                entry.kind = None;
                continue;
            }

            entry.location = device.uniform_location(program, &entry.uniform.alias);
            if entry.location.is_none() {
                if pedantic {
                    crate::engine_error!("galaxy3d::UniformRegistry",
                        "Uniform '{}' has no location in '{}'", entry.uniform.alias, program_name);
                    return Err(Error::MissingUniform {
                        name: program_name.to_string(),
                        alias: entry.uniform.alias.clone(),
                    });
                }
                continue;
            }

            match entry.kind.map(UniformKind::scope) {
                Some(UniformScope::Global) => self.global_ids.push(id),
                Some(UniformScope::Local) => self.local_ids.push(id),
                None => {}
            }
        }

        crate::engine_debug!("galaxy3d::UniformRegistry",
            "'{}': {} uniforms, {} global, {} local",
            program_name, self.entries.len(), self.global_ids.len(), self.local_ids.len());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the uniform resolved to a location
    pub fn has(&self, id: UniformId) -> bool {
        self.location(id).is_some()
    }

    pub fn location(&self, id: UniformId) -> Option<UniformLocation> {
        self.entries.get(id).and_then(|e| e.location)
    }

    /// Location of a uniform by alias
    pub fn location_of(&self, alias: &str) -> Option<UniformLocation> {
        self.uniform_id(alias).and_then(|id| self.location(id))
    }

    pub fn alias(&self, id: UniformId) -> Option<&str> {
        self.entries.get(id).map(|e| e.uniform.alias.as_str())
    }

    pub fn kind(&self, id: UniformId) -> Option<UniformKind> {
        self.entries.get(id).and_then(|e| e.kind)
    }

    /// Uniforms set once per `begin`, in registration order
    pub fn global_ids(&self) -> &[UniformId] {
        &self.global_ids
    }

    /// Uniforms set once per `render`, in registration order
    pub fn local_ids(&self) -> &[UniformId] {
        &self.local_ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "uniform_registry_tests.rs"]
mod tests;
