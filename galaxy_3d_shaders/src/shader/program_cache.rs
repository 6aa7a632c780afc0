/// Program compiler and binary cache.
///
/// Linked programs are stored on disk as the driver's own binary, keyed by a
/// hash of the stage sources:
///
/// ```text
/// <cache dir>/<name>_<xxh3 of sources, 16 hex digits>_<binary format>.bin
/// ```
///
/// A changed source is a new hash and therefore a new file; entries are never
/// rewritten in place and old ones are never collected here. Every cache
/// failure is logged and falls back to a cold compile.

use std::fs;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;
use crate::config::ShaderConfig;
use crate::device::{GraphicsDevice, ProgramBinary, ProgramHandle, ShaderStage, StageHandle};
use crate::error::{Error, Result};

/// Program name used when the caller gives none
pub const DEFAULT_PROGRAM_NAME: &str = "default";

const CACHE_EXTENSION: &str = "bin";

/// One stage of a program, fully assembled (prefix included)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSource {
    pub stage: ShaderStage,
    pub source: String,
}

impl StageSource {
    pub fn new(stage: ShaderStage, source: impl Into<String>) -> Self {
        Self { stage, source: source.into() }
    }
}

/// Result of `ProgramCache::compile`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledProgram {
    pub program: ProgramHandle,
    /// Loaded from a cached binary, no stage was compiled
    pub from_cache: bool,
}

// ===== NAMING =====

/// Stable content hash of the stage sources, concatenated in pipeline order
pub fn content_hash(sources: &[StageSource]) -> String {
    let mut ordered: Vec<&StageSource> = sources.iter().collect();
    ordered.sort_by_key(|s| s.stage.order());
    let concatenated: String = ordered.iter().map(|s| s.source.as_str()).collect();
    format!("{:016x}", xxh3_64(concatenated.as_bytes()))
}

/// `<name>_<hash>_<format>.bin`
pub fn cache_file_name(name: &str, hash: &str, format: u32) -> String {
    format!("{}_{}_{}.{}", name, hash, format, CACHE_EXTENSION)
}

/// Split a cache file name into `(name, hash, format)`.
///
/// Names may contain underscores, so the two trailing fields are taken from
/// the right. Anything that does not parse is not a cache entry.
pub fn parse_cache_file_name(file_name: &str) -> Option<(&str, &str, u32)> {
    let stem = file_name.strip_suffix(".bin")?;
    let mut fields = stem.rsplitn(3, '_');
    let format = fields.next()?.parse::<u32>().ok()?;
    let hash = fields.next()?;
    let name = fields.next()?;
    if name.is_empty() || hash.is_empty() {
        return None;
    }
    Some((name, hash, format))
}

// ===== PROGRAM CACHE =====

#[derive(Debug, Clone, Default)]
pub struct ProgramCache {
    /// `None` when the cache is disabled
    directory: Option<PathBuf>,
}

impl ProgramCache {
    /// Decide once whether binaries may be cached.
    ///
    /// The cache needs the configuration to allow it, a driver that hands out
    /// program binaries and a directory that exists or can be created.
    pub fn new(config: &ShaderConfig, device: &dyn GraphicsDevice) -> Self {
        if !config.cache_allowed() {
            crate::engine_debug!("galaxy3d::ProgramCache",
                "Shader cache disabled by configuration (shader_cache={}, safe_mode={})",
                config.shader_cache, config.safe_mode);
            return Self::disabled();
        }
        if !device.supports_program_binary() {
            crate::engine_info!("galaxy3d::ProgramCache",
                "Driver does not support program binaries, shader cache disabled");
            return Self::disabled();
        }
        let Some(directory) = config.resolve_cache_dir() else {
            crate::engine_warn!("galaxy3d::ProgramCache",
                "No cache directory available, shader cache disabled");
            return Self::disabled();
        };
        if let Err(e) = fs::create_dir_all(&directory) {
            crate::engine_warn!("galaxy3d::ProgramCache",
                "Cannot create cache directory {}: {}", directory.display(), e);
            return Self::disabled();
        }

        crate::engine_info!("galaxy3d::ProgramCache", "Shader cache at {}", directory.display());
        Self { directory: Some(directory) }
    }

    /// Cache that always compiles cold
    pub fn disabled() -> Self {
        Self { directory: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.directory.is_some()
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Produce a linked program for `sources`.
    ///
    /// Tries the binary cache first, then compiles and links every stage and
    /// stores the resulting binary.
    ///
    /// # Errors
    ///
    /// - `CompileError` naming the first stage that failed, with its log
    /// - `LinkError` with the driver log
    ///
    /// Cache I/O problems never surface here.
    pub fn compile(
        &self,
        device: &mut dyn GraphicsDevice,
        name: Option<&str>,
        sources: &[StageSource],
    ) -> Result<CompiledProgram> {
        let name = name.unwrap_or(DEFAULT_PROGRAM_NAME);
        let hash = content_hash(sources);

        if let Some(directory) = self.directory() {
            if let Some(program) = self.load_cached(device, directory, name, &hash) {
                return Ok(CompiledProgram { program, from_cache: true });
            }
            crate::engine_debug!("galaxy3d::ProgramCache", "Cache miss for '{}' ({})", name, hash);
        }

        let program = compile_and_link(device, name, sources)?;

        if let Some(directory) = self.directory() {
            if let Err(e) = store(device, directory, program, name, &hash) {
                crate::engine_warn!("galaxy3d::ProgramCache",
                    "Could not cache program '{}': {}", name, e);
            }
        }
        Ok(CompiledProgram { program, from_cache: false })
    }

    /// Load the first valid `<name>_<hash>_*.bin`; invalid entries are removed
    fn load_cached(
        &self,
        device: &mut dyn GraphicsDevice,
        directory: &Path,
        name: &str,
        hash: &str,
    ) -> Option<ProgramHandle> {
        for (path, format) in find_entries(directory, name, hash) {
            let data = match fs::read(&path) {
                Ok(data) => data,
                Err(e) => {
                    crate::engine_warn!("galaxy3d::ProgramCache",
                        "Cannot read {}: {}", path.display(), e);
                    continue;
                }
            };

            let program = match device.create_program() {
                Ok(program) => program,
                Err(e) => {
                    crate::engine_warn!("galaxy3d::ProgramCache",
                        "Cannot create program for cached binary: {}", e);
                    return None;
                }
            };
            let binary = ProgramBinary { format, data };
            match device.load_program_binary(program, &binary) {
                Ok(()) => {
                    crate::engine_debug!("galaxy3d::ProgramCache",
                        "Cache hit for '{}' ({}, {} bytes)", name, hash, binary.data.len());
                    return Some(program);
                }
                Err(log) => {
                    device.delete_program(program);
                    crate::engine_warn!("galaxy3d::ProgramCache",
                        "Discarding unusable cached binary {}: {}", path.display(), log.trim());
                    if let Err(e) = fs::remove_file(&path) {
                        crate::engine_warn!("galaxy3d::ProgramCache",
                            "Cannot remove {}: {}", path.display(), e);
                    }
                }
            }
        }
        None
    }
}

/// Cache entries for `(name, hash)`, any binary format, sorted by path
fn find_entries(directory: &Path, name: &str, hash: &str) -> Vec<(PathBuf, u32)> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            crate::engine_warn!("galaxy3d::ProgramCache",
                "Cannot scan {}: {}", directory.display(), e);
            return Vec::new();
        }
    };

    let mut found: Vec<(PathBuf, u32)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let file_name = entry.file_name();
            let (n, h, format) = parse_cache_file_name(file_name.to_str()?)?;
            (n == name && h == hash).then(|| (entry.path(), format))
        })
        .collect();
    found.sort();
    found
}

/// Cold path: compile every stage in pipeline order, then link
fn compile_and_link(
    device: &mut dyn GraphicsDevice,
    name: &str,
    sources: &[StageSource],
) -> Result<ProgramHandle> {
    let mut ordered: Vec<&StageSource> = sources.iter().collect();
    ordered.sort_by_key(|s| s.stage.order());

    let mut stages: Vec<StageHandle> = Vec::with_capacity(ordered.len());
    for source in ordered {
        match device.compile_stage(source.stage, &source.source) {
            Ok(stage) => stages.push(stage),
            Err(log) => {
                crate::engine_error!("galaxy3d::ProgramCache",
                    "{} compilation failed for '{}':\n{}", source.stage.label(), name, log);
                release_stages(device, &stages);
                return Err(Error::CompileError {
                    name: name.to_string(),
                    stage: source.stage,
                    log,
                });
            }
        }
    }

    let program = match device.create_program() {
        Ok(program) => program,
        Err(e) => {
            release_stages(device, &stages);
            return Err(e);
        }
    };

    let linked = device.link_program(program, &stages);
    // Linked programs keep their code; the stage objects are no longer needed
    release_stages(device, &stages);

    if let Err(log) = linked {
        crate::engine_error!("galaxy3d::ProgramCache", "Program '{}' failed to link:\n{}", name, log);
        device.delete_program(program);
        return Err(Error::LinkError { name: name.to_string(), log });
    }
    Ok(program)
}

fn release_stages(device: &mut dyn GraphicsDevice, stages: &[StageHandle]) {
    for &stage in stages {
        device.delete_stage(stage);
    }
}

/// Write the program binary next to its final name, then rename it in place
fn store(
    device: &mut dyn GraphicsDevice,
    directory: &Path,
    program: ProgramHandle,
    name: &str,
    hash: &str,
) -> Result<PathBuf> {
    let binary = device
        .program_binary(program)
        .ok_or_else(|| Error::CacheIo(format!("driver returned no binary for '{}'", name)))?;
    if binary.data.is_empty() {
        return Err(Error::CacheIo(format!("driver returned an empty binary for '{}'", name)));
    }

    let path = directory.join(cache_file_name(name, hash, binary.format));
    let temporary = path.with_extension("tmp");
    fs::write(&temporary, &binary.data)?;
    if let Err(e) = fs::rename(&temporary, &path) {
        let _ = fs::remove_file(&temporary);
        return Err(e.into());
    }

    crate::engine_info!("galaxy3d::ProgramCache",
        "Cached program '{}' ({} bytes) to {}", name, binary.data.len(), path.display());
    Ok(path)
}

#[cfg(test)]
#[path = "program_cache_tests.rs"]
mod tests;
