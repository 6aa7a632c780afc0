/// Mock graphics device for unit tests (no GPU required)
///
/// Behaves like a small, honest GL driver:
/// - a stage whose source contains `#error` fails to compile
/// - linking can be forced to fail with `fail_links`
/// - program binaries are checksummed blobs of the linked sources, so any
///   binary written by one `MockDevice` loads in another one (a "restart"),
///   while truncated or edited blobs fail the link check
/// - uniform and attribute locations exist only for names declared in the
///   linked sources
/// - every call is counted and recorded in `commands`

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_64;
use crate::error::Result;
use crate::engine_bail;
use crate::renderable::{MeshPart, VertexLayout};
use super::graphics_device::{DriverResult, GraphicsDevice};
use super::types::{
    BlendFactor, CompareOp, CullMode, MeshId, ProgramBinary, ProgramHandle,
    ShaderStage, StageHandle, TextureHandle, UniformLocation, UniformValue,
};

/// Binary format reported by the mock driver
pub const MOCK_BINARY_FORMAT: u32 = 0x875F;

const BINARY_MAGIC: &[u8; 8] = b"G3DMOCK1";

// ============================================================================
// Mock Program
// ============================================================================

#[derive(Debug, Default)]
struct MockProgram {
    /// Linked stage sources in pipeline order
    sources: Vec<(ShaderStage, String)>,
    linked: bool,
    /// Names handed out by uniform_location, index = location
    uniform_slots: Vec<String>,
}

impl MockProgram {
    fn declared_uniforms(&self) -> Vec<String> {
        self.sources
            .iter()
            .flat_map(|(_, source)| source.lines())
            .filter_map(|line| declared_name(line, &["uniform "]))
            .collect()
    }

    fn declared_attributes(&self) -> Vec<String> {
        self.sources
            .iter()
            .filter(|(stage, _)| *stage == ShaderStage::Vertex)
            .flat_map(|(_, source)| source.lines())
            .filter_map(|line| declared_name(line, &["in ", "attribute "]))
            .collect()
    }
}

/// Name declared by a `uniform`/`in` line, array suffix stripped
fn declared_name(line: &str, keywords: &[&str]) -> Option<String> {
    let mut line = line.trim();
    if line.starts_with("layout") {
        line = line.split_once(')').map(|(_, rest)| rest.trim())?;
    }
    if !keywords.iter().any(|keyword| line.starts_with(keyword)) {
        return None;
    }
    let declaration = line.split(';').next()?;
    let name = declaration.split_whitespace().last()?;
    Some(name.split('[').next().unwrap_or(name).to_string())
}

fn encode_binary(sources: &[(ShaderStage, String)]) -> Vec<u8> {
    let payload = sources
        .iter()
        .map(|(stage, source)| format!("{}\u{1}{}", stage.order(), source))
        .collect::<Vec<_>>()
        .join("\u{0}")
        .into_bytes();
    let mut data = Vec::with_capacity(16 + payload.len());
    data.extend_from_slice(BINARY_MAGIC);
    data.extend_from_slice(&xxh3_64(&payload).to_le_bytes());
    data.extend_from_slice(&payload);
    data
}

fn decode_binary(data: &[u8]) -> DriverResult<Vec<(ShaderStage, String)>> {
    if data.len() < 16 || &data[..8] != BINARY_MAGIC {
        return Err("invalid program binary header".to_string());
    }
    let mut checksum = [0u8; 8];
    checksum.copy_from_slice(&data[8..16]);
    let payload = &data[16..];
    if xxh3_64(payload) != u64::from_le_bytes(checksum) {
        return Err("program binary checksum mismatch".to_string());
    }
    let text = std::str::from_utf8(payload).map_err(|e| e.to_string())?;
    text.split('\u{0}')
        .map(|entry| {
            let (order, source) = entry
                .split_once('\u{1}')
                .ok_or_else(|| "malformed program binary entry".to_string())?;
            let stage = order
                .parse::<usize>()
                .ok()
                .and_then(|i| ShaderStage::ALL.get(i).copied())
                .ok_or_else(|| "unknown stage in program binary".to_string())?;
            Ok((stage, source.to_string()))
        })
        .collect()
}

// ============================================================================
// Mock Device
// ============================================================================

#[derive(Debug)]
pub struct MockDevice {
    next_handle: u32,
    stages: FxHashMap<u32, (ShaderStage, String)>,
    programs: FxHashMap<u32, MockProgram>,
    current_program: Option<ProgramHandle>,

    pub binary_support: bool,
    pub fail_links: bool,
    pub texture_units: u32,

    pub stage_compiles: usize,
    pub links: usize,
    pub binary_loads: usize,
    pub draws: usize,
    pub commands: Vec<String>,
    /// (uniform name, value) in call order
    pub uniforms_set: Vec<(String, UniformValue)>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            stages: FxHashMap::default(),
            programs: FxHashMap::default(),
            current_program: None,
            binary_support: true,
            fail_links: false,
            texture_units: 16,
            stage_compiles: 0,
            links: 0,
            binary_loads: 0,
            draws: 0,
            commands: Vec::new(),
            uniforms_set: Vec::new(),
        }
    }

    /// Device whose driver cannot hand out program binaries
    pub fn without_binary_support() -> Self {
        Self { binary_support: false, ..Self::new() }
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_stages(&self) -> usize {
        self.stages.len()
    }

    pub fn current_program(&self) -> Option<ProgramHandle> {
        self.current_program
    }

    /// Linked sources of a program, in pipeline order
    pub fn program_sources(&self, program: ProgramHandle) -> Vec<String> {
        self.programs
            .get(&program.0)
            .map(|p| p.sources.iter().map(|(_, s)| s.clone()).collect())
            .unwrap_or_default()
    }

    /// Commands recorded so far whose text starts with `prefix`
    pub fn count_commands(&self, prefix: &str) -> usize {
        self.commands.iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Values pushed to the uniform named `name`
    pub fn uniform_values(&self, name: &str) -> Vec<UniformValue> {
        self.uniforms_set
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.uniforms_set.clear();
    }

    fn allocate(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockDevice {
    fn supports_program_binary(&self) -> bool {
        self.binary_support
    }

    fn max_texture_units(&self) -> u32 {
        self.texture_units
    }

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> DriverResult<StageHandle> {
        self.stage_compiles += 1;
        self.commands.push(format!("compile_stage {:?}", stage));
        if source.contains("#error") {
            return Err(format!("0:1(1): error: #error directive in {}", stage.label()));
        }
        let handle = self.allocate();
        self.stages.insert(handle, (stage, source.to_string()));
        Ok(StageHandle(handle))
    }

    fn delete_stage(&mut self, stage: StageHandle) {
        self.commands.push("delete_stage".to_string());
        self.stages.remove(&stage.0);
    }

    fn create_program(&mut self) -> Result<ProgramHandle> {
        let handle = self.allocate();
        self.programs.insert(handle, MockProgram::default());
        self.commands.push("create_program".to_string());
        Ok(ProgramHandle(handle))
    }

    fn link_program(&mut self, program: ProgramHandle, stages: &[StageHandle]) -> DriverResult<()> {
        self.links += 1;
        self.commands.push("link_program".to_string());
        if self.fail_links {
            return Err("error: linking failed (forced by test)".to_string());
        }
        let mut sources = Vec::with_capacity(stages.len());
        for stage in stages {
            let compiled = self
                .stages
                .get(&stage.0)
                .ok_or_else(|| format!("stage {} does not exist", stage.0))?;
            sources.push(compiled.clone());
        }
        let entry = self
            .programs
            .get_mut(&program.0)
            .ok_or_else(|| format!("program {} does not exist", program.0))?;
        entry.sources = sources;
        entry.linked = true;
        Ok(())
    }

    fn program_binary(&mut self, program: ProgramHandle) -> Option<ProgramBinary> {
        if !self.binary_support {
            return None;
        }
        let entry = self.programs.get(&program.0).filter(|p| p.linked)?;
        Some(ProgramBinary {
            format: MOCK_BINARY_FORMAT,
            data: encode_binary(&entry.sources),
        })
    }

    fn load_program_binary(&mut self, program: ProgramHandle, binary: &ProgramBinary) -> DriverResult<()> {
        self.binary_loads += 1;
        self.commands.push("load_program_binary".to_string());
        if binary.format != MOCK_BINARY_FORMAT {
            return Err(format!("unsupported binary format {}", binary.format));
        }
        let sources = decode_binary(&binary.data)?;
        let entry = self
            .programs
            .get_mut(&program.0)
            .ok_or_else(|| format!("program {} does not exist", program.0))?;
        entry.sources = sources;
        entry.linked = true;
        Ok(())
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.commands.push("delete_program".to_string());
        self.programs.remove(&program.0);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn forget_programs(&mut self) {
        self.commands.push("forget_programs".to_string());
        self.programs.clear();
        self.stages.clear();
        self.current_program = None;
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let entry = self.programs.get_mut(&program.0).filter(|p| p.linked)?;
        if let Some(index) = entry.uniform_slots.iter().position(|n| n == name) {
            return Some(UniformLocation(index as i32));
        }
        let base = name.split('[').next().unwrap_or(name);
        if !entry.declared_uniforms().iter().any(|declared| declared == base) {
            return None;
        }
        entry.uniform_slots.push(name.to_string());
        Some(UniformLocation(entry.uniform_slots.len() as i32 - 1))
    }

    fn attribute_location(&mut self, program: ProgramHandle, name: &str) -> Option<u32> {
        let entry = self.programs.get(&program.0).filter(|p| p.linked)?;
        entry
            .declared_attributes()
            .iter()
            .position(|declared| declared == name)
            .map(|index| index as u32)
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.commands.push(match program {
            Some(p) => format!("use_program {}", p.0),
            None => "use_program none".to_string(),
        });
        self.current_program = program;
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let name = self
            .current_program
            .and_then(|p| self.programs.get(&p.0))
            .and_then(|p| p.uniform_slots.get(location.0 as usize))
            .cloned()
            .unwrap_or_else(|| format!("<location {}>", location.0));
        self.commands.push(format!("set_uniform {}", name));
        self.uniforms_set.push((name, value));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.commands.push(format!("bind_texture {} {}", unit, texture.0));
    }

    fn set_blending(&mut self, enabled: bool, source: BlendFactor, destination: BlendFactor) {
        self.commands.push(format!("set_blending {} {:?} {:?}", enabled, source, destination));
    }

    fn set_cull_face(&mut self, mode: CullMode) {
        self.commands.push(format!("set_cull_face {:?}", mode));
    }

    fn set_depth_test(&mut self, func: Option<CompareOp>, near: f32, far: f32) {
        self.commands.push(format!("set_depth_test {:?} {} {}", func, near, far));
    }

    fn set_depth_mask(&mut self, mask: bool) {
        self.commands.push(format!("set_depth_mask {}", mask));
    }

    fn bind_mesh(&mut self, mesh: MeshId, layout: &VertexLayout, locations: &[Option<u32>]) -> Result<()> {
        if locations.len() != layout.len() {
            engine_bail!("galaxy3d::mock",
                "bind_mesh: {} locations for {} attributes", locations.len(), layout.len());
        }
        self.commands.push(format!("bind_mesh {}", mesh.0));
        Ok(())
    }

    fn unbind_mesh(&mut self, mesh: MeshId, _locations: &[Option<u32>]) {
        self.commands.push(format!("unbind_mesh {}", mesh.0));
    }

    fn draw(&mut self, part: &MeshPart) -> Result<()> {
        if self.current_program.is_none() {
            engine_bail!("galaxy3d::mock", "draw: no program in use");
        }
        self.draws += 1;
        self.commands.push(format!("draw {} {}", part.mesh.0, part.count));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
