/// GlDevice - OpenGL implementation of GraphicsDevice
///
/// Wraps a `glow::Context` and maps the opaque handles the shader system
/// works with to GL objects. Uniform locations are indices into a per-program
/// table so the same code runs on native GL and WebGL.

use galaxy_3d_shaders::galaxy3d::device::{
    BlendFactor, CompareOp, CullMode, DriverResult, GraphicsDevice, MeshId, PrimitiveTopology,
    ProgramBinary, ProgramHandle, ShaderStage, StageHandle, TextureHandle, UniformLocation,
    UniformValue,
};
use galaxy_3d_shaders::galaxy3d::renderable::{MeshPart, VertexLayout};
use galaxy_3d_shaders::galaxy3d::Result;
use galaxy_3d_shaders::{engine_bail, engine_debug, engine_err, engine_info, engine_warn};
use glow::HasContext;
use rustc_hash::FxHashMap;

use crate::gl_convert::{
    blend_factor_to_gl, compare_op_to_gl, cull_mode_to_gl, program_binary_available, stage_to_gl,
    topology_to_gl, vertex_attribute_format,
};

/// Vertices per patch for tessellated draws
const PATCH_VERTICES: i32 = 3;

/// Buffers of one registered mesh
#[derive(Debug, Clone, Copy)]
pub struct GlMesh {
    pub vertex_buffer: glow::Buffer,
    /// 32-bit indices; `None` for non-indexed meshes
    pub index_buffer: Option<glow::Buffer>,
    /// Whether the device created the buffers and must delete them
    pub owned: bool,
}

struct GlProgram {
    program: glow::Program,
    names: Vec<String>,
    locations: Vec<glow::UniformLocation>,
}

struct GlTexture {
    texture: glow::Texture,
    target: u32,
}

pub struct GlDevice {
    gl: glow::Context,
    binary_support: bool,
    max_texture_units: u32,
    vertex_array: Option<glow::VertexArray>,
    next_handle: u32,
    stages: FxHashMap<u32, glow::Shader>,
    programs: FxHashMap<u32, GlProgram>,
    current_program: Option<u32>,
    textures: FxHashMap<u32, GlTexture>,
    meshes: FxHashMap<u64, GlMesh>,
    next_mesh: u64,
}

impl GlDevice {
    /// Take ownership of a current GL context and query its capabilities
    pub fn new(gl: glow::Context) -> Result<Self> {
        let (major, minor, embedded) = {
            let version = gl.version();
            (version.major, version.minor, version.is_embedded)
        };

        let (formats, max_texture_units) = unsafe {
            let formats = if program_binary_available(major, minor, embedded, 1) {
                gl.get_parameter_i32(glow::NUM_PROGRAM_BINARY_FORMATS)
            } else {
                0
            };
            (formats, gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS).max(1) as u32)
        };
        let binary_support = program_binary_available(major, minor, embedded, formats);

        // Core profiles draw nothing without a bound vertex array
        let vertex_array = if embedded && major < 3 {
            None
        } else {
            let vao = unsafe { gl.create_vertex_array() }
                .map_err(|e| engine_err!("galaxy3d::gl", "Failed to create vertex array: {}", e))?;
            Some(vao)
        };

        engine_info!("galaxy3d::gl", "OpenGL{} {}.{}, {} texture units, program binaries {}",
            if embedded { " ES" } else { "" }, major, minor, max_texture_units,
            if binary_support { "supported" } else { "unsupported" });

        Ok(Self {
            gl,
            binary_support,
            max_texture_units,
            vertex_array,
            next_handle: 0,
            stages: FxHashMap::default(),
            programs: FxHashMap::default(),
            current_program: None,
            textures: FxHashMap::default(),
            meshes: FxHashMap::default(),
            next_mesh: 0,
        })
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn gl_mut(&mut self) -> &mut glow::Context {
        &mut self.gl
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    // ===== RESOURCES =====

    /// Make an application texture bindable by the shader system
    pub fn register_texture(&mut self, texture: glow::Texture, target: u32) -> TextureHandle {
        let id = self.next_handle();
        self.textures.insert(id, GlTexture { texture, target });
        TextureHandle(id)
    }

    /// Forget a texture; the GL object stays alive
    pub fn unregister_texture(&mut self, handle: TextureHandle) -> Option<glow::Texture> {
        self.textures.remove(&handle.0).map(|t| t.texture)
    }

    /// Make application buffers drawable by the shader system
    pub fn register_mesh(&mut self, mesh: GlMesh) -> MeshId {
        self.next_mesh += 1;
        self.meshes.insert(self.next_mesh, mesh);
        MeshId(self.next_mesh)
    }

    /// Upload vertices and 32-bit indices into new buffers
    pub fn create_mesh<V: bytemuck::Pod>(&mut self, vertices: &[V], indices: &[u32]) -> Result<MeshId> {
        let vertex_buffer = unsafe {
            let buffer = self.gl.create_buffer()
                .map_err(|e| engine_err!("galaxy3d::gl", "Failed to create vertex buffer: {}", e))?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(vertices), glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            buffer
        };

        let index_buffer = if indices.is_empty() {
            None
        } else {
            let buffer = unsafe {
                let buffer = match self.gl.create_buffer() {
                    Ok(buffer) => buffer,
                    Err(e) => {
                        self.gl.delete_buffer(vertex_buffer);
                        engine_bail!("galaxy3d::gl", "Failed to create index buffer: {}", e);
                    }
                };
                self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
                self.gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices), glow::STATIC_DRAW);
                self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
                buffer
            };
            Some(buffer)
        };

        Ok(self.register_mesh(GlMesh { vertex_buffer, index_buffer, owned: true }))
    }

    /// Forget a mesh, deleting its buffers when the device created them
    pub fn release_mesh(&mut self, mesh: MeshId) {
        let Some(entry) = self.meshes.remove(&mesh.0) else {
            engine_warn!("galaxy3d::gl", "release_mesh: unknown mesh {}", mesh.0);
            return;
        };
        if entry.owned {
            unsafe {
                self.gl.delete_buffer(entry.vertex_buffer);
                if let Some(indices) = entry.index_buffer {
                    self.gl.delete_buffer(indices);
                }
            }
        }
    }

    fn info_log_or(log: String, fallback: &str) -> String {
        if log.trim().is_empty() { fallback.to_string() } else { log }
    }
}

impl GraphicsDevice for GlDevice {
    // ===== CAPABILITIES =====

    fn supports_program_binary(&self) -> bool {
        self.binary_support
    }

    fn max_texture_units(&self) -> u32 {
        self.max_texture_units
    }

    // ===== STAGES / PROGRAMS =====

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> DriverResult<StageHandle> {
        let shader = unsafe { self.gl.create_shader(stage_to_gl(stage))? };
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(Self::info_log_or(log, "compilation failed without an info log"));
            }
        }
        let id = self.next_handle();
        self.stages.insert(id, shader);
        Ok(StageHandle(id))
    }

    fn delete_stage(&mut self, stage: StageHandle) {
        if let Some(shader) = self.stages.remove(&stage.0) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn create_program(&mut self) -> Result<ProgramHandle> {
        let program = unsafe { self.gl.create_program() }
            .map_err(|e| engine_err!("galaxy3d::gl", "Failed to create program: {}", e))?;
        let id = self.next_handle();
        self.programs.insert(id, GlProgram { program, names: Vec::new(), locations: Vec::new() });
        Ok(ProgramHandle(id))
    }

    fn link_program(&mut self, program: ProgramHandle, stages: &[StageHandle]) -> DriverResult<()> {
        let gl_program = self
            .programs
            .get(&program.0)
            .map(|p| p.program)
            .ok_or_else(|| format!("program {} does not exist", program.0))?;
        let shaders = stages
            .iter()
            .map(|s| self.stages.get(&s.0).copied().ok_or_else(|| format!("stage {} does not exist", s.0)))
            .collect::<DriverResult<Vec<_>>>()?;

        unsafe {
            for &shader in &shaders {
                self.gl.attach_shader(gl_program, shader);
            }
            if self.binary_support {
                self.gl.program_binary_retrievable_hint(gl_program, true);
            }
            self.gl.link_program(gl_program);
            for &shader in &shaders {
                self.gl.detach_shader(gl_program, shader);
            }
            if !self.gl.get_program_link_status(gl_program) {
                let log = self.gl.get_program_info_log(gl_program);
                return Err(Self::info_log_or(log, "link failed without an info log"));
            }
        }
        Ok(())
    }

    fn program_binary(&mut self, program: ProgramHandle) -> Option<ProgramBinary> {
        if !self.binary_support {
            return None;
        }
        let gl_program = self.programs.get(&program.0)?.program;
        let binary = unsafe { self.gl.get_program_binary(gl_program) }?;
        if binary.buffer.is_empty() {
            return None;
        }
        Some(ProgramBinary { format: binary.format, data: binary.buffer })
    }

    fn load_program_binary(&mut self, program: ProgramHandle, binary: &ProgramBinary) -> DriverResult<()> {
        let gl_program = self
            .programs
            .get(&program.0)
            .map(|p| p.program)
            .ok_or_else(|| format!("program {} does not exist", program.0))?;
        let gl_binary = glow::ProgramBinary { buffer: binary.data.clone(), format: binary.format };
        unsafe {
            self.gl.program_binary(gl_program, &gl_binary);
            if !self.gl.get_program_link_status(gl_program) {
                let log = self.gl.get_program_info_log(gl_program);
                return Err(Self::info_log_or(log, "binary rejected by the driver"));
            }
        }
        Ok(())
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        let Some(entry) = self.programs.remove(&program.0) else {
            return;
        };
        if self.current_program == Some(program.0) {
            self.current_program = None;
        }
        unsafe { self.gl.delete_program(entry.program) };
    }

    fn forget_programs(&mut self) {
        engine_debug!("galaxy3d::gl", "Forgetting {} programs and {} stages of a lost context",
            self.programs.len(), self.stages.len());
        self.programs.clear();
        self.stages.clear();
        self.current_program = None;
    }

    // ===== INTROSPECTION =====

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let entry = self.programs.get_mut(&program.0)?;
        if let Some(index) = entry.names.iter().position(|n| n == name) {
            return Some(UniformLocation(index as i32));
        }
        let location = unsafe { self.gl.get_uniform_location(entry.program, name) }?;
        entry.names.push(name.to_string());
        entry.locations.push(location);
        Some(UniformLocation(entry.locations.len() as i32 - 1))
    }

    fn attribute_location(&mut self, program: ProgramHandle, name: &str) -> Option<u32> {
        let entry = self.programs.get(&program.0)?;
        unsafe { self.gl.get_attrib_location(entry.program, name) }
    }

    // ===== BINDING / STATE =====

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        let gl_program = program.and_then(|p| self.programs.get(&p.0)).map(|p| p.program);
        if program.is_some() && gl_program.is_none() {
            engine_warn!("galaxy3d::gl", "use_program: unknown program {:?}", program);
        }
        self.current_program = gl_program.and(program).map(|p| p.0);
        unsafe { self.gl.use_program(gl_program) };
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let Some(location) = self
            .current_program
            .and_then(|p| self.programs.get(&p))
            .and_then(|p| p.locations.get(location.0 as usize))
        else {
            engine_debug!("galaxy3d::gl", "set_uniform: location {} not in the current program", location.0);
            return;
        };
        let location = Some(location);
        unsafe {
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat3(m) => self.gl.uniform_matrix_3_f32_slice(location, false, &m.to_cols_array()),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array()),
            }
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        let Some(entry) = self.textures.get(&texture.0) else {
            engine_warn!("galaxy3d::gl", "bind_texture: unknown texture {}", texture.0);
            return;
        };
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(entry.target, Some(entry.texture));
        }
    }

    fn set_blending(&mut self, enabled: bool, source: BlendFactor, destination: BlendFactor) {
        unsafe {
            if enabled {
                self.gl.enable(glow::BLEND);
                self.gl.blend_func(blend_factor_to_gl(source), blend_factor_to_gl(destination));
            } else {
                self.gl.disable(glow::BLEND);
            }
        }
    }

    fn set_cull_face(&mut self, mode: CullMode) {
        unsafe {
            match cull_mode_to_gl(mode) {
                Some(face) => {
                    self.gl.enable(glow::CULL_FACE);
                    self.gl.cull_face(face);
                }
                None => self.gl.disable(glow::CULL_FACE),
            }
        }
    }

    fn set_depth_test(&mut self, func: Option<CompareOp>, near: f32, far: f32) {
        unsafe {
            match func {
                Some(func) => {
                    self.gl.enable(glow::DEPTH_TEST);
                    self.gl.depth_func(compare_op_to_gl(func));
                    self.gl.depth_range_f32(near, far);
                }
                None => self.gl.disable(glow::DEPTH_TEST),
            }
        }
    }

    fn set_depth_mask(&mut self, mask: bool) {
        unsafe { self.gl.depth_mask(mask) };
    }

    // ===== MESHES =====

    fn bind_mesh(&mut self, mesh: MeshId, layout: &VertexLayout, locations: &[Option<u32>]) -> Result<()> {
        let Some(entry) = self.meshes.get(&mesh.0).copied() else {
            engine_bail!("galaxy3d::gl", "bind_mesh: unknown mesh {}", mesh.0);
        };
        unsafe {
            if let Some(vao) = self.vertex_array {
                self.gl.bind_vertex_array(Some(vao));
            }
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(entry.vertex_buffer));
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, entry.index_buffer);
            for (attribute, location) in layout.attributes().iter().zip(locations) {
                let Some(location) = *location else {
                    continue;
                };
                let (size, data_type, normalized) = vertex_attribute_format(attribute);
                self.gl.enable_vertex_attrib_array(location);
                self.gl.vertex_attrib_pointer_f32(
                    location,
                    size,
                    data_type,
                    normalized,
                    layout.stride() as i32,
                    attribute.offset as i32,
                );
            }
        }
        Ok(())
    }

    fn unbind_mesh(&mut self, _mesh: MeshId, locations: &[Option<u32>]) {
        unsafe {
            for location in locations.iter().flatten() {
                self.gl.disable_vertex_attrib_array(*location);
            }
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }
    }

    fn draw(&mut self, part: &MeshPart) -> Result<()> {
        let Some(entry) = self.meshes.get(&part.mesh.0) else {
            engine_bail!("galaxy3d::gl", "draw: unknown mesh {}", part.mesh.0);
        };
        if part.indexed && entry.index_buffer.is_none() {
            engine_bail!("galaxy3d::gl", "draw: mesh {} has no index buffer", part.mesh.0);
        }
        let mode = topology_to_gl(part.primitive);
        unsafe {
            if part.primitive == PrimitiveTopology::Patches {
                self.gl.patch_parameter_i32(glow::PATCH_VERTICES, PATCH_VERTICES);
            }
            if part.indexed {
                let byte_offset = (part.offset as usize * std::mem::size_of::<u32>()) as i32;
                self.gl.draw_elements(mode, part.count as i32, glow::UNSIGNED_INT, byte_offset);
            } else {
                self.gl.draw_arrays(mode, part.offset as i32, part.count as i32);
            }
        }
        Ok(())
    }
}

impl Drop for GlDevice {
    fn drop(&mut self) {
        unsafe {
            for (_, mesh) in self.meshes.drain() {
                if mesh.owned {
                    self.gl.delete_buffer(mesh.vertex_buffer);
                    if let Some(indices) = mesh.index_buffer {
                        self.gl.delete_buffer(indices);
                    }
                }
            }
            for (_, shader) in self.stages.drain() {
                self.gl.delete_shader(shader);
            }
            if let Some(vao) = self.vertex_array.take() {
                self.gl.delete_vertex_array(vao);
            }
        }
        if !self.programs.is_empty() {
            engine_debug!("galaxy3d::gl", "{} programs still alive at drop", self.programs.len());
        }
    }
}
