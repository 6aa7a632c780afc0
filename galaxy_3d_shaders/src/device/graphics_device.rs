/// GraphicsDevice trait - the slice of a GL-style context the shader
/// subsystem drives.
///
/// One device belongs to one graphics context and is only ever touched from
/// the thread that owns that context, hence `&mut self` everywhere and no
/// `Send`/`Sync` bound.

use crate::error::Result;
use crate::renderable::{MeshPart, VertexLayout};
use super::types::{
    BlendFactor, CompareOp, CullMode, MeshId, ProgramBinary, ProgramHandle,
    ShaderStage, StageHandle, TextureHandle, UniformLocation, UniformValue,
};

/// Driver call result carrying the driver info log on failure
pub type DriverResult<T> = std::result::Result<T, String>;

pub trait GraphicsDevice {
    // ===== CAPABILITIES =====

    /// Whether linked programs can be retrieved as binaries and reloaded
    fn supports_program_binary(&self) -> bool;

    /// Number of texture units usable by one program
    fn max_texture_units(&self) -> u32;

    // ===== STAGES / PROGRAMS =====

    /// Compile one stage. On failure the driver log is returned.
    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> DriverResult<StageHandle>;

    fn delete_stage(&mut self, stage: StageHandle);

    fn create_program(&mut self) -> Result<ProgramHandle>;

    /// Attach `stages`, link, then detach them. On failure the driver log is returned.
    fn link_program(&mut self, program: ProgramHandle, stages: &[StageHandle]) -> DriverResult<()>;

    /// Retrieve the binary of a linked program, `None` if the driver refuses
    fn program_binary(&mut self, program: ProgramHandle) -> Option<ProgramBinary>;

    /// Load a binary into `program` and check its link status
    fn load_program_binary(&mut self, program: ProgramHandle, binary: &ProgramBinary) -> DriverResult<()>;

    fn delete_program(&mut self, program: ProgramHandle);

    /// The context is gone: drop every program and stage handle without
    /// calling into it
    fn forget_programs(&mut self);

    // ===== INTROSPECTION =====

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    fn attribute_location(&mut self, program: ProgramHandle, name: &str) -> Option<u32>;

    // ===== BINDING / STATE =====

    fn use_program(&mut self, program: Option<ProgramHandle>);

    /// Set a uniform of the program currently in use
    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    fn set_blending(&mut self, enabled: bool, source: BlendFactor, destination: BlendFactor);

    fn set_cull_face(&mut self, mode: CullMode);

    /// `func == None` disables the depth test
    fn set_depth_test(&mut self, func: Option<CompareOp>, near: f32, far: f32);

    fn set_depth_mask(&mut self, mask: bool);

    // ===== MESHES =====

    /// Bind the mesh buffers and point each layout attribute at its location
    /// (`locations[i]` pairs with `layout.attributes()[i]`)
    fn bind_mesh(&mut self, mesh: MeshId, layout: &VertexLayout, locations: &[Option<u32>]) -> Result<()>;

    fn unbind_mesh(&mut self, mesh: MeshId, locations: &[Option<u32>]);

    fn draw(&mut self, part: &MeshPart) -> Result<()>;
}
