/// CommandList trait - for recording rendering commands

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, DescriptorSet, Pipeline, ShaderStageFlags,
};

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

/// Command list for recording rendering commands
///
/// Commands are recorded between begin()/end() and later submitted to the GPU
/// by the frame driver (submission is outside the core's responsibility).
pub trait CommandList: Send + Sync {
    /// Begin recording commands
    fn begin(&mut self) -> Result<()>;

    /// End recording commands
    fn end(&mut self) -> Result<()>;

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Set the scissor rectangle
    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    /// Bind a graphics pipeline
    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Bind a descriptor set at the given set index
    ///
    /// # Arguments
    ///
    /// * `pipeline` - Pipeline the set is bound against (provides the layout)
    /// * `set_index` - Set index (0 = per-frame, 1 = per-material, etc.)
    /// * `set` - The descriptor set to bind
    fn bind_descriptor_set(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        set_index: u32,
        set: &Arc<dyn DescriptorSet>,
    ) -> Result<()>;

    /// Push constants to the bound pipeline
    ///
    /// # Arguments
    ///
    /// * `stages` - Shader stages that will access the push constants
    /// * `offset` - Offset in bytes into the push constant range
    /// * `data` - Data to push
    fn push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]) -> Result<()>;

    /// Bind a vertex buffer
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(
        &mut self,
        buffer: &Arc<dyn Buffer>,
        offset: u64,
        index_type: IndexType,
    ) -> Result<()>;

    /// Draw vertices
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Draw indexed vertices
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()>;
}

/// Viewport dimensions and depth range
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// 2D rectangle
#[derive(Debug, Clone, Copy)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}
