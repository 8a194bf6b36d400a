/// FrameContext - per-frame mutable context shared across update/draw calls
///
/// Built by the frame driver at the top of every frame and passed by `&mut`
/// into Scene::update/draw and down into every component. The core writes
/// timings into it but does not own the underlying resources.

use std::sync::{Arc, Mutex};
use glam::Mat4;
use crate::graphics_device::{
    Buffer, CommandList, DescriptorAllocator, DescriptorLayoutCache,
    GraphicsDevice, Viewport,
};

/// Accumulated per-frame profiling counters.
///
/// Reset by the frame driver each frame; the core only adds to them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimings {
    /// Total wall time spent in Scene::update this frame, in milliseconds
    pub scene_update_ms: f32,
    /// Number of draw calls issued this frame
    pub draw_calls: u32,
}

/// Per-frame render context.
///
/// Borrows the frame-lifetime GPU plumbing (command list, descriptor
/// allocator/cache, frame-global uniform buffer) so components can issue
/// draw calls without holding their own device references.
pub struct FrameContext<'a> {
    /// Graphics device handle (for descriptor set writes)
    pub device: &'a Arc<Mutex<dyn GraphicsDevice>>,
    /// Command list being recorded for this frame
    pub command_list: &'a mut dyn CommandList,
    /// Descriptor set allocator (pool rotation across the frame)
    pub descriptor_allocator: &'a mut DescriptorAllocator,
    /// Descriptor set layout cache (deduplicated layouts)
    pub layout_cache: &'a mut DescriptorLayoutCache,
    /// Frame-global uniform buffer (camera matrices etc., written by the driver)
    pub frame_uniform_buffer: &'a Arc<dyn Buffer>,
    /// Camera view-projection matrix for this frame
    pub view_projection: Mat4,
    /// World matrix of the object currently being drawn.
    /// Written by SceneObject::draw before delegating to its components.
    pub model_matrix: Mat4,
    /// Viewport for this frame
    pub viewport: Viewport,
    /// Accumulated profiling counters
    pub timings: FrameTimings,
}
