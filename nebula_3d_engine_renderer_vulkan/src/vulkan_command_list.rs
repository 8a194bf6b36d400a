/// VulkanCommandList - Vulkan implementation of the CommandList trait

use nebula_3d_engine::nebula3d::{Result, Error};
use nebula_3d_engine::nebula3d::gpu::{
    CommandList,
    Pipeline,
    Buffer,
    DescriptorSet,
    IndexType, Viewport, Rect2D, ShaderStageFlags,
};
use nebula_3d_engine::engine_error;
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;
use crate::vulkan_pipeline::VulkanPipeline;
use crate::vulkan_buffer::VulkanBuffer;
use crate::vulkan_descriptor_set::VulkanDescriptorSet;

/// Vulkan command list implementation
///
/// Records rendering commands for later submission to the GPU. Submission
/// and render pass setup are the frame driver's responsibility; this type
/// only records.
pub struct VulkanCommandList {
    /// Shared GPU context (device, queue family)
    ctx: Arc<GpuContext>,
    /// Command pool for allocating command buffers
    command_pool: vk::CommandPool,
    /// Command buffer for recording
    command_buffer: vk::CommandBuffer,
    /// Whether the command list is currently recording
    is_recording: bool,
    /// Currently bound pipeline layout (for push constants)
    bound_pipeline_layout: Option<vk::PipelineLayout>,
}

impl VulkanCommandList {
    /// Create a new command list with its own command pool
    pub fn new(ctx: Arc<GpuContext>) -> Result<Self> {
        unsafe {
            // Create command pool
            let command_pool_create_info = vk::CommandPoolCreateInfo::default()
                .queue_family_index(ctx.graphics_queue_family)
                .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);

            let command_pool = ctx.device.create_command_pool(&command_pool_create_info, None)
                .map_err(|e| {
                    engine_error!("nebula3d::vulkan", "Failed to create command pool: {:?}", e);
                    Error::BackendError(format!("Failed to create command pool: {:?}", e))
                })?;

            // Allocate command buffer
            let command_buffer_allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(command_pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            let command_buffers = ctx.device.allocate_command_buffers(&command_buffer_allocate_info)
                .map_err(|e| {
                    engine_error!("nebula3d::vulkan", "Failed to allocate command buffer: {:?}", e);
                    Error::BackendError(format!("Failed to allocate command buffers: {:?}", e))
                })?;

            Ok(Self {
                ctx,
                command_pool,
                command_buffer: command_buffers[0],
                is_recording: false,
                bound_pipeline_layout: None,
            })
        }
    }

    /// Get the underlying Vulkan command buffer (for queue submission)
    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    fn require_recording(&self) -> Result<()> {
        if !self.is_recording {
            return Err(Error::BackendError("Command list not recording".to_string()));
        }
        Ok(())
    }
}

impl CommandList for VulkanCommandList {
    fn begin(&mut self) -> Result<()> {
        if self.is_recording {
            return Err(Error::BackendError("Command list already recording".to_string()));
        }

        unsafe {
            // Reset command buffer
            self.ctx.device
                .reset_command_buffer(
                    self.command_buffer,
                    vk::CommandBufferResetFlags::empty(),
                )
                .map_err(|e| Error::BackendError(format!("Failed to reset command buffer: {:?}", e)))?;

            // Begin command buffer
            let begin_info = vk::CommandBufferBeginInfo::default()
                .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

            self.ctx.device
                .begin_command_buffer(self.command_buffer, &begin_info)
                .map_err(|e| Error::BackendError(format!("Failed to begin command buffer: {:?}", e)))?;

            self.is_recording = true;
            self.bound_pipeline_layout = None;

            Ok(())
        }
    }

    fn end(&mut self) -> Result<()> {
        self.require_recording()?;

        unsafe {
            self.ctx.device
                .end_command_buffer(self.command_buffer)
                .map_err(|e| Error::BackendError(format!("Failed to end command buffer: {:?}", e)))?;

            self.is_recording = false;

            Ok(())
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.require_recording()?;

        unsafe {
            let vk_viewport = vk::Viewport::default()
                .x(viewport.x)
                .y(viewport.y)
                .width(viewport.width)
                .height(viewport.height)
                .min_depth(viewport.min_depth)
                .max_depth(viewport.max_depth);

            self.ctx.device.cmd_set_viewport(self.command_buffer, 0, &[vk_viewport]);

            Ok(())
        }
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.require_recording()?;

        unsafe {
            let vk_scissor = vk::Rect2D::default()
                .offset(vk::Offset2D { x: scissor.x, y: scissor.y })
                .extent(vk::Extent2D { width: scissor.width, height: scissor.height });

            self.ctx.device.cmd_set_scissor(self.command_buffer, 0, &[vk_scissor]);

            Ok(())
        }
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.require_recording()?;

        unsafe {
            // Downcast to Vulkan type
            let vk_pipeline = pipeline.as_ref() as *const dyn Pipeline as *const VulkanPipeline;
            let vk_pipeline = &*vk_pipeline;

            self.ctx.device.cmd_bind_pipeline(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                vk_pipeline.pipeline,
            );

            // Save pipeline layout for push constants
            self.bound_pipeline_layout = Some(vk_pipeline.pipeline_layout);

            Ok(())
        }
    }

    fn bind_descriptor_set(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        set_index: u32,
        set: &Arc<dyn DescriptorSet>,
    ) -> Result<()> {
        self.require_recording()?;

        unsafe {
            // Downcast pipeline to extract its layout
            let vk_pipeline = pipeline.as_ref() as *const dyn Pipeline as *const VulkanPipeline;
            let pipeline_layout = (*vk_pipeline).pipeline_layout;

            let vk_set = set.as_ref() as *const dyn DescriptorSet as *const VulkanDescriptorSet;
            let descriptor_sets = [(*vk_set).descriptor_set];

            self.ctx.device.cmd_bind_descriptor_sets(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                pipeline_layout,
                set_index,
                &descriptor_sets,
                &[], // dynamic_offsets
            );

            Ok(())
        }
    }

    fn push_constants(&mut self, stages: ShaderStageFlags, offset: u32, data: &[u8]) -> Result<()> {
        self.require_recording()?;

        let layout = self.bound_pipeline_layout.ok_or_else(|| {
            Error::BackendError("No pipeline bound for push constants".to_string())
        })?;

        unsafe {
            self.ctx.device.cmd_push_constants(
                self.command_buffer,
                layout,
                crate::vulkan::stage_flags_to_vk(stages),
                offset,
                data,
            );

            Ok(())
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()> {
        self.require_recording()?;

        unsafe {
            // Downcast to Vulkan type
            let vk_buffer = buffer.as_ref() as *const dyn Buffer as *const VulkanBuffer;
            let vk_buffer = &*vk_buffer;

            self.ctx.device.cmd_bind_vertex_buffers(
                self.command_buffer,
                0,
                &[vk_buffer.buffer],
                &[offset],
            );

            Ok(())
        }
    }

    fn bind_index_buffer(
        &mut self,
        buffer: &Arc<dyn Buffer>,
        offset: u64,
        index_type: IndexType,
    ) -> Result<()> {
        self.require_recording()?;

        unsafe {
            // Downcast to Vulkan type
            let vk_buffer = buffer.as_ref() as *const dyn Buffer as *const VulkanBuffer;
            let vk_buffer = &*vk_buffer;

            let vk_index_type = match index_type {
                IndexType::U16 => vk::IndexType::UINT16,
                IndexType::U32 => vk::IndexType::UINT32,
            };

            self.ctx.device.cmd_bind_index_buffer(
                self.command_buffer,
                vk_buffer.buffer,
                offset,
                vk_index_type,
            );

            Ok(())
        }
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.require_recording()?;

        unsafe {
            self.ctx.device.cmd_draw(
                self.command_buffer,
                vertex_count,
                1, // instance_count
                first_vertex,
                0, // first_instance
            );

            Ok(())
        }
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        self.require_recording()?;

        unsafe {
            self.ctx.device.cmd_draw_indexed(
                self.command_buffer,
                index_count,
                1, // instance_count
                first_index,
                vertex_offset,
                0, // first_instance
            );

            Ok(())
        }
    }
}

impl Drop for VulkanCommandList {
    fn drop(&mut self) {
        unsafe {
            // Command buffer is freed together with its pool
            self.ctx.device.destroy_command_pool(self.command_pool, None);
        }
    }
}
