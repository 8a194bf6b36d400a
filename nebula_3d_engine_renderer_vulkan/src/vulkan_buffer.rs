/// VulkanBuffer - Vulkan implementation of the Buffer trait

use nebula_3d_engine::nebula3d::{Result, Error};
use nebula_3d_engine::nebula3d::gpu::Buffer;
use nebula_3d_engine::engine_error;
use ash::vk;
use gpu_allocator::vulkan::Allocation;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Vulkan buffer implementation
///
/// Unlike descriptor objects, buffers are RAII: the Vulkan buffer and its
/// GPU memory are freed when the last handle is dropped.
pub struct VulkanBuffer {
    /// Shared GPU context (device, allocator)
    ctx: Arc<GpuContext>,
    /// Vulkan buffer
    pub(crate) buffer: vk::Buffer,
    /// GPU memory allocation
    pub(crate) allocation: Option<Allocation>,
    /// Buffer size in bytes
    pub(crate) size: u64,
}

impl VulkanBuffer {
    /// Create a new Vulkan buffer from an already-bound allocation
    pub fn new(
        ctx: Arc<GpuContext>,
        buffer: vk::Buffer,
        allocation: Allocation,
        size: u64,
    ) -> Self {
        Self {
            ctx,
            buffer,
            allocation: Some(allocation),
            size,
        }
    }
}

impl Buffer for VulkanBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            return Err(Error::InvalidResource(format!(
                "Buffer update out of bounds: offset {} + {} bytes exceeds buffer size {}",
                offset,
                data.len(),
                self.size
            )));
        }

        unsafe {
            if let Some(allocation) = &self.allocation {
                // Map memory and copy data
                let mapped_ptr = allocation
                    .mapped_ptr()
                    .ok_or_else(|| Error::BackendError("Buffer is not CPU-accessible".to_string()))?
                    .as_ptr() as *mut u8;

                std::ptr::copy_nonoverlapping(
                    data.as_ptr(),
                    mapped_ptr.offset(offset as isize),
                    data.len(),
                );

                Ok(())
            } else {
                engine_error!("nebula3d::vulkan", "Buffer update failed: no GPU allocation");
                Err(Error::BackendError("Buffer has no allocation".to_string()))
            }
        }
    }

    fn len(&self) -> u64 {
        self.size
    }
}

impl Drop for VulkanBuffer {
    fn drop(&mut self) {
        unsafe {
            // Free GPU memory
            if let Some(allocation) = self.allocation.take() {
                // Don't panic if lock fails - we still need to destroy the buffer
                if let Ok(mut allocator) = self.ctx.allocator.lock() {
                    allocator.free(allocation).ok();
                }
            }

            // Destroy buffer
            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}
