/// GraphicsDevice trait - the seam between the core and a GPU backend
///
/// The core never names a backend type; everything it needs from the GPU goes
/// through this trait. Backends (Vulkan today) implement it and hand out
/// opaque `Arc<dyn ...>` handles for descriptor objects, buffers and pipelines.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, CommandList,
    DescriptorLayoutInfo, DescriptorPool, DescriptorPoolSizes,
    DescriptorSet, DescriptorSetLayout, DescriptorWrite,
};

/// Main graphics device trait
///
/// Descriptor objects follow an explicit create/destroy protocol (no Drop on
/// the handles); buffers are RAII and free their memory when dropped.
pub trait GraphicsDevice: Send + Sync {
    /// Create a descriptor set layout from a normalized layout description
    fn create_descriptor_set_layout(
        &self,
        info: &DescriptorLayoutInfo,
    ) -> Result<Arc<dyn DescriptorSetLayout>>;

    /// Destroy a descriptor set layout
    ///
    /// The caller guarantees no pipeline or live descriptor set still
    /// references the layout.
    fn destroy_descriptor_set_layout(&self, layout: &Arc<dyn DescriptorSetLayout>) -> Result<()>;

    /// Create a descriptor pool sized by the given capacity profile
    fn create_descriptor_pool(&self, sizes: &DescriptorPoolSizes) -> Result<Arc<dyn DescriptorPool>>;

    /// Destroy a descriptor pool, implicitly freeing every set carved from it
    fn destroy_descriptor_pool(&self, pool: &Arc<dyn DescriptorPool>) -> Result<()>;

    /// Reset a descriptor pool, implicitly freeing every set carved from it
    /// while keeping the pool itself alive for reuse
    fn reset_descriptor_pool(&self, pool: &Arc<dyn DescriptorPool>) -> Result<()>;

    /// Allocate one descriptor set from a pool
    ///
    /// # Errors
    ///
    /// Returns `Error::PoolExhausted` when the pool is out of memory or too
    /// fragmented to satisfy the request (the allocator recovers from this by
    /// rotating to a fresh pool); other failures are backend errors.
    fn allocate_descriptor_set(
        &self,
        pool: &Arc<dyn DescriptorPool>,
        layout: &Arc<dyn DescriptorSetLayout>,
    ) -> Result<Arc<dyn DescriptorSet>>;

    /// Write concrete resources into a descriptor set's binding slots
    fn update_descriptor_set(
        &self,
        set: &Arc<dyn DescriptorSet>,
        writes: &[DescriptorWrite],
    ) -> Result<()>;

    /// Create a buffer (vertex, index, uniform or storage)
    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create a command list for recording rendering commands
    fn create_command_list(&self) -> Result<Box<dyn CommandList>>;

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;
}
