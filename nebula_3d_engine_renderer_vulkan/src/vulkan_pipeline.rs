/// VulkanPipeline - Vulkan implementation of the Pipeline trait
///
/// Pipeline creation (shader compilation, fixed-function state) is outside
/// the core seam; applications build the vk::Pipeline themselves and wrap it
/// here so command lists can bind it.

use nebula_3d_engine::nebula3d::gpu::Pipeline;
use ash::vk;

/// Vulkan pipeline implementation
pub struct VulkanPipeline {
    /// Vulkan graphics pipeline
    pub(crate) pipeline: vk::Pipeline,
    /// Pipeline layout (accessed internally for descriptor sets and push constants)
    pub(crate) pipeline_layout: vk::PipelineLayout,
    /// Vulkan device (for cleanup)
    device: ash::Device,
}

impl VulkanPipeline {
    /// Wrap a pre-built Vulkan pipeline and its layout
    ///
    /// Takes ownership of both handles; they are destroyed when the wrapper
    /// is dropped.
    pub fn new(
        device: ash::Device,
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
    ) -> Self {
        Self {
            pipeline,
            pipeline_layout,
            device,
        }
    }
}

impl Pipeline for VulkanPipeline {}

impl Drop for VulkanPipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline(self.pipeline, None);
            self.device.destroy_pipeline_layout(self.pipeline_layout, None);
        }
    }
}
