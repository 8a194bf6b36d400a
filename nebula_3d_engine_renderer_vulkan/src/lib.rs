/*!
# Nebula 3D Engine - Vulkan Backend

Vulkan implementation of the Nebula 3D rendering core.

This crate implements the `GraphicsDevice` seam from nebula_3d_engine using
the Ash library for Vulkan bindings and gpu-allocator for memory management.
The device is headless (no window or swapchain), so it can back offscreen
tools and tests as well as interactive applications.

Enable the `vulkan-validation` feature to compile in the Khronos validation
layers and a debug messenger that routes messages into the engine log.
*/

// Vulkan implementation modules
mod vulkan;
mod vulkan_buffer;
mod vulkan_command_list;
mod vulkan_context;
mod vulkan_descriptor_set;
mod vulkan_pipeline;

#[cfg(feature = "vulkan-validation")]
mod debug;

// Main nebula3d namespace module (mirrors the core crate layout)
pub mod nebula3d {
    pub use crate::vulkan::{VulkanDeviceConfig, VulkanGraphicsDevice};
    pub use crate::vulkan_pipeline::VulkanPipeline;
}
