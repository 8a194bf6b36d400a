/// GpuContext - Shared GPU resources for all Vulkan objects
///
/// Contains everything a Vulkan resource needs to create and free itself:
/// - Device for Vulkan API calls
/// - Allocator for memory management
/// - Graphics queue family for command pool creation

use ash::vk;
use gpu_allocator::vulkan::Allocator;
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex};

/// Shared GPU context for all Vulkan resources.
///
/// This struct is shared (via `Arc`) by all GPU resources (buffers, command
/// lists) to avoid duplicating device/allocator references in each resource.
///
/// Note: Device and instance destruction is handled by
/// VulkanGraphicsDevice::drop() to avoid issues with drop ordering and
/// callback exceptions on Windows.
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// GPU memory allocator (shared, requires mutex for thread safety)
    /// Wrapped in ManuallyDrop to ensure it's dropped BEFORE the device is destroyed
    pub allocator: ManuallyDrop<Arc<Mutex<Allocator>>>,

    /// Graphics queue family index (used when creating command pools)
    pub graphics_queue_family: u32,

    /// Vulkan instance (kept for reference, destroyed by VulkanGraphicsDevice)
    #[allow(dead_code)]
    instance: ash::Instance,

    /// Debug utils loader (for validation layers)
    pub(crate) debug_utils_loader: Option<ash::ext::debug_utils::Instance>,

    /// Debug messenger handle
    pub(crate) debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
}

impl GpuContext {
    /// Create a new GPU context
    ///
    /// # Arguments
    ///
    /// * `device` - Vulkan logical device
    /// * `allocator` - GPU memory allocator
    /// * `graphics_queue_family` - Graphics queue family index
    /// * `instance` - Vulkan instance
    /// * `debug_utils_loader` - Debug utils loader (if validation enabled)
    /// * `debug_messenger` - Debug messenger handle (if validation enabled)
    pub fn new(
        device: ash::Device,
        allocator: Arc<Mutex<Allocator>>,
        graphics_queue_family: u32,
        instance: ash::Instance,
        debug_utils_loader: Option<ash::ext::debug_utils::Instance>,
        debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
    ) -> Self {
        Self {
            device,
            allocator: ManuallyDrop::new(allocator),
            graphics_queue_family,
            instance,
            debug_utils_loader,
            debug_messenger,
        }
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        // NOTE: Device and instance destruction is handled by
        // VulkanGraphicsDevice::drop() to avoid issues with drop ordering and
        // callback exceptions on Windows. This Drop impl intentionally does
        // nothing.
    }
}
