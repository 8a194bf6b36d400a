/// Vulkan implementations of the descriptor handle traits
///
/// These are thin wrappers around raw Vulkan handles. None of them carry a
/// Drop impl: descriptor objects follow the explicit create/destroy protocol
/// on GraphicsDevice, and sets are freed implicitly when their pool is
/// destroyed or reset.

use nebula_3d_engine::nebula3d::gpu::{DescriptorPool, DescriptorSet, DescriptorSetLayout};
use ash::vk;

/// Vulkan descriptor set layout handle
pub struct VulkanDescriptorSetLayout {
    pub(crate) layout: vk::DescriptorSetLayout,
}

impl DescriptorSetLayout for VulkanDescriptorSetLayout {}

/// Vulkan descriptor pool handle
pub struct VulkanDescriptorPool {
    pub(crate) pool: vk::DescriptorPool,
}

impl DescriptorPool for VulkanDescriptorPool {}

/// Vulkan descriptor set handle
///
/// The set is carved from a pool and owned by it; there is no per-set free.
pub struct VulkanDescriptorSet {
    pub(crate) descriptor_set: vk::DescriptorSet,
}

impl DescriptorSet for VulkanDescriptorSet {}
