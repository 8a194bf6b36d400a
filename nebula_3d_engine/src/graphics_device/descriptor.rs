/// Descriptor types shared between the core and backend implementations
///
/// A descriptor set is a GPU-side group of resource bindings (buffers, textures)
/// that shaders can access. Sets are carved out of descriptor pools and described
/// by descriptor set layouts. The core manipulates these only through the marker
/// traits below; the backend owns the raw GPU handles.

use std::sync::Arc;
use bitflags::bitflags;
use crate::graphics_device::Buffer;

// ============================================================================
// Binding description types
// ============================================================================

/// Type of resource bound at a descriptor slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    /// Uniform buffer (read-only structured data)
    UniformBuffer,
    /// Storage buffer (read/write)
    StorageBuffer,
    /// Combined image sampler (texture + sampler in one binding)
    CombinedImageSampler,
    /// Sampled image (texture without sampler)
    SampledImage,
    /// Storage image (read/write image)
    StorageImage,
}

bitflags! {
    /// Shader stage visibility flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX   = 0x01;
        const FRAGMENT = 0x02;
        const COMPUTE  = 0x04;
    }
}

/// Description of a single binding slot within a descriptor set layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorBinding {
    /// Binding number (corresponds to `layout(binding = N)` in GLSL)
    pub binding: u32,
    /// Type of resource at this binding
    pub binding_type: DescriptorType,
    /// Number of descriptors at this binding (>1 for arrays)
    pub count: u32,
    /// Shader stages that access this binding
    pub stage_flags: ShaderStageFlags,
}

/// Normalized description of a descriptor set layout.
///
/// Bindings are sorted by binding index so that two layout requests with the
/// same bindings in any input order compare equal. Value equality is the cache
/// identity used by DescriptorLayoutCache: equal infos collapse to one GPU
/// layout object. Duplicate binding indices are undefined input and not
/// validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DescriptorLayoutInfo {
    bindings: Vec<DescriptorBinding>,
}

impl DescriptorLayoutInfo {
    /// Build a normalized layout info from a binding list (stable sort by binding index).
    pub fn from_bindings(bindings: &[DescriptorBinding]) -> Self {
        let mut bindings = bindings.to_vec();
        bindings.sort_by_key(|b| b.binding);
        Self { bindings }
    }

    /// The normalized (sorted) binding list.
    pub fn bindings(&self) -> &[DescriptorBinding] {
        &self.bindings
    }
}

// ============================================================================
// Pool sizing
// ============================================================================

/// Capacity profile for a descriptor pool (descriptor-type -> max count).
///
/// Sized generously so a single pool amortizes creation cost across many
/// frames of descriptor churn. Tests shrink `max_sets` to force pool rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorPoolSizes {
    /// Max combined image sampler descriptors per pool
    pub combined_image_samplers: u32,
    /// Max uniform buffer descriptors per pool
    pub uniform_buffers: u32,
    /// Max storage buffer descriptors per pool
    pub storage_buffers: u32,
    /// Max descriptor sets carved from one pool
    pub max_sets: u32,
}

impl Default for DescriptorPoolSizes {
    fn default() -> Self {
        Self {
            combined_image_samplers: 2048,
            uniform_buffers: 1024,
            storage_buffers: 1024,
            max_sets: 1024,
        }
    }
}

// ============================================================================
// Descriptor writes (concrete resources bound into a set)
// ============================================================================

/// A concrete resource to write into a descriptor set
pub enum DescriptorResource {
    /// Uniform buffer binding
    UniformBuffer(Arc<dyn Buffer>),
    /// Storage buffer binding
    StorageBuffer(Arc<dyn Buffer>),
}

/// A single descriptor set write: one resource into one binding slot
pub struct DescriptorWrite {
    /// Binding number to write
    pub binding: u32,
    /// Resource to bind
    pub resource: DescriptorResource,
}

// ============================================================================
// Marker traits for backend handles
// ============================================================================
//
// These carry no Drop: descriptor objects follow the explicit create/destroy
// protocol on GraphicsDevice (sets are pool-owned and freed with their pool).

/// Descriptor set layout handle (backend owns the GPU object)
pub trait DescriptorSetLayout: Send + Sync {}

/// Descriptor pool handle (backend owns the GPU object)
pub trait DescriptorPool: Send + Sync {}

/// Descriptor set handle, carved from a pool
pub trait DescriptorSet: Send + Sync {}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
