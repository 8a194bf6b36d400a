//! Unit tests for descriptor description types
//!
//! Covers layout info normalization (the cache identity) and pool sizing
//! defaults.

use crate::graphics_device::{
    DescriptorBinding, DescriptorLayoutInfo, DescriptorPoolSizes, DescriptorType,
    ShaderStageFlags,
};

fn binding(index: u32, binding_type: DescriptorType) -> DescriptorBinding {
    DescriptorBinding {
        binding: index,
        binding_type,
        count: 1,
        stage_flags: ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT,
    }
}

// ============================================================================
// LAYOUT INFO NORMALIZATION
// ============================================================================

#[test]
fn test_layout_info_sorts_bindings() {
    let info = DescriptorLayoutInfo::from_bindings(&[
        binding(2, DescriptorType::StorageBuffer),
        binding(0, DescriptorType::UniformBuffer),
        binding(1, DescriptorType::CombinedImageSampler),
    ]);

    let indices: Vec<u32> = info.bindings().iter().map(|b| b.binding).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_layout_info_order_insensitive_equality() {
    let a = DescriptorLayoutInfo::from_bindings(&[
        binding(0, DescriptorType::UniformBuffer),
        binding(1, DescriptorType::CombinedImageSampler),
    ]);
    let b = DescriptorLayoutInfo::from_bindings(&[
        binding(1, DescriptorType::CombinedImageSampler),
        binding(0, DescriptorType::UniformBuffer),
    ]);

    assert_eq!(a, b);

    // Equal infos must hash equal (cache key requirement)
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let hash = |info: &DescriptorLayoutInfo| {
        let mut hasher = DefaultHasher::new();
        info.hash(&mut hasher);
        hasher.finish()
    };
    assert_eq!(hash(&a), hash(&b));
}

#[test]
fn test_layout_info_different_bindings_not_equal() {
    let a = DescriptorLayoutInfo::from_bindings(&[binding(0, DescriptorType::UniformBuffer)]);
    let b = DescriptorLayoutInfo::from_bindings(&[binding(0, DescriptorType::StorageBuffer)]);
    let c = DescriptorLayoutInfo::from_bindings(&[binding(1, DescriptorType::UniformBuffer)]);

    assert_ne!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_layout_info_stage_flags_matter() {
    let vertex_only = DescriptorLayoutInfo::from_bindings(&[DescriptorBinding {
        binding: 0,
        binding_type: DescriptorType::UniformBuffer,
        count: 1,
        stage_flags: ShaderStageFlags::VERTEX,
    }]);
    let both = DescriptorLayoutInfo::from_bindings(&[DescriptorBinding {
        binding: 0,
        binding_type: DescriptorType::UniformBuffer,
        count: 1,
        stage_flags: ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT,
    }]);

    assert_ne!(vertex_only, both);
}

#[test]
fn test_layout_info_empty() {
    let info = DescriptorLayoutInfo::from_bindings(&[]);
    assert!(info.bindings().is_empty());
    assert_eq!(info, DescriptorLayoutInfo::default());
}

// ============================================================================
// POOL SIZES
// ============================================================================

#[test]
fn test_pool_sizes_defaults() {
    let sizes = DescriptorPoolSizes::default();
    assert_eq!(sizes.combined_image_samplers, 2048);
    assert_eq!(sizes.uniform_buffers, 1024);
    assert_eq!(sizes.storage_buffers, 1024);
    assert_eq!(sizes.max_sets, 1024);
}
