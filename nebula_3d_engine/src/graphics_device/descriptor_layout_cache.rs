/// DescriptorLayoutCache - deduplicates descriptor set layout objects
///
/// Two layout requests with the same bindings (in any input order) collapse to
/// one GPU layout object. The cache never shrinks until cleanup(): the set of
/// distinct layouts is bounded by pipeline variety, not per-frame allocation,
/// so eviction would buy nothing.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::{engine_err, engine_trace, engine_warn};
use crate::graphics_device::{
    DescriptorBinding, DescriptorLayoutInfo, DescriptorSetLayout, GraphicsDevice,
};

/// Cache of descriptor set layouts keyed by their normalized binding sequence.
///
/// Owns every layout it creates and destroys each exactly once at cleanup().
/// Teardown ordering (after dependent pipelines) is the caller's responsibility.
pub struct DescriptorLayoutCache {
    /// Graphics device used to create/destroy layout objects
    device: Arc<Mutex<dyn GraphicsDevice>>,
    /// Cached layouts, keyed by normalized layout info (value equality)
    layouts: FxHashMap<DescriptorLayoutInfo, Arc<dyn DescriptorSetLayout>>,
}

impl DescriptorLayoutCache {
    /// Create an empty cache backed by the given device.
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>) -> Self {
        Self {
            device,
            layouts: FxHashMap::default(),
        }
    }

    /// Get or create the layout for a binding set.
    ///
    /// The input is normalized by sorting on binding index, so input order
    /// does not matter. On a cache hit no GPU call is made and a clone of the
    /// existing handle is returned. Duplicate binding indices are undefined
    /// input and not validated.
    pub fn create_layout(
        &mut self,
        bindings: &[DescriptorBinding],
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        let info = DescriptorLayoutInfo::from_bindings(bindings);

        if let Some(layout) = self.layouts.get(&info) {
            return Ok(Arc::clone(layout));
        }

        let layout = {
            let device = self.device.lock()
                .map_err(|_| engine_err!("nebula3d::DescriptorLayoutCache",
                    "Graphics device lock poisoned"))?;
            device.create_descriptor_set_layout(&info)?
        };

        engine_trace!("nebula3d::DescriptorLayoutCache",
            "Created descriptor set layout with {} bindings (cache size: {})",
            info.bindings().len(), self.layouts.len() + 1);

        self.layouts.insert(info, Arc::clone(&layout));
        Ok(layout)
    }

    /// Number of distinct cached layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// True if the cache holds no layouts.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Destroy every cached layout exactly once and clear the cache.
    ///
    /// Must be called after all dependent pipeline objects are destroyed;
    /// the cache does not track dependents.
    pub fn cleanup(&mut self) {
        let device = match self.device.lock() {
            Ok(device) => device,
            Err(_) => {
                engine_warn!("nebula3d::DescriptorLayoutCache",
                    "Graphics device lock poisoned during cleanup, leaking {} layouts",
                    self.layouts.len());
                self.layouts.clear();
                return;
            }
        };

        for (_, layout) in self.layouts.drain() {
            if let Err(e) = device.destroy_descriptor_set_layout(&layout) {
                engine_warn!("nebula3d::DescriptorLayoutCache",
                    "Failed to destroy descriptor set layout: {}", e);
            }
        }
    }
}

#[cfg(test)]
#[path = "descriptor_layout_cache_tests.rs"]
mod tests;
