/// DescriptorAllocator - pool-rotation descriptor set allocator
///
/// Allocates descriptor sets from a current pool; when that pool reports
/// exhaustion the allocator grabs a fresh pool (reusing a previously reset one
/// before creating a new one) and retries the allocation exactly once.
/// reset_pools() recycles every used pool at a frame boundary so steady-state
/// rendering creates no new pools.

use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::{engine_err, engine_error, engine_trace, engine_warn};
use crate::graphics_device::{
    DescriptorPool, DescriptorPoolSizes, DescriptorSet, DescriptorSetLayout, GraphicsDevice,
};

/// Descriptor set allocator with automatic pool rotation.
///
/// Not thread-safe by itself; callers serialize access (it travels inside the
/// per-frame context, which is `&mut`).
pub struct DescriptorAllocator {
    /// Graphics device used to create/reset/destroy pools and allocate sets
    device: Arc<Mutex<dyn GraphicsDevice>>,
    /// Capacity profile applied to every pool this allocator creates
    pool_sizes: DescriptorPoolSizes,
    /// Pool allocations are currently served from (also present in used_pools)
    current_pool: Option<Arc<dyn DescriptorPool>>,
    /// Pools that served at least one allocation since the last reset
    used_pools: Vec<Arc<dyn DescriptorPool>>,
    /// Reset pools ready for reuse
    free_pools: Vec<Arc<dyn DescriptorPool>>,
}

impl DescriptorAllocator {
    /// Create an allocator with the default pool capacity profile.
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>) -> Self {
        Self::with_pool_sizes(device, DescriptorPoolSizes::default())
    }

    /// Create an allocator with an explicit pool capacity profile.
    ///
    /// Tests shrink `max_sets` to force pool rotation without thousands of
    /// allocations.
    pub fn with_pool_sizes(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        pool_sizes: DescriptorPoolSizes,
    ) -> Self {
        Self {
            device,
            pool_sizes,
            current_pool: None,
            used_pools: Vec::new(),
            free_pools: Vec::new(),
        }
    }

    /// Allocate one descriptor set with the given layout.
    ///
    /// On pool exhaustion the allocator rotates to a fresh pool and retries
    /// once; a second failure is reported as `Error::AllocationFailed` (the
    /// layout then genuinely does not fit the pool capacity profile).
    pub fn allocate(
        &mut self,
        layout: &Arc<dyn DescriptorSetLayout>,
    ) -> Result<Arc<dyn DescriptorSet>> {
        if self.current_pool.is_none() {
            let pool = self.grab_pool()?;
            self.used_pools.push(Arc::clone(&pool));
            self.current_pool = Some(pool);
        }

        // current_pool is set above
        let pool = match &self.current_pool {
            Some(pool) => Arc::clone(pool),
            None => return Err(engine_err!("nebula3d::DescriptorAllocator",
                "No current descriptor pool")),
        };

        let first_attempt = {
            let device = self.lock_device()?;
            device.allocate_descriptor_set(&pool, layout)
        };

        match first_attempt {
            Ok(set) => Ok(set),
            Err(Error::PoolExhausted) => {
                engine_trace!("nebula3d::DescriptorAllocator",
                    "Descriptor pool exhausted, rotating to a fresh pool ({} used)",
                    self.used_pools.len());

                let fresh = self.grab_pool()?;
                self.used_pools.push(Arc::clone(&fresh));
                self.current_pool = Some(Arc::clone(&fresh));

                let retry = {
                    let device = self.lock_device()?;
                    device.allocate_descriptor_set(&fresh, layout)
                };
                retry.map_err(|e| {
                    engine_error!("nebula3d::DescriptorAllocator",
                        "Descriptor set allocation failed on a fresh pool: {}", e);
                    Error::AllocationFailed(format!(
                        "allocation failed even from a fresh pool: {}", e))
                })
            }
            Err(e) => {
                engine_error!("nebula3d::DescriptorAllocator",
                    "Descriptor set allocation failed: {}", e);
                Err(Error::AllocationFailed(e.to_string()))
            }
        }
    }

    /// Reset every used pool and move it to the free list.
    ///
    /// Frees all sets handed out since the last reset; callers must not use
    /// previously allocated sets afterwards. Called at a frame boundary once
    /// the GPU is done with the frame's sets.
    pub fn reset_pools(&mut self) -> Result<()> {
        {
            let device = self.lock_device()?;
            for pool in &self.used_pools {
                device.reset_descriptor_pool(pool)?;
            }
        }
        self.free_pools.append(&mut self.used_pools);
        self.current_pool = None;
        Ok(())
    }

    /// Destroy every pool this allocator owns (used and free) exactly once.
    ///
    /// Destroying a pool implicitly frees its sets, so outstanding set handles
    /// become invalid. Safe to call more than once.
    pub fn cleanup(&mut self) {
        self.current_pool = None;

        let device = match self.device.lock() {
            Ok(device) => device,
            Err(_) => {
                engine_warn!("nebula3d::DescriptorAllocator",
                    "Graphics device lock poisoned during cleanup, leaking {} pools",
                    self.used_pools.len() + self.free_pools.len());
                self.used_pools.clear();
                self.free_pools.clear();
                return;
            }
        };

        for pool in self.used_pools.drain(..).chain(self.free_pools.drain(..)) {
            if let Err(e) = device.destroy_descriptor_pool(&pool) {
                engine_warn!("nebula3d::DescriptorAllocator",
                    "Failed to destroy descriptor pool: {}", e);
            }
        }
    }

    /// Number of pools that served allocations since the last reset.
    pub fn used_pool_count(&self) -> usize {
        self.used_pools.len()
    }

    /// Number of reset pools waiting for reuse.
    pub fn free_pool_count(&self) -> usize {
        self.free_pools.len()
    }

    /// Pop a reset pool if one is available, otherwise create a new one.
    fn grab_pool(&mut self) -> Result<Arc<dyn DescriptorPool>> {
        if let Some(pool) = self.free_pools.pop() {
            return Ok(pool);
        }
        let device = self.lock_device()?;
        device.create_descriptor_pool(&self.pool_sizes)
    }

    fn lock_device(&self) -> Result<std::sync::MutexGuard<'_, dyn GraphicsDevice + 'static>> {
        self.device.lock()
            .map_err(|_| engine_err!("nebula3d::DescriptorAllocator",
                "Graphics device lock poisoned"))
    }
}

#[cfg(test)]
#[path = "descriptor_allocator_tests.rs"]
mod tests;
