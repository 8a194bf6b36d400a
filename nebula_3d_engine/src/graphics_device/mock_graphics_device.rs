/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Tracks live descriptor objects with capacity bookkeeping so allocator and
/// cache behavior (pool rotation, exhaustion, double-destroy) can be tested
/// without a graphics backend. Every call is journaled for assertions.

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
#[cfg(test)]
use rustc_hash::{FxHashMap, FxHashSet};

#[cfg(test)]
use crate::error::{Error, Result};
#[cfg(test)]
use crate::graphics_device::{
    Buffer, BufferDesc, CommandList, DescriptorLayoutInfo, DescriptorPool,
    DescriptorPoolSizes, DescriptorResource, DescriptorSet, DescriptorSetLayout,
    DescriptorWrite, GraphicsDevice, IndexType, Pipeline, Rect2D,
    ShaderStageFlags, Viewport,
};

// ============================================================================
// Mock descriptor handles
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockDescriptorSetLayout {
    pub id: u64,
    pub binding_count: usize,
}

#[cfg(test)]
impl DescriptorSetLayout for MockDescriptorSetLayout {}

#[cfg(test)]
#[derive(Debug)]
pub struct MockDescriptorPool {
    pub id: u64,
}

#[cfg(test)]
impl DescriptorPool for MockDescriptorPool {}

#[cfg(test)]
#[derive(Debug)]
pub struct MockDescriptorSet {
    pub id: u64,
    pub pool_id: u64,
}

#[cfg(test)]
impl DescriptorSet for MockDescriptorSet {}

// ============================================================================
// Mock Buffer
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
    pub data: Mutex<Vec<u8>>,
}

#[cfg(test)]
impl MockBuffer {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            data: Mutex::new(vec![0u8; size as usize]),
        }
    }
}

#[cfg(test)]
impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            return Err(Error::InvalidResource(format!(
                "buffer write out of bounds: offset {} + len {} > size {}",
                offset, data.len(), self.size
            )));
        }
        let mut bytes = self.data.lock().unwrap();
        bytes[offset as usize..offset as usize + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.size
    }
}

// ============================================================================
// Mock Pipeline
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockPipeline {
    pub name: String,
}

#[cfg(test)]
impl MockPipeline {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

#[cfg(test)]
impl Pipeline for MockPipeline {}

// ============================================================================
// Mock CommandList
// ============================================================================

/// Journals every recorded command by name for test assertions.
///
/// The journal is shared: MockGraphicsDevice::create_command_list hands out
/// lists wired to the device's command journal, and directly constructed
/// lists own their journal.
#[cfg(test)]
#[derive(Debug)]
pub struct MockCommandList {
    pub commands: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl MockCommandList {
    pub fn new() -> Self {
        Self { commands: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn with_journal(commands: Arc<Mutex<Vec<String>>>) -> Self {
        Self { commands }
    }

    pub fn recorded_commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        self.commands.lock().unwrap().push("begin".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.commands.lock().unwrap().push("end".to_string());
        Ok(())
    }

    fn set_viewport(&mut self, _viewport: Viewport) -> Result<()> {
        self.commands.lock().unwrap().push("set_viewport".to_string());
        Ok(())
    }

    fn set_scissor(&mut self, _scissor: Rect2D) -> Result<()> {
        self.commands.lock().unwrap().push("set_scissor".to_string());
        Ok(())
    }

    fn bind_pipeline(&mut self, _pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.commands.lock().unwrap().push("bind_pipeline".to_string());
        Ok(())
    }

    fn bind_descriptor_set(
        &mut self,
        _pipeline: &Arc<dyn Pipeline>,
        set_index: u32,
        _set: &Arc<dyn DescriptorSet>,
    ) -> Result<()> {
        self.commands.lock().unwrap()
            .push(format!("bind_descriptor_set({})", set_index));
        Ok(())
    }

    fn push_constants(&mut self, _stages: ShaderStageFlags, offset: u32, data: &[u8]) -> Result<()> {
        self.commands.lock().unwrap()
            .push(format!("push_constants(offset={}, len={})", offset, data.len()));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, _buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        self.commands.lock().unwrap().push("bind_vertex_buffer".to_string());
        Ok(())
    }

    fn bind_index_buffer(
        &mut self,
        _buffer: &Arc<dyn Buffer>,
        _offset: u64,
        _index_type: IndexType,
    ) -> Result<()> {
        self.commands.lock().unwrap().push("bind_index_buffer".to_string());
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.commands.lock().unwrap()
            .push(format!("draw({}, {})", vertex_count, first_vertex));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        self.commands.lock().unwrap()
            .push(format!("draw_indexed({}, {}, {})", index_count, first_index, vertex_offset));
        Ok(())
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone, Copy)]
struct PoolState {
    max_sets: u32,
    allocated: u32,
}

/// Mock GraphicsDevice with descriptor capacity bookkeeping
///
/// Pools enforce their `max_sets` capacity and report `Error::PoolExhausted`
/// when full, so DescriptorAllocator rotation is exercised for real. Destroy
/// and reset of an unknown handle fail with `Error::InvalidResource`, which
/// catches double-destroy bugs in tests.
#[cfg(test)]
pub struct MockGraphicsDevice {
    next_id: AtomicU64,

    live_layouts: Mutex<FxHashSet<u64>>,
    live_pools: Mutex<FxHashMap<u64, PoolState>>,

    /// Fail create_descriptor_set_layout calls while set (clone the Arc to
    /// toggle after the mock has been moved behind the device handle)
    pub fail_layout_creation: Arc<AtomicBool>,
    /// Fail create_descriptor_pool calls while set
    pub fail_pool_creation: Arc<AtomicBool>,

    /// Ids of created layouts, in creation order
    pub created_layouts: Arc<Mutex<Vec<u64>>>,
    /// Ids of destroyed layouts, in destruction order
    pub destroyed_layouts: Arc<Mutex<Vec<u64>>>,
    /// Ids of created pools, in creation order
    pub created_pools: Arc<Mutex<Vec<u64>>>,
    /// Ids of destroyed pools, in destruction order
    pub destroyed_pools: Arc<Mutex<Vec<u64>>>,
    /// Ids of reset pools, in reset order
    pub reset_pools: Arc<Mutex<Vec<u64>>>,
    /// (set id, pool id) pairs, in allocation order
    pub allocated_sets: Arc<Mutex<Vec<(u64, u64)>>>,
    /// Descriptor writes journaled as "set <id> binding <n> <kind>"
    pub descriptor_writes: Arc<Mutex<Vec<String>>>,
    /// Commands recorded by lists handed out via create_command_list
    pub commands: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            live_layouts: Mutex::new(FxHashSet::default()),
            live_pools: Mutex::new(FxHashMap::default()),
            fail_layout_creation: Arc::new(AtomicBool::new(false)),
            fail_pool_creation: Arc::new(AtomicBool::new(false)),
            created_layouts: Arc::new(Mutex::new(Vec::new())),
            destroyed_layouts: Arc::new(Mutex::new(Vec::new())),
            created_pools: Arc::new(Mutex::new(Vec::new())),
            destroyed_pools: Arc::new(Mutex::new(Vec::new())),
            reset_pools: Arc::new(Mutex::new(Vec::new())),
            allocated_sets: Arc::new(Mutex::new(Vec::new())),
            descriptor_writes: Arc::new(Mutex::new(Vec::new())),
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Wrap a new mock in the Arc<Mutex<dyn GraphicsDevice>> shape the
    /// allocator and cache take.
    pub fn new_shared() -> Arc<Mutex<dyn GraphicsDevice>> {
        Arc::new(Mutex::new(Self::new()))
    }

    fn alloc_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn live_layout_count(&self) -> usize {
        self.live_layouts.lock().unwrap().len()
    }

    pub fn live_pool_count(&self) -> usize {
        self.live_pools.lock().unwrap().len()
    }

    pub fn created_layout_count(&self) -> usize {
        self.created_layouts.lock().unwrap().len()
    }

    pub fn created_pool_count(&self) -> usize {
        self.created_pools.lock().unwrap().len()
    }

    pub fn allocated_set_count(&self) -> usize {
        self.allocated_sets.lock().unwrap().len()
    }
}

#[cfg(test)]
impl GraphicsDevice for MockGraphicsDevice {
    fn create_descriptor_set_layout(
        &self,
        info: &DescriptorLayoutInfo,
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        if self.fail_layout_creation.load(Ordering::Relaxed) {
            return Err(Error::BackendError("layout creation failure injected".to_string()));
        }
        let id = self.alloc_id();
        self.live_layouts.lock().unwrap().insert(id);
        self.created_layouts.lock().unwrap().push(id);
        Ok(Arc::new(MockDescriptorSetLayout {
            id,
            binding_count: info.bindings().len(),
        }))
    }

    fn destroy_descriptor_set_layout(&self, layout: &Arc<dyn DescriptorSetLayout>) -> Result<()> {
        let mock = unsafe {
            &*(layout.as_ref() as *const dyn DescriptorSetLayout as *const MockDescriptorSetLayout)
        };
        if !self.live_layouts.lock().unwrap().remove(&mock.id) {
            return Err(Error::InvalidResource(format!(
                "descriptor set layout {} is not live", mock.id
            )));
        }
        self.destroyed_layouts.lock().unwrap().push(mock.id);
        Ok(())
    }

    fn create_descriptor_pool(&self, sizes: &DescriptorPoolSizes) -> Result<Arc<dyn DescriptorPool>> {
        if self.fail_pool_creation.load(Ordering::Relaxed) {
            return Err(Error::BackendError("pool creation failure injected".to_string()));
        }
        let id = self.alloc_id();
        self.live_pools.lock().unwrap().insert(id, PoolState {
            max_sets: sizes.max_sets,
            allocated: 0,
        });
        self.created_pools.lock().unwrap().push(id);
        Ok(Arc::new(MockDescriptorPool { id }))
    }

    fn destroy_descriptor_pool(&self, pool: &Arc<dyn DescriptorPool>) -> Result<()> {
        let mock = unsafe {
            &*(pool.as_ref() as *const dyn DescriptorPool as *const MockDescriptorPool)
        };
        if self.live_pools.lock().unwrap().remove(&mock.id).is_none() {
            return Err(Error::InvalidResource(format!(
                "descriptor pool {} is not live", mock.id
            )));
        }
        self.destroyed_pools.lock().unwrap().push(mock.id);
        Ok(())
    }

    fn reset_descriptor_pool(&self, pool: &Arc<dyn DescriptorPool>) -> Result<()> {
        let mock = unsafe {
            &*(pool.as_ref() as *const dyn DescriptorPool as *const MockDescriptorPool)
        };
        let mut pools = self.live_pools.lock().unwrap();
        let state = pools.get_mut(&mock.id)
            .ok_or_else(|| Error::InvalidResource(format!(
                "descriptor pool {} is not live", mock.id
            )))?;
        state.allocated = 0;
        self.reset_pools.lock().unwrap().push(mock.id);
        Ok(())
    }

    fn allocate_descriptor_set(
        &self,
        pool: &Arc<dyn DescriptorPool>,
        _layout: &Arc<dyn DescriptorSetLayout>,
    ) -> Result<Arc<dyn DescriptorSet>> {
        let mock_pool = unsafe {
            &*(pool.as_ref() as *const dyn DescriptorPool as *const MockDescriptorPool)
        };
        let mut pools = self.live_pools.lock().unwrap();
        let state = pools.get_mut(&mock_pool.id)
            .ok_or_else(|| Error::InvalidResource(format!(
                "descriptor pool {} is not live", mock_pool.id
            )))?;
        if state.allocated >= state.max_sets {
            return Err(Error::PoolExhausted);
        }
        state.allocated += 1;
        drop(pools);

        let id = self.alloc_id();
        self.allocated_sets.lock().unwrap().push((id, mock_pool.id));
        Ok(Arc::new(MockDescriptorSet {
            id,
            pool_id: mock_pool.id,
        }))
    }

    fn update_descriptor_set(
        &self,
        set: &Arc<dyn DescriptorSet>,
        writes: &[DescriptorWrite],
    ) -> Result<()> {
        let mock = unsafe {
            &*(set.as_ref() as *const dyn DescriptorSet as *const MockDescriptorSet)
        };
        let mut journal = self.descriptor_writes.lock().unwrap();
        for write in writes {
            let kind = match write.resource {
                DescriptorResource::UniformBuffer(_) => "uniform_buffer",
                DescriptorResource::StorageBuffer(_) => "storage_buffer",
            };
            journal.push(format!("set {} binding {} {}", mock.id, write.binding, kind));
        }
        Ok(())
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>> {
        Ok(Arc::new(MockBuffer::new(desc.size)))
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        Ok(Box::new(MockCommandList::with_journal(Arc::clone(&self.commands))))
    }

    fn wait_idle(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
