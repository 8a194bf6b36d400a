/// VulkanGraphicsDevice - Vulkan implementation of the GraphicsDevice trait

use nebula_3d_engine::nebula3d::{Result, Error};
use nebula_3d_engine::nebula3d::gpu::{
    GraphicsDevice,
    Buffer, BufferDesc, BufferUsage,
    CommandList,
    DescriptorLayoutInfo, DescriptorPool, DescriptorPoolSizes,
    DescriptorResource, DescriptorSet, DescriptorSetLayout,
    DescriptorType, DescriptorWrite, ShaderStageFlags,
};
use nebula_3d_engine::{engine_error, engine_err};
use ash::vk;
use std::ffi::CString;
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex};
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};

use crate::vulkan_buffer::VulkanBuffer;
use crate::vulkan_command_list::VulkanCommandList;
use crate::vulkan_context::GpuContext;
use crate::vulkan_descriptor_set::{
    VulkanDescriptorPool, VulkanDescriptorSet, VulkanDescriptorSetLayout,
};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for creating a VulkanGraphicsDevice
#[derive(Debug, Clone)]
pub struct VulkanDeviceConfig {
    /// Application name reported to the Vulkan driver
    pub app_name: String,
    /// Which physical device to use (0 = first enumerated GPU)
    pub physical_device_index: usize,
}

impl Default for VulkanDeviceConfig {
    fn default() -> Self {
        Self {
            app_name: "Nebula3D Application".to_string(),
            physical_device_index: 0,
        }
    }
}

// ============================================================================
// Type conversions
// ============================================================================

/// Convert engine shader stage flags to Vulkan stage flags
pub(crate) fn stage_flags_to_vk(stages: ShaderStageFlags) -> vk::ShaderStageFlags {
    let mut flags = vk::ShaderStageFlags::empty();
    if stages.contains(ShaderStageFlags::VERTEX) {
        flags |= vk::ShaderStageFlags::VERTEX;
    }
    if stages.contains(ShaderStageFlags::FRAGMENT) {
        flags |= vk::ShaderStageFlags::FRAGMENT;
    }
    if stages.contains(ShaderStageFlags::COMPUTE) {
        flags |= vk::ShaderStageFlags::COMPUTE;
    }
    flags
}

/// Convert engine descriptor type to Vulkan descriptor type
fn descriptor_type_to_vk(binding_type: DescriptorType) -> vk::DescriptorType {
    match binding_type {
        DescriptorType::UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
        DescriptorType::StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
        DescriptorType::CombinedImageSampler => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
        DescriptorType::SampledImage => vk::DescriptorType::SAMPLED_IMAGE,
        DescriptorType::StorageImage => vk::DescriptorType::STORAGE_IMAGE,
    }
}

// ============================================================================
// Device
// ============================================================================

/// Vulkan graphics device implementation
///
/// Central object for creating GPU resources. The device is headless: it
/// never touches a window or swapchain, so it works the same in offscreen
/// tools and in tests.
pub struct VulkanGraphicsDevice {
    /// Vulkan entry (keeps the loader alive)
    _entry: ash::Entry,
    /// Vulkan instance reference (also stored in GpuContext)
    _instance: ash::Instance,
    /// Logical device reference (also stored in GpuContext)
    device: Arc<ash::Device>,

    /// GPU memory allocator reference (also stored in GpuContext)
    allocator: ManuallyDrop<Arc<Mutex<Allocator>>>,

    /// Shared GPU context for all resources (buffers, command lists)
    /// Owns device, instance, and debug messenger destruction
    gpu_context: Arc<GpuContext>,
}

impl VulkanGraphicsDevice {
    /// Create a new headless Vulkan device
    ///
    /// Loads the Vulkan library, creates an instance (with validation layers
    /// when the `vulkan-validation` feature is enabled), picks a physical
    /// device and its graphics queue family, and sets up the GPU memory
    /// allocator.
    pub fn new(config: VulkanDeviceConfig) -> Result<Self> {
        unsafe {
            // Create Vulkan Entry
            let entry = ash::Entry::load()
                .map_err(|e| {
                    engine_error!("nebula3d::vulkan", "Failed to load Vulkan library: {:?}", e);
                    Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
                })?;

            // Application Info
            let app_name = CString::new(config.app_name.as_str())
                .map_err(|_| Error::InitializationFailed(
                    "Application name contains a NUL byte".to_string(),
                ))?;
            let app_info = vk::ApplicationInfo::default()
                .application_name(&app_name)
                .application_version(vk::make_api_version(0, 1, 0, 0))
                .engine_name(c"Nebula3D")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_3);

            // Instance extensions and validation layers
            #[cfg(feature = "vulkan-validation")]
            let extension_names: Vec<*const std::ffi::c_char> =
                vec![ash::ext::debug_utils::NAME.as_ptr()];
            #[cfg(not(feature = "vulkan-validation"))]
            let extension_names: Vec<*const std::ffi::c_char> = Vec::new();

            #[cfg(feature = "vulkan-validation")]
            let layer_names: Vec<*const std::ffi::c_char> =
                vec![c"VK_LAYER_KHRONOS_validation".as_ptr()];
            #[cfg(not(feature = "vulkan-validation"))]
            let layer_names: Vec<*const std::ffi::c_char> = Vec::new();

            let create_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_names)
                .enabled_extension_names(&extension_names);

            let instance = entry
                .create_instance(&create_info, None)
                .map_err(|e| {
                    engine_error!("nebula3d::vulkan", "Failed to create Vulkan instance: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
                })?;

            // Setup debug messenger when validation is compiled in
            #[cfg(feature = "vulkan-validation")]
            let (debug_utils_loader, debug_messenger) = {
                let debug_utils = ash::ext::debug_utils::Instance::new(&entry, &instance);

                let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
                    .message_severity(
                        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                            | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
                    )
                    .message_type(
                        vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                            | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                            | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
                    )
                    .pfn_user_callback(Some(crate::debug::vulkan_debug_callback));

                let messenger = debug_utils
                    .create_debug_utils_messenger(&debug_info, None)
                    .map_err(|e| {
                        engine_error!("nebula3d::vulkan", "Failed to create debug messenger: {:?}", e);
                        Error::InitializationFailed(format!("Failed to create debug messenger: {:?}", e))
                    })?;

                (Some(debug_utils), Some(messenger))
            };
            #[cfg(not(feature = "vulkan-validation"))]
            let (debug_utils_loader, debug_messenger) = (None, None);

            // Pick Physical Device
            let physical_devices = instance
                .enumerate_physical_devices()
                .map_err(|e| {
                    engine_error!("nebula3d::vulkan", "Failed to enumerate physical devices: {:?}", e);
                    Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
                })?;

            let physical_device = physical_devices
                .into_iter()
                .nth(config.physical_device_index)
                .ok_or_else(|| {
                    engine_error!(
                        "nebula3d::vulkan",
                        "No Vulkan-capable GPU at index {}",
                        config.physical_device_index
                    );
                    Error::InitializationFailed(format!(
                        "No Vulkan-capable GPU at index {}",
                        config.physical_device_index
                    ))
                })?;

            // Find Graphics Queue Family
            let queue_families = instance.get_physical_device_queue_family_properties(physical_device);

            let graphics_family_index = queue_families
                .iter()
                .enumerate()
                .find(|(_, qf)| qf.queue_flags.contains(vk::QueueFlags::GRAPHICS))
                .map(|(i, _)| i as u32)
                .ok_or_else(|| {
                    engine_error!("nebula3d::vulkan", "No graphics queue family found");
                    Error::InitializationFailed("No graphics queue family found".to_string())
                })?;

            // Create Logical Device (no swapchain extension - the device is headless)
            let queue_priorities = [1.0];
            let queue_create_infos = [
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(graphics_family_index)
                    .queue_priorities(&queue_priorities),
            ];

            let device_create_info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_create_infos);

            let device = Arc::new(
                instance
                    .create_device(physical_device, &device_create_info, None)
                    .map_err(|e| {
                        engine_error!("nebula3d::vulkan", "Failed to create logical device: {:?}", e);
                        Error::InitializationFailed(format!("Failed to create device: {:?}", e))
                    })?,
            );

            // Create GPU allocator
            let allocator = Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: (*device).clone(),
                physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            })
            .map_err(|e| {
                engine_error!("nebula3d::vulkan", "Failed to create GPU allocator: {:?}", e);
                Error::InitializationFailed(format!("Failed to create allocator: {:?}", e))
            })?;

            // Create shared GPU context for all resources
            // GpuContext owns device, instance, and debug messenger destruction
            let allocator_arc = Arc::new(Mutex::new(allocator));
            let gpu_context = Arc::new(GpuContext::new(
                (*device).clone(),
                Arc::clone(&allocator_arc),
                graphics_family_index,
                instance.clone(),
                debug_utils_loader,
                debug_messenger,
            ));

            Ok(Self {
                _entry: entry,
                _instance: instance,
                device,
                allocator: ManuallyDrop::new(allocator_arc),
                gpu_context,
            })
        }
    }
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn create_descriptor_set_layout(
        &self,
        info: &DescriptorLayoutInfo,
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        let vk_bindings: Vec<vk::DescriptorSetLayoutBinding> = info
            .bindings()
            .iter()
            .map(|b| {
                vk::DescriptorSetLayoutBinding::default()
                    .binding(b.binding)
                    .descriptor_type(descriptor_type_to_vk(b.binding_type))
                    .descriptor_count(b.count)
                    .stage_flags(stage_flags_to_vk(b.stage_flags))
            })
            .collect();

        let create_info = vk::DescriptorSetLayoutCreateInfo::default()
            .bindings(&vk_bindings);

        let layout = unsafe { self.device.create_descriptor_set_layout(&create_info, None) }
            .map_err(|e| {
                engine_err!("nebula3d::vulkan", "Failed to create descriptor set layout: {:?}", e)
            })?;

        Ok(Arc::new(VulkanDescriptorSetLayout { layout }))
    }

    fn destroy_descriptor_set_layout(&self, layout: &Arc<dyn DescriptorSetLayout>) -> Result<()> {
        unsafe {
            let vk_layout =
                layout.as_ref() as *const dyn DescriptorSetLayout as *const VulkanDescriptorSetLayout;
            self.device.destroy_descriptor_set_layout((*vk_layout).layout, None);
        }
        Ok(())
    }

    fn create_descriptor_pool(&self, sizes: &DescriptorPoolSizes) -> Result<Arc<dyn DescriptorPool>> {
        let pool_sizes: Vec<vk::DescriptorPoolSize> = [
            (vk::DescriptorType::COMBINED_IMAGE_SAMPLER, sizes.combined_image_samplers),
            (vk::DescriptorType::UNIFORM_BUFFER, sizes.uniform_buffers),
            (vk::DescriptorType::STORAGE_BUFFER, sizes.storage_buffers),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(ty, count)| vk::DescriptorPoolSize { ty, descriptor_count: count })
        .collect();

        let info = vk::DescriptorPoolCreateInfo::default()
            .pool_sizes(&pool_sizes)
            .max_sets(sizes.max_sets);

        let pool = unsafe { self.device.create_descriptor_pool(&info, None) }
            .map_err(|e| {
                engine_err!("nebula3d::vulkan", "Failed to create descriptor pool: {:?}", e)
            })?;

        Ok(Arc::new(VulkanDescriptorPool { pool }))
    }

    fn destroy_descriptor_pool(&self, pool: &Arc<dyn DescriptorPool>) -> Result<()> {
        unsafe {
            let vk_pool = pool.as_ref() as *const dyn DescriptorPool as *const VulkanDescriptorPool;
            self.device.destroy_descriptor_pool((*vk_pool).pool, None);
        }
        Ok(())
    }

    fn reset_descriptor_pool(&self, pool: &Arc<dyn DescriptorPool>) -> Result<()> {
        unsafe {
            let vk_pool = pool.as_ref() as *const dyn DescriptorPool as *const VulkanDescriptorPool;
            self.device
                .reset_descriptor_pool((*vk_pool).pool, vk::DescriptorPoolResetFlags::empty())
                .map_err(|e| {
                    engine_err!("nebula3d::vulkan", "Failed to reset descriptor pool: {:?}", e)
                })
        }
    }

    fn allocate_descriptor_set(
        &self,
        pool: &Arc<dyn DescriptorPool>,
        layout: &Arc<dyn DescriptorSetLayout>,
    ) -> Result<Arc<dyn DescriptorSet>> {
        unsafe {
            let vk_pool = pool.as_ref() as *const dyn DescriptorPool as *const VulkanDescriptorPool;
            let vk_layout =
                layout.as_ref() as *const dyn DescriptorSetLayout as *const VulkanDescriptorSetLayout;

            let layouts = [(*vk_layout).layout];
            let allocate_info = vk::DescriptorSetAllocateInfo::default()
                .descriptor_pool((*vk_pool).pool)
                .set_layouts(&layouts);

            match self.device.allocate_descriptor_sets(&allocate_info) {
                Ok(sets) => Ok(Arc::new(VulkanDescriptorSet { descriptor_set: sets[0] })),
                // Exhaustion is recoverable: the allocator rotates to a fresh pool
                Err(vk::Result::ERROR_OUT_OF_POOL_MEMORY)
                | Err(vk::Result::ERROR_FRAGMENTED_POOL) => Err(Error::PoolExhausted),
                Err(e) => Err(engine_err!(
                    "nebula3d::vulkan",
                    "Failed to allocate descriptor set: {:?}",
                    e
                )),
            }
        }
    }

    fn update_descriptor_set(
        &self,
        set: &Arc<dyn DescriptorSet>,
        writes: &[DescriptorWrite],
    ) -> Result<()> {
        unsafe {
            let vk_set = set.as_ref() as *const dyn DescriptorSet as *const VulkanDescriptorSet;
            let descriptor_set = (*vk_set).descriptor_set;

            // buffer_infos must stay alive until update_descriptor_sets returns,
            // and must not reallocate while vk_writes holds references into it
            let mut buffer_infos: Vec<vk::DescriptorBufferInfo> = Vec::with_capacity(writes.len());
            for write in writes {
                match &write.resource {
                    DescriptorResource::UniformBuffer(buffer)
                    | DescriptorResource::StorageBuffer(buffer) => {
                        let vk_buffer =
                            buffer.as_ref() as *const dyn Buffer as *const VulkanBuffer;
                        buffer_infos.push(
                            vk::DescriptorBufferInfo::default()
                                .buffer((*vk_buffer).buffer)
                                .offset(0)
                                .range(vk::WHOLE_SIZE),
                        );
                    }
                }
            }

            let mut vk_writes: Vec<vk::WriteDescriptorSet> = Vec::with_capacity(writes.len());
            for (info, write) in buffer_infos.iter().zip(writes) {
                let descriptor_type = match &write.resource {
                    DescriptorResource::UniformBuffer(_) => vk::DescriptorType::UNIFORM_BUFFER,
                    DescriptorResource::StorageBuffer(_) => vk::DescriptorType::STORAGE_BUFFER,
                };
                vk_writes.push(
                    vk::WriteDescriptorSet::default()
                        .dst_set(descriptor_set)
                        .dst_binding(write.binding)
                        .dst_array_element(0)
                        .descriptor_type(descriptor_type)
                        .buffer_info(std::slice::from_ref(info)),
                );
            }

            self.device.update_descriptor_sets(&vk_writes, &[]);

            Ok(())
        }
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>> {
        unsafe {
            let usage = match desc.usage {
                BufferUsage::Vertex => vk::BufferUsageFlags::VERTEX_BUFFER,
                BufferUsage::Index => vk::BufferUsageFlags::INDEX_BUFFER,
                BufferUsage::Uniform => vk::BufferUsageFlags::UNIFORM_BUFFER,
                BufferUsage::Storage => vk::BufferUsageFlags::STORAGE_BUFFER,
            };

            // Create buffer
            let buffer_create_info = vk::BufferCreateInfo::default()
                .size(desc.size)
                .usage(usage | vk::BufferUsageFlags::TRANSFER_DST)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = self.device.create_buffer(&buffer_create_info, None)
                .map_err(|e| {
                    engine_err!(
                        "nebula3d::vulkan",
                        "Failed to create buffer of size {} bytes: {:?}",
                        desc.size,
                        e
                    )
                })?;

            // Allocate memory (CpuToGpu so the buffer is mappable for updates)
            let requirements = self.device.get_buffer_memory_requirements(buffer);

            let allocation = self
                .allocator
                .lock()
                .map_err(|_| engine_err!("nebula3d::vulkan", "GPU allocator lock poisoned"))?
                .allocate(&gpu_allocator::vulkan::AllocationCreateDesc {
                    name: "buffer",
                    requirements,
                    location: gpu_allocator::MemoryLocation::CpuToGpu,
                    linear: true,
                    allocation_scheme: gpu_allocator::vulkan::AllocationScheme::GpuAllocatorManaged,
                })
                .map_err(|_e| {
                    let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                    engine_error!(
                        "nebula3d::vulkan",
                        "Out of GPU memory for buffer (required: {:.2} MB)",
                        size_mb
                    );
                    Error::OutOfMemory
                })?;

            // Bind memory
            self.device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset())
                .map_err(|e| engine_err!("nebula3d::vulkan", "Failed to bind buffer memory: {:?}", e))?;

            Ok(Arc::new(VulkanBuffer::new(
                Arc::clone(&self.gpu_context),
                buffer,
                allocation,
                desc.size,
            )))
        }
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        Ok(Box::new(VulkanCommandList::new(Arc::clone(&self.gpu_context))?))
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe {
            self.device
                .device_wait_idle()
                .map_err(|e| engine_err!("nebula3d::vulkan", "Failed to wait idle: {:?}", e))
        }
    }
}

impl Drop for VulkanGraphicsDevice {
    fn drop(&mut self) {
        unsafe {
            // Wait for device to finish
            self.device.device_wait_idle().ok();

            // 1. Drop allocator: free VkDeviceMemory pages BEFORE destroying device.
            //    First drop VulkanGraphicsDevice's Arc, then GpuContext's ManuallyDrop Arc.
            ManuallyDrop::drop(&mut self.allocator);
            if let Some(ctx) = Arc::get_mut(&mut self.gpu_context) {
                ManuallyDrop::drop(&mut ctx.allocator);
            }

            // 2. Destroy debug messenger BEFORE device and instance
            if let (Some(debug_utils), Some(messenger)) = (
                &self.gpu_context.debug_utils_loader,
                &self.gpu_context.debug_messenger,
            ) {
                debug_utils.destroy_debug_utils_messenger(*messenger, None);
            }

            // 3. Destroy device and instance
            self.device.destroy_device(None);
            self._instance.destroy_instance(None);
        }
    }
}
