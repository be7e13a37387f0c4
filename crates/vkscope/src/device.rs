use std::fmt;

use ash::vk;
use ash::vk::Handle;
use tracing::{debug, warn};

use crate::dispatch::{allocation_callbacks, DeviceDispatcher};
use crate::error::Result;
use crate::instance::{created, Instance, PhysicalDevice};
use crate::object::*;
use crate::result::{check, check_success, ResultValue};

/// An owned `VkDevice` and its resolved device table.
pub struct Device<'i> {
    physical_device: PhysicalDevice<'i>,
    handle: vk::Device,
    allocator: Option<&'i vk::AllocationCallbacks<'i>>,
    dispatcher: DeviceDispatcher,
    enabled_extensions: Vec<String>,
}

impl<'i> Device<'i> {
    /// Take ownership of `handle` and resolve its table.
    ///
    /// # Safety
    ///
    /// `handle` must be a live device created from `physical_device` with
    /// `allocator`, not owned by anything else, and `get_device_proc_addr`
    /// must come from the parent instance's table.
    pub unsafe fn from_raw(
        physical_device: PhysicalDevice<'i>,
        handle: vk::Device,
        allocator: Option<&'i vk::AllocationCallbacks<'i>>,
        get_device_proc_addr: vk::PFN_vkGetDeviceProcAddr,
        enabled_extensions: Vec<String>,
    ) -> Self {
        // SAFETY: guaranteed by the caller.
        let dispatcher = unsafe { DeviceDispatcher::new(get_device_proc_addr, handle) };
        debug!(
            resolved = dispatcher.table().resolved_count(),
            extensions = enabled_extensions.len(),
            "device created"
        );
        Self {
            physical_device,
            handle,
            allocator,
            dispatcher,
            enabled_extensions,
        }
    }

    pub fn handle(&self) -> vk::Device {
        self.handle
    }

    pub fn physical_device(&self) -> PhysicalDevice<'i> {
        self.physical_device
    }

    pub fn instance(&self) -> &'i Instance<'i> {
        self.physical_device.instance()
    }

    pub fn dispatcher(&self) -> &DeviceDispatcher {
        &self.dispatcher
    }

    pub fn allocator(&self) -> Option<&'i vk::AllocationCallbacks<'i>> {
        self.allocator
    }

    pub fn enabled_extensions(&self) -> &[String] {
        &self.enabled_extensions
    }

    /// Give up ownership without destroying the device.
    pub fn release(mut self) -> vk::Device {
        std::mem::replace(&mut self.handle, vk::Device::null())
    }

    pub fn queue(&self, queue_family_index: u32, queue_index: u32) -> Result<Queue<'_>> {
        let f = self.dispatcher.get_device_queue()?;
        let mut handle = vk::Queue::null();
        // SAFETY: handle is a valid out pointer.
        unsafe { f(self.handle, queue_family_index, queue_index, &mut handle) };
        Ok(Queue {
            device: self,
            handle,
        })
    }

    pub fn wait_idle(&self) -> Result<()> {
        let f = self.dispatcher.device_wait_idle()?;
        // SAFETY: self.handle is live.
        check_success(unsafe { f(self.handle) })
    }

    /// Create compute pipelines. `PIPELINE_COMPILE_REQUIRED` is reported in
    /// the returned status; pipelines that were not created are null
    /// placeholders.
    pub fn create_compute_pipelines<'a>(
        &'a self,
        pipeline_cache: Option<&PipelineCache<'_>>,
        create_infos: &[vk::ComputePipelineCreateInfo<'_>],
        allocator: Option<&'a vk::AllocationCallbacks<'a>>,
    ) -> Result<ResultValue<Vec<Pipeline<'a>>>> {
        let create = self.dispatcher.create_compute_pipelines()?;
        let cache = pipeline_cache.map_or(vk::PipelineCache::null(), |cache| cache.handle());
        let mut handles = vec![vk::Pipeline::null(); create_infos.len()];
        // SAFETY: handles has room for one pipeline per create info.
        let result = unsafe {
            create(
                self.handle,
                cache,
                create_infos.len() as u32,
                create_infos.as_ptr(),
                allocation_callbacks(allocator),
                handles.as_mut_ptr(),
            )
        };
        self.wrap_pipelines(result, handles, allocator)
    }

    pub fn create_graphics_pipelines<'a>(
        &'a self,
        pipeline_cache: Option<&PipelineCache<'_>>,
        create_infos: &[vk::GraphicsPipelineCreateInfo<'_>],
        allocator: Option<&'a vk::AllocationCallbacks<'a>>,
    ) -> Result<ResultValue<Vec<Pipeline<'a>>>> {
        let create = self.dispatcher.create_graphics_pipelines()?;
        let cache = pipeline_cache.map_or(vk::PipelineCache::null(), |cache| cache.handle());
        let mut handles = vec![vk::Pipeline::null(); create_infos.len()];
        // SAFETY: handles has room for one pipeline per create info.
        let result = unsafe {
            create(
                self.handle,
                cache,
                create_infos.len() as u32,
                create_infos.as_ptr(),
                allocation_callbacks(allocator),
                handles.as_mut_ptr(),
            )
        };
        self.wrap_pipelines(result, handles, allocator)
    }

    fn wrap_pipelines<'a>(
        &'a self,
        result: vk::Result,
        handles: Vec<vk::Pipeline>,
        allocator: Option<&'a vk::AllocationCallbacks<'a>>,
    ) -> Result<ResultValue<Vec<Pipeline<'a>>>> {
        // On failure the driver may still have created some of the pipelines.
        let pipelines: Vec<Pipeline<'a>> = handles
            .into_iter()
            // SAFETY: every non-null handle was just created from this device.
            .map(|handle| unsafe { DeviceObject::from_raw(self, handle, allocator) })
            .collect();
        let result = check(result, &[vk::Result::PIPELINE_COMPILE_REQUIRED])?;
        Ok(ResultValue::new(result, pipelines))
    }
}

impl Drop for Device<'_> {
    fn drop(&mut self) {
        if self.handle.as_raw() == 0 {
            return;
        }
        match self.dispatcher.destroy_device() {
            Ok(destroy) => {
                // SAFETY: this wrapper owns the live device; children borrow it
                // and are therefore already gone.
                unsafe { destroy(self.handle, allocation_callbacks(self.allocator)) };
            }
            Err(e) => warn!("leaking device {:?}: {}", self.handle, e),
        }
    }
}

impl fmt::Debug for Device<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("handle", &self.handle)
            .field("physical_device", &self.physical_device.handle())
            .field("enabled_extensions", &self.enabled_extensions)
            .finish()
    }
}

/// Generates `Device::create_*` for entry points shaped
/// `vkCreateX(device, pCreateInfo, pAllocator, pHandle)`.
macro_rules! device_create {
    ($( $(#[$doc:meta])* $method:ident($info:ident) -> $wrapper:ident via $create:ident, $call:literal; )*) => {
        impl<'i> Device<'i> {
            $(
                $(#[$doc])*
                pub fn $method<'a>(
                    &'a self,
                    create_info: &vk::$info<'_>,
                    allocator: Option<&'a vk::AllocationCallbacks<'a>>,
                ) -> Result<$wrapper<'a>> {
                    let create = self.dispatcher.$create()?;
                    let mut handle = Handle::from_raw(0);
                    // SAFETY: arguments are valid for the call.
                    let result = unsafe {
                        create(self.handle, create_info, allocation_callbacks(allocator), &mut handle)
                    };
                    created(result, $call)?;
                    // SAFETY: handle was just created from this device.
                    Ok(unsafe { DeviceObject::from_raw(self, handle, allocator) })
                }
            )*
        }
    };
}

device_create! {
    create_buffer(BufferCreateInfo) -> Buffer via create_buffer, "vkCreateBuffer";
    create_buffer_view(BufferViewCreateInfo) -> BufferView via create_buffer_view, "vkCreateBufferView";
    create_image(ImageCreateInfo) -> Image via create_image, "vkCreateImage";
    create_image_view(ImageViewCreateInfo) -> ImageView via create_image_view, "vkCreateImageView";
    /// Memory is returned with `vkFreeMemory` on drop.
    allocate_memory(MemoryAllocateInfo) -> DeviceMemory via allocate_memory, "vkAllocateMemory";
    create_fence(FenceCreateInfo) -> Fence via create_fence, "vkCreateFence";
    create_semaphore(SemaphoreCreateInfo) -> Semaphore via create_semaphore, "vkCreateSemaphore";
    create_event(EventCreateInfo) -> Event via create_event, "vkCreateEvent";
    create_query_pool(QueryPoolCreateInfo) -> QueryPool via create_query_pool, "vkCreateQueryPool";
    create_shader_module(ShaderModuleCreateInfo) -> ShaderModule via create_shader_module, "vkCreateShaderModule";
    create_pipeline_cache(PipelineCacheCreateInfo) -> PipelineCache via create_pipeline_cache, "vkCreatePipelineCache";
    create_pipeline_layout(PipelineLayoutCreateInfo) -> PipelineLayout via create_pipeline_layout, "vkCreatePipelineLayout";
    create_sampler(SamplerCreateInfo) -> Sampler via create_sampler, "vkCreateSampler";
    create_descriptor_set_layout(DescriptorSetLayoutCreateInfo) -> DescriptorSetLayout
        via create_descriptor_set_layout, "vkCreateDescriptorSetLayout";
    /// Pools that hand out [`DescriptorSet`]s must be created with
    /// `FREE_DESCRIPTOR_SET`, since each set is freed individually.
    create_descriptor_pool(DescriptorPoolCreateInfo) -> DescriptorPool
        via create_descriptor_pool, "vkCreateDescriptorPool";
    create_framebuffer(FramebufferCreateInfo) -> Framebuffer via create_framebuffer, "vkCreateFramebuffer";
    create_render_pass(RenderPassCreateInfo) -> RenderPass via create_render_pass, "vkCreateRenderPass";
    create_command_pool(CommandPoolCreateInfo) -> CommandPool via create_command_pool, "vkCreateCommandPool";
    /// Core 1.1, or `VK_KHR_sampler_ycbcr_conversion`.
    create_sampler_ycbcr_conversion(SamplerYcbcrConversionCreateInfo) -> SamplerYcbcrConversion
        via create_sampler_ycbcr_conversion, "vkCreateSamplerYcbcrConversion";
    /// Core 1.1, or `VK_KHR_descriptor_update_template`.
    create_descriptor_update_template(DescriptorUpdateTemplateCreateInfo) -> DescriptorUpdateTemplate
        via create_descriptor_update_template, "vkCreateDescriptorUpdateTemplate";
    /// Core 1.3, or `VK_EXT_private_data`.
    create_private_data_slot(PrivateDataSlotCreateInfo) -> PrivateDataSlot
        via create_private_data_slot, "vkCreatePrivateDataSlot";
    create_swapchain(SwapchainCreateInfoKHR) -> SwapchainKHR via create_swapchain_khr, "vkCreateSwapchainKHR";
    create_acceleration_structure(AccelerationStructureCreateInfoKHR) -> AccelerationStructureKHR
        via create_acceleration_structure_khr, "vkCreateAccelerationStructureKHR";
}

impl<'d> CommandPool<'d> {
    /// Allocate `count` command buffers of `level`; each is returned to this
    /// pool with `vkFreeCommandBuffers` on drop.
    pub fn allocate_command_buffers(
        &self,
        level: vk::CommandBufferLevel,
        count: u32,
    ) -> Result<Vec<CommandBuffer<'_>>> {
        // A zero count is invalid usage for the driver.
        if count == 0 {
            return Ok(Vec::new());
        }
        let device = self.device();
        let allocate = device.dispatcher().allocate_command_buffers()?;
        let info = vk::CommandBufferAllocateInfo::default()
            .command_pool(self.handle())
            .level(level)
            .command_buffer_count(count);
        let mut handles = vec![vk::CommandBuffer::null(); count as usize];
        // SAFETY: handles has room for `count` command buffers.
        let result = unsafe { allocate(device.handle(), &info, handles.as_mut_ptr()) };
        created(result, "vkAllocateCommandBuffers")?;
        Ok(handles
            .into_iter()
            // SAFETY: each handle was just allocated from this pool.
            .map(|handle| unsafe { PoolObject::from_raw(self, handle) })
            .collect())
    }

    /// Return unused memory to the system. Core 1.1, or `VK_KHR_maintenance1`.
    pub fn trim(&self, flags: vk::CommandPoolTrimFlags) -> Result<()> {
        let trim = self.dispatcher().trim_command_pool()?;
        // SAFETY: the pool is live.
        unsafe { trim(self.device().handle(), self.handle(), flags) };
        Ok(())
    }

    pub fn reset(&self, flags: vk::CommandPoolResetFlags) -> Result<()> {
        let reset = self.dispatcher().reset_command_pool()?;
        // SAFETY: the pool is live.
        check_success(unsafe { reset(self.device().handle(), self.handle(), flags) })
    }
}

impl<'d> DescriptorPool<'d> {
    /// Allocate one descriptor set per layout; each is returned to this pool
    /// with `vkFreeDescriptorSets` on drop.
    pub fn allocate_descriptor_sets(
        &self,
        set_layouts: &[vk::DescriptorSetLayout],
    ) -> Result<Vec<DescriptorSet<'_>>> {
        if set_layouts.is_empty() {
            return Ok(Vec::new());
        }
        let device = self.device();
        let allocate = device.dispatcher().allocate_descriptor_sets()?;
        let info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(self.handle())
            .set_layouts(set_layouts);
        let mut handles = vec![vk::DescriptorSet::null(); set_layouts.len()];
        // SAFETY: handles has room for one set per layout.
        let result = unsafe { allocate(device.handle(), &info, handles.as_mut_ptr()) };
        created(result, "vkAllocateDescriptorSets")?;
        Ok(handles
            .into_iter()
            // SAFETY: each handle was just allocated from this pool.
            .map(|handle| unsafe { PoolObject::from_raw(self, handle) })
            .collect())
    }
}

impl<'d> Buffer<'d> {
    /// Device address of the buffer. Core 1.2, or either buffer device
    /// address extension.
    pub fn device_address(&self) -> Result<vk::DeviceAddress> {
        let f = self.dispatcher().get_buffer_device_address()?;
        let info = vk::BufferDeviceAddressInfo::default().buffer(self.handle());
        // SAFETY: the buffer is live.
        Ok(unsafe { f(self.device().handle(), &info) })
    }

    pub fn memory_requirements(&self) -> Result<vk::MemoryRequirements> {
        let f = self.dispatcher().get_buffer_memory_requirements()?;
        let mut requirements = vk::MemoryRequirements::default();
        // SAFETY: requirements is a valid out pointer.
        unsafe { f(self.device().handle(), self.handle(), &mut requirements) };
        Ok(requirements)
    }

    pub fn bind_memory(&self, memory: &DeviceMemory<'_>, offset: vk::DeviceSize) -> Result<()> {
        let f = self.dispatcher().bind_buffer_memory()?;
        // SAFETY: both objects are live on the same device.
        check_success(unsafe { f(self.device().handle(), self.handle(), memory.handle(), offset) })
    }
}

impl<'d> Fence<'d> {
    /// `SUCCESS` when signaled, `NOT_READY` otherwise.
    pub fn status(&self) -> Result<vk::Result> {
        let f = self.dispatcher().get_fence_status()?;
        // SAFETY: the fence is live.
        check(unsafe { f(self.device().handle(), self.handle()) }, &[vk::Result::NOT_READY])
    }

    /// Returns `TIMEOUT` as a status rather than an error.
    pub fn wait(&self, timeout: u64) -> Result<vk::Result> {
        let f = self.dispatcher().wait_for_fences()?;
        let fences = [self.handle()];
        // SAFETY: the fence is live.
        let result = unsafe { f(self.device().handle(), 1, fences.as_ptr(), vk::TRUE, timeout) };
        check(result, &[vk::Result::TIMEOUT])
    }
}

/// A queue retrieved from a device. Nothing to destroy, so freely copyable.
#[derive(Clone, Copy)]
pub struct Queue<'d> {
    device: &'d Device<'d>,
    handle: vk::Queue,
}

impl<'d> Queue<'d> {
    pub fn handle(&self) -> vk::Queue {
        self.handle
    }

    pub fn device(&self) -> &'d Device<'d> {
        self.device
    }

    pub fn submit(&self, submits: &[vk::SubmitInfo<'_>], fence: Option<&Fence<'_>>) -> Result<()> {
        let f = self.device.dispatcher().queue_submit()?;
        let fence = fence.map_or(vk::Fence::null(), |fence| fence.handle());
        // SAFETY: submits and fence are valid for the call.
        check_success(unsafe { f(self.handle, submits.len() as u32, submits.as_ptr(), fence) })
    }

    pub fn wait_idle(&self) -> Result<()> {
        let f = self.device.dispatcher().queue_wait_idle()?;
        // SAFETY: the queue is live.
        check_success(unsafe { f(self.handle) })
    }
}

impl fmt::Debug for Queue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Queue").field(&self.handle).finish()
    }
}
