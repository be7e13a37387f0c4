//! Device-level entry points.

use ash::vk;
use ash::vk::Handle;

use crate::dispatch::DispatchableHandle;
use crate::handle_store;
use crate::state::{self, DriverState};

const NO_DRIVER: vk::Result = vk::Result::ERROR_INITIALIZATION_FAILED;

/// Destroy bookkeeping shared by every `vkDestroyX`/`vkFreeX`.
fn retire(s: &mut DriverState, call: &'static str, raw: u64, object_type: vk::ObjectType) {
    if raw != 0 && !handle_store::unregister(raw, object_type) {
        s.violation(format!("{}: {:#x} is not a live {:?}", call, raw, object_type));
    }
}

pub unsafe extern "system" fn destroy_device(
    device: vk::Device,
    p_allocator: *const vk::AllocationCallbacks<'_>,
) {
    state::with(|s| {
        s.record("vkDestroyDevice", &[device.as_raw()], p_allocator);
        let Some(id) = (unsafe { DispatchableHandle::get_id(device) }) else {
            return;
        };
        if !handle_store::unregister(id, vk::ObjectType::DEVICE) {
            s.violation(format!("vkDestroyDevice: {:#x} is not a live device", device.as_raw()));
            return;
        }
        s.devices.remove(&id);
        let queues: Vec<_> = s
            .queues
            .iter()
            .filter(|((owner, _, _), _)| *owner == id)
            .map(|(key, queue)| (*key, *queue))
            .collect();
        for (key, queue) in queues {
            s.queues.remove(&key);
            unsafe {
                if let Some(queue_id) = DispatchableHandle::get_id(queue) {
                    handle_store::unregister(queue_id, vk::ObjectType::QUEUE);
                }
                DispatchableHandle::destroy(queue);
            }
        }
        unsafe { DispatchableHandle::destroy(device) };
    });
}

pub unsafe extern "system" fn get_device_queue(
    device: vk::Device,
    queue_family_index: u32,
    queue_index: u32,
    p_queue: *mut vk::Queue,
) {
    state::with(|s| {
        let Some(device_id) = (unsafe { DispatchableHandle::get_id(device) }) else {
            return;
        };
        let queue = *s
            .queues
            .entry((device_id, queue_family_index, queue_index))
            .or_insert_with(|| DispatchableHandle::new(handle_store::register(vk::ObjectType::QUEUE)));
        s.record("vkGetDeviceQueue", &[device.as_raw(), queue.as_raw()], std::ptr::null());
        unsafe { *p_queue = queue };
    });
}

pub unsafe extern "system" fn device_wait_idle(device: vk::Device) -> vk::Result {
    state::with(|s| {
        s.record("vkDeviceWaitIdle", &[device.as_raw()], std::ptr::null());
        s.failure("vkDeviceWaitIdle").unwrap_or(vk::Result::SUCCESS)
    })
    .unwrap_or(NO_DRIVER)
}

/// `vkCreateX(device, pInfo, pAllocator, pHandle)` and its destroy partner.
macro_rules! device_object {
    ($($create:ident, $create_name:literal, $destroy:ident, $destroy_name:literal, $info:ident, $handle:ident, $ty:ident;)*) => {
        $(
            pub unsafe extern "system" fn $create(
                device: vk::Device,
                _p_create_info: *const vk::$info<'_>,
                p_allocator: *const vk::AllocationCallbacks<'_>,
                p_handle: *mut vk::$handle,
            ) -> vk::Result {
                state::with(|s| {
                    if let Some(result) = s.failure($create_name) {
                        s.record($create_name, &[device.as_raw()], p_allocator);
                        return result;
                    }
                    let handle = vk::$handle::from_raw(handle_store::register(vk::ObjectType::$ty));
                    s.record($create_name, &[device.as_raw(), handle.as_raw()], p_allocator);
                    unsafe { *p_handle = handle };
                    vk::Result::SUCCESS
                })
                .unwrap_or(NO_DRIVER)
            }

            pub unsafe extern "system" fn $destroy(
                device: vk::Device,
                handle: vk::$handle,
                p_allocator: *const vk::AllocationCallbacks<'_>,
            ) {
                state::with(|s| {
                    s.record($destroy_name, &[device.as_raw(), handle.as_raw()], p_allocator);
                    retire(s, $destroy_name, handle.as_raw(), vk::ObjectType::$ty);
                });
            }
        )*
    };
}

device_object! {
    create_buffer, "vkCreateBuffer", destroy_buffer, "vkDestroyBuffer", BufferCreateInfo, Buffer, BUFFER;
    create_image, "vkCreateImage", destroy_image, "vkDestroyImage", ImageCreateInfo, Image, IMAGE;
    allocate_memory, "vkAllocateMemory", free_memory, "vkFreeMemory", MemoryAllocateInfo, DeviceMemory, DEVICE_MEMORY;
    create_fence, "vkCreateFence", destroy_fence, "vkDestroyFence", FenceCreateInfo, Fence, FENCE;
    create_semaphore, "vkCreateSemaphore", destroy_semaphore, "vkDestroySemaphore",
        SemaphoreCreateInfo, Semaphore, SEMAPHORE;
    create_event, "vkCreateEvent", destroy_event, "vkDestroyEvent", EventCreateInfo, Event, EVENT;
    create_sampler, "vkCreateSampler", destroy_sampler, "vkDestroySampler", SamplerCreateInfo, Sampler, SAMPLER;
    create_shader_module, "vkCreateShaderModule", destroy_shader_module, "vkDestroyShaderModule",
        ShaderModuleCreateInfo, ShaderModule, SHADER_MODULE;
    create_pipeline_cache, "vkCreatePipelineCache", destroy_pipeline_cache, "vkDestroyPipelineCache",
        PipelineCacheCreateInfo, PipelineCache, PIPELINE_CACHE;
    create_pipeline_layout, "vkCreatePipelineLayout", destroy_pipeline_layout, "vkDestroyPipelineLayout",
        PipelineLayoutCreateInfo, PipelineLayout, PIPELINE_LAYOUT;
    create_descriptor_set_layout, "vkCreateDescriptorSetLayout",
        destroy_descriptor_set_layout, "vkDestroyDescriptorSetLayout",
        DescriptorSetLayoutCreateInfo, DescriptorSetLayout, DESCRIPTOR_SET_LAYOUT;
    create_descriptor_pool, "vkCreateDescriptorPool", destroy_descriptor_pool, "vkDestroyDescriptorPool",
        DescriptorPoolCreateInfo, DescriptorPool, DESCRIPTOR_POOL;
    create_command_pool, "vkCreateCommandPool", destroy_command_pool, "vkDestroyCommandPool",
        CommandPoolCreateInfo, CommandPool, COMMAND_POOL;
    create_sampler_ycbcr_conversion_khr, "vkCreateSamplerYcbcrConversionKHR",
        destroy_sampler_ycbcr_conversion_khr, "vkDestroySamplerYcbcrConversionKHR",
        SamplerYcbcrConversionCreateInfo, SamplerYcbcrConversion, SAMPLER_YCBCR_CONVERSION;
}

pub unsafe extern "system" fn destroy_pipeline(
    device: vk::Device,
    pipeline: vk::Pipeline,
    p_allocator: *const vk::AllocationCallbacks<'_>,
) {
    state::with(|s| {
        s.record("vkDestroyPipeline", &[device.as_raw(), pipeline.as_raw()], p_allocator);
        retire(s, "vkDestroyPipeline", pipeline.as_raw(), vk::ObjectType::PIPELINE);
    });
}

/// Create infos that set `FAIL_ON_PIPELINE_COMPILE_REQUIRED` are treated as
/// cache misses: their pipeline stays null and the call reports
/// `PIPELINE_COMPILE_REQUIRED`.
pub unsafe extern "system" fn create_compute_pipelines(
    device: vk::Device,
    _pipeline_cache: vk::PipelineCache,
    create_info_count: u32,
    p_create_infos: *const vk::ComputePipelineCreateInfo<'_>,
    p_allocator: *const vk::AllocationCallbacks<'_>,
    p_pipelines: *mut vk::Pipeline,
) -> vk::Result {
    state::with(|s| {
        if let Some(result) = s.failure("vkCreateComputePipelines") {
            s.record("vkCreateComputePipelines", &[device.as_raw()], p_allocator);
            return result;
        }
        let infos = unsafe { std::slice::from_raw_parts(p_create_infos, create_info_count as usize) };
        let mut result = vk::Result::SUCCESS;
        let mut args = vec![device.as_raw()];
        for (i, info) in infos.iter().enumerate() {
            let pipeline = if info
                .flags
                .contains(vk::PipelineCreateFlags::FAIL_ON_PIPELINE_COMPILE_REQUIRED)
            {
                result = vk::Result::PIPELINE_COMPILE_REQUIRED;
                vk::Pipeline::null()
            } else {
                vk::Pipeline::from_raw(handle_store::register(vk::ObjectType::PIPELINE))
            };
            args.push(pipeline.as_raw());
            unsafe { *p_pipelines.add(i) = pipeline };
        }
        s.record("vkCreateComputePipelines", &args, p_allocator);
        result
    })
    .unwrap_or(NO_DRIVER)
}

// ── Pool children ───────────────────────────────────────────

pub unsafe extern "system" fn allocate_command_buffers(
    device: vk::Device,
    p_allocate_info: *const vk::CommandBufferAllocateInfo<'_>,
    p_command_buffers: *mut vk::CommandBuffer,
) -> vk::Result {
    state::with(|s| {
        let info = unsafe { &*p_allocate_info };
        if let Some(result) = s.failure("vkAllocateCommandBuffers") {
            s.record("vkAllocateCommandBuffers", &[device.as_raw(), info.command_pool.as_raw()], std::ptr::null());
            return result;
        }
        let mut args = vec![device.as_raw(), info.command_pool.as_raw()];
        for i in 0..info.command_buffer_count as usize {
            let command_buffer: vk::CommandBuffer =
                DispatchableHandle::new(handle_store::register(vk::ObjectType::COMMAND_BUFFER));
            args.push(command_buffer.as_raw());
            unsafe { *p_command_buffers.add(i) = command_buffer };
        }
        s.record("vkAllocateCommandBuffers", &args, std::ptr::null());
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}

pub unsafe extern "system" fn free_command_buffers(
    device: vk::Device,
    command_pool: vk::CommandPool,
    command_buffer_count: u32,
    p_command_buffers: *const vk::CommandBuffer,
) {
    state::with(|s| {
        let command_buffers =
            unsafe { std::slice::from_raw_parts(p_command_buffers, command_buffer_count as usize) };
        let mut args = vec![device.as_raw(), command_pool.as_raw(), u64::from(command_buffer_count)];
        args.extend(command_buffers.iter().map(|cb| cb.as_raw()));
        s.record("vkFreeCommandBuffers", &args, std::ptr::null());
        for &command_buffer in command_buffers {
            let Some(id) = (unsafe { DispatchableHandle::get_id(command_buffer) }) else {
                continue;
            };
            if handle_store::unregister(id, vk::ObjectType::COMMAND_BUFFER) {
                unsafe { DispatchableHandle::destroy(command_buffer) };
            } else {
                s.violation(format!(
                    "vkFreeCommandBuffers: {:#x} is not a live command buffer",
                    command_buffer.as_raw()
                ));
            }
        }
    });
}

pub unsafe extern "system" fn allocate_descriptor_sets(
    device: vk::Device,
    p_allocate_info: *const vk::DescriptorSetAllocateInfo<'_>,
    p_descriptor_sets: *mut vk::DescriptorSet,
) -> vk::Result {
    state::with(|s| {
        let info = unsafe { &*p_allocate_info };
        let mut args = vec![device.as_raw(), info.descriptor_pool.as_raw()];
        for i in 0..info.descriptor_set_count as usize {
            let set = vk::DescriptorSet::from_raw(handle_store::register(vk::ObjectType::DESCRIPTOR_SET));
            args.push(set.as_raw());
            unsafe { *p_descriptor_sets.add(i) = set };
        }
        s.record("vkAllocateDescriptorSets", &args, std::ptr::null());
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}

pub unsafe extern "system" fn free_descriptor_sets(
    device: vk::Device,
    descriptor_pool: vk::DescriptorPool,
    descriptor_set_count: u32,
    p_descriptor_sets: *const vk::DescriptorSet,
) -> vk::Result {
    state::with(|s| {
        let sets = unsafe { std::slice::from_raw_parts(p_descriptor_sets, descriptor_set_count as usize) };
        let mut args = vec![device.as_raw(), descriptor_pool.as_raw(), u64::from(descriptor_set_count)];
        args.extend(sets.iter().map(|set| set.as_raw()));
        s.record("vkFreeDescriptorSets", &args, std::ptr::null());
        for set in sets {
            retire(s, "vkFreeDescriptorSets", set.as_raw(), vk::ObjectType::DESCRIPTOR_SET);
        }
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}

// ── Promoted entry points with distinct extension variants ──

pub unsafe extern "system" fn trim_command_pool(
    device: vk::Device,
    command_pool: vk::CommandPool,
    _flags: vk::CommandPoolTrimFlags,
) {
    state::with(|s| s.record("vkTrimCommandPool", &[device.as_raw(), command_pool.as_raw()], std::ptr::null()));
}

pub unsafe extern "system" fn trim_command_pool_khr(
    device: vk::Device,
    command_pool: vk::CommandPool,
    _flags: vk::CommandPoolTrimFlags,
) {
    state::with(|s| s.record("vkTrimCommandPoolKHR", &[device.as_raw(), command_pool.as_raw()], std::ptr::null()));
}

/// Fake device address for a buffer id.
pub fn buffer_address(buffer: vk::Buffer) -> vk::DeviceAddress {
    0x1_0000_0000 + buffer.as_raw()
}

macro_rules! buffer_device_address {
    ($($func:ident, $name:literal;)*) => {
        $(
            pub unsafe extern "system" fn $func(
                device: vk::Device,
                p_info: *const vk::BufferDeviceAddressInfo<'_>,
            ) -> vk::DeviceAddress {
                let buffer = unsafe { (*p_info).buffer };
                state::with(|s| s.record($name, &[device.as_raw(), buffer.as_raw()], std::ptr::null()));
                buffer_address(buffer)
            }
        )*
    };
}

buffer_device_address! {
    get_buffer_device_address, "vkGetBufferDeviceAddress";
    get_buffer_device_address_khr, "vkGetBufferDeviceAddressKHR";
    get_buffer_device_address_ext, "vkGetBufferDeviceAddressEXT";
}
