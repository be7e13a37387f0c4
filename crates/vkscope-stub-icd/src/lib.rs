//! In-process fake Vulkan driver.
//!
//! Answers `vkGetInstanceProcAddr` / `vkGetDeviceProcAddr` by name the way an
//! ICD does, but only for what the installed [`StubProfile`] claims to
//! support, and records every call it receives so tests can check exactly
//! which destroy entry points ran, in which order and with which arguments.
//!
//! State is per thread: install a driver with [`StubDriver::install`] and
//! hand [`get_instance_proc_addr`] to the code under test.

use std::ffi::{c_char, CStr};
use std::marker::PhantomData;

use ash::vk;

pub mod device;
pub mod dispatch;
pub mod handle_store;
pub mod instance;
mod state;
mod util;

pub use instance::DEVICE_NAME;
pub use state::{Call, StubProfile};

use dispatch::DispatchableHandle;

/// Guard for the driver installed on the current thread.
pub struct StubDriver {
    _not_send: PhantomData<*const ()>,
}

impl StubDriver {
    /// Install a fresh driver on this thread, replacing any previous one.
    pub fn install(profile: StubProfile) -> Self {
        state::install(profile);
        Self {
            _not_send: PhantomData,
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        state::with(|s| s.calls.clone()).unwrap_or_default()
    }

    pub fn calls_named(&self, name: &str) -> Vec<Call> {
        state::with(|s| s.calls.iter().filter(|c| c.name == name).cloned().collect())
            .unwrap_or_default()
    }

    pub fn count(&self, name: &str) -> usize {
        state::with(|s| s.calls.iter().filter(|c| c.name == name).count()).unwrap_or(0)
    }

    /// Names of the calls received so far, in order.
    pub fn call_names(&self) -> Vec<&'static str> {
        state::with(|s| s.calls.iter().map(|c| c.name).collect()).unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        state::with(|s| s.calls.clear());
    }

    /// Destroys of handles that were not live (double destroys, wrong types).
    pub fn violations(&self) -> Vec<String> {
        state::with(|s| s.violations.clone()).unwrap_or_default()
    }

    /// Profile of the installed driver.
    pub fn profile(&self) -> StubProfile {
        state::with(|s| s.profile.clone()).unwrap_or_default()
    }
}

impl Drop for StubDriver {
    fn drop(&mut self) {
        state::uninstall();
    }
}

/// The stub's `vkGetInstanceProcAddr`.
pub fn get_instance_proc_addr() -> vk::PFN_vkGetInstanceProcAddr {
    vk_get_instance_proc_addr
}

// ── Name resolution ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StubScope {
    Global,
    Instance,
    Device,
}

/// When a name is handed out.
#[derive(Debug, Clone, Copy)]
enum Availability {
    /// Core since 1.minor.
    Core(u32),
    /// Only on instances that enabled the extension.
    InstanceExt(&'static str),
    /// Only on devices that enabled the extension (instance-level lookups
    /// only need the driver to support it).
    DeviceExt(&'static str),
}

macro_rules! entry_points {
    ($($name:literal => $scope:ident, $availability:expr, $func:path;)*) => {
        fn lookup(name: &str) -> Option<(StubScope, Availability, unsafe extern "system" fn())> {
            use Availability::*;
            match name {
                $(
                    $name => Some((
                        StubScope::$scope,
                        $availability,
                        // SAFETY: only ever called back through the matching PFN type.
                        unsafe { std::mem::transmute::<*const (), unsafe extern "system" fn()>($func as *const ()) },
                    )),
                )*
                _ => None,
            }
        }
    };
}

entry_points! {
    // ── Global ──────────────────────────────────────────────
    "vkCreateInstance" => Global, Core(0), instance::create_instance;
    "vkEnumerateInstanceVersion" => Global, Core(1), instance::enumerate_instance_version;
    "vkEnumerateInstanceExtensionProperties" => Global, Core(0), instance::enumerate_instance_extension_properties;
    "vkEnumerateInstanceLayerProperties" => Global, Core(0), instance::enumerate_instance_layer_properties;

    // ── Instance ────────────────────────────────────────────
    "vkDestroyInstance" => Instance, Core(0), instance::destroy_instance;
    "vkEnumeratePhysicalDevices" => Instance, Core(0), instance::enumerate_physical_devices;
    "vkGetPhysicalDeviceProperties" => Instance, Core(0), instance::get_physical_device_properties;
    "vkGetPhysicalDeviceProperties2" => Instance, Core(1), instance::get_physical_device_properties2;
    "vkGetPhysicalDeviceProperties2KHR" => Instance, InstanceExt("VK_KHR_get_physical_device_properties2"),
        instance::get_physical_device_properties2_khr;
    "vkGetPhysicalDeviceQueueFamilyProperties" => Instance, Core(0),
        instance::get_physical_device_queue_family_properties;
    "vkEnumerateDeviceExtensionProperties" => Instance, Core(0), instance::enumerate_device_extension_properties;
    "vkCreateDevice" => Instance, Core(0), instance::create_device;
    "vkGetDeviceProcAddr" => Instance, Core(0), vk_get_device_proc_addr;
    "vkCreateHeadlessSurfaceEXT" => Instance, InstanceExt("VK_EXT_headless_surface"),
        instance::create_headless_surface_ext;
    "vkDestroySurfaceKHR" => Instance, InstanceExt("VK_KHR_surface"), instance::destroy_surface_khr;
    "vkCreateDebugUtilsMessengerEXT" => Instance, InstanceExt("VK_EXT_debug_utils"),
        instance::create_debug_utils_messenger_ext;
    "vkDestroyDebugUtilsMessengerEXT" => Instance, InstanceExt("VK_EXT_debug_utils"),
        instance::destroy_debug_utils_messenger_ext;
    "vkReleaseDisplayEXT" => Instance, InstanceExt("VK_EXT_direct_mode_display"), instance::release_display_ext;

    // ── Device ──────────────────────────────────────────────
    "vkDestroyDevice" => Device, Core(0), device::destroy_device;
    "vkGetDeviceQueue" => Device, Core(0), device::get_device_queue;
    "vkDeviceWaitIdle" => Device, Core(0), device::device_wait_idle;
    "vkCreateBuffer" => Device, Core(0), device::create_buffer;
    "vkDestroyBuffer" => Device, Core(0), device::destroy_buffer;
    "vkCreateImage" => Device, Core(0), device::create_image;
    "vkDestroyImage" => Device, Core(0), device::destroy_image;
    "vkAllocateMemory" => Device, Core(0), device::allocate_memory;
    "vkFreeMemory" => Device, Core(0), device::free_memory;
    "vkCreateFence" => Device, Core(0), device::create_fence;
    "vkDestroyFence" => Device, Core(0), device::destroy_fence;
    "vkCreateSemaphore" => Device, Core(0), device::create_semaphore;
    "vkDestroySemaphore" => Device, Core(0), device::destroy_semaphore;
    "vkCreateEvent" => Device, Core(0), device::create_event;
    "vkDestroyEvent" => Device, Core(0), device::destroy_event;
    "vkCreateSampler" => Device, Core(0), device::create_sampler;
    "vkDestroySampler" => Device, Core(0), device::destroy_sampler;
    "vkCreateShaderModule" => Device, Core(0), device::create_shader_module;
    "vkDestroyShaderModule" => Device, Core(0), device::destroy_shader_module;
    "vkCreatePipelineCache" => Device, Core(0), device::create_pipeline_cache;
    "vkDestroyPipelineCache" => Device, Core(0), device::destroy_pipeline_cache;
    "vkCreatePipelineLayout" => Device, Core(0), device::create_pipeline_layout;
    "vkDestroyPipelineLayout" => Device, Core(0), device::destroy_pipeline_layout;
    "vkCreateDescriptorSetLayout" => Device, Core(0), device::create_descriptor_set_layout;
    "vkDestroyDescriptorSetLayout" => Device, Core(0), device::destroy_descriptor_set_layout;
    "vkCreateDescriptorPool" => Device, Core(0), device::create_descriptor_pool;
    "vkDestroyDescriptorPool" => Device, Core(0), device::destroy_descriptor_pool;
    "vkAllocateDescriptorSets" => Device, Core(0), device::allocate_descriptor_sets;
    "vkFreeDescriptorSets" => Device, Core(0), device::free_descriptor_sets;
    "vkCreateCommandPool" => Device, Core(0), device::create_command_pool;
    "vkDestroyCommandPool" => Device, Core(0), device::destroy_command_pool;
    "vkAllocateCommandBuffers" => Device, Core(0), device::allocate_command_buffers;
    "vkFreeCommandBuffers" => Device, Core(0), device::free_command_buffers;
    "vkCreateComputePipelines" => Device, Core(0), device::create_compute_pipelines;
    "vkDestroyPipeline" => Device, Core(0), device::destroy_pipeline;
    "vkTrimCommandPool" => Device, Core(1), device::trim_command_pool;
    "vkTrimCommandPoolKHR" => Device, DeviceExt("VK_KHR_maintenance1"), device::trim_command_pool_khr;
    "vkCreateSamplerYcbcrConversionKHR" => Device, DeviceExt("VK_KHR_sampler_ycbcr_conversion"),
        device::create_sampler_ycbcr_conversion_khr;
    "vkDestroySamplerYcbcrConversionKHR" => Device, DeviceExt("VK_KHR_sampler_ycbcr_conversion"),
        device::destroy_sampler_ycbcr_conversion_khr;
    "vkGetBufferDeviceAddress" => Device, Core(2), device::get_buffer_device_address;
    "vkGetBufferDeviceAddressKHR" => Device, DeviceExt("VK_KHR_buffer_device_address"),
        device::get_buffer_device_address_khr;
    "vkGetBufferDeviceAddressEXT" => Device, DeviceExt("VK_EXT_buffer_device_address"),
        device::get_buffer_device_address_ext;
}

unsafe fn read_name<'a>(p_name: *const c_char) -> Option<&'a str> {
    if p_name.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(p_name) }.to_str().ok()
}

unsafe extern "system" fn vk_get_instance_proc_addr(
    instance: vk::Instance,
    p_name: *const c_char,
) -> vk::PFN_vkVoidFunction {
    let name = unsafe { read_name(p_name) }?;
    if name == "vkGetInstanceProcAddr" {
        return Some(unsafe {
            std::mem::transmute::<*const (), unsafe extern "system" fn()>(vk_get_instance_proc_addr as *const ())
        });
    }
    let (scope, availability, pfn) = lookup(name)?;
    state::with(|s| {
        if s.profile.hidden.iter().any(|hidden| *hidden == name) {
            return None;
        }
        let minor = vk::api_version_minor(s.profile.api_version);
        let visible = match unsafe { DispatchableHandle::get_id(instance) } {
            None => scope == StubScope::Global && matches!(availability, Availability::Core(v) if v <= minor),
            Some(id) => {
                let enabled = s.instances.get(&id)?;
                scope != StubScope::Global
                    && match availability {
                        Availability::Core(v) => v <= minor,
                        Availability::InstanceExt(ext) => enabled.iter().any(|e| e == ext),
                        Availability::DeviceExt(ext) => s.profile.device_extensions.contains(&ext),
                    }
            }
        };
        visible.then_some(pfn)
    })
    .flatten()
}

unsafe extern "system" fn vk_get_device_proc_addr(
    device: vk::Device,
    p_name: *const c_char,
) -> vk::PFN_vkVoidFunction {
    let name = unsafe { read_name(p_name) }?;
    let (scope, availability, pfn) = lookup(name)?;
    if scope != StubScope::Device {
        return None;
    }
    state::with(|s| {
        if s.profile.hidden.iter().any(|hidden| *hidden == name) {
            return None;
        }
        let id = unsafe { DispatchableHandle::get_id(device) }?;
        let enabled = s.devices.get(&id)?;
        let visible = match availability {
            Availability::Core(v) => v <= vk::api_version_minor(s.profile.api_version),
            Availability::InstanceExt(_) => false,
            Availability::DeviceExt(ext) => enabled.iter().any(|e| e == ext),
        };
        visible.then_some(pfn)
    })
    .flatten()
}
