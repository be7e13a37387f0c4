//! Global, instance and physical-device entry points.

use std::ffi::c_char;

use ash::vk;
use ash::vk::Handle;

use crate::dispatch::DispatchableHandle;
use crate::handle_store;
use crate::state;
use crate::util::{extension_properties, fill_array, read_names, write_name};

const NO_DRIVER: vk::Result = vk::Result::ERROR_INITIALIZATION_FAILED;

pub const DEVICE_NAME: &str = "vkscope stub device";

// ── Global ──────────────────────────────────────────────────

pub unsafe extern "system" fn create_instance(
    p_create_info: *const vk::InstanceCreateInfo<'_>,
    p_allocator: *const vk::AllocationCallbacks<'_>,
    p_instance: *mut vk::Instance,
) -> vk::Result {
    state::with(|s| {
        if let Some(result) = s.failure("vkCreateInstance") {
            s.record("vkCreateInstance", &[], p_allocator);
            return result;
        }
        if p_create_info.is_null() || p_instance.is_null() {
            return vk::Result::ERROR_INITIALIZATION_FAILED;
        }
        let info = unsafe { &*p_create_info };
        let extensions = unsafe { read_names(info.pp_enabled_extension_names, info.enabled_extension_count) };
        if let Some(missing) = extensions
            .iter()
            .find(|ext| !s.profile.instance_extensions.iter().any(|known| known == ext))
        {
            tracing::debug!("vkCreateInstance: unsupported extension {}", missing);
            s.record("vkCreateInstance", &[], p_allocator);
            return vk::Result::ERROR_EXTENSION_NOT_PRESENT;
        }

        let id = handle_store::register(vk::ObjectType::INSTANCE);
        let instance: vk::Instance = DispatchableHandle::new(id);
        let physical_devices = (0..s.profile.physical_device_count)
            .map(|_| DispatchableHandle::new(handle_store::register(vk::ObjectType::PHYSICAL_DEVICE)))
            .collect();
        s.instances.insert(id, extensions);
        s.physical_devices.insert(id, physical_devices);
        s.record("vkCreateInstance", &[instance.as_raw()], p_allocator);
        unsafe { *p_instance = instance };
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}

pub unsafe extern "system" fn enumerate_instance_version(p_api_version: *mut u32) -> vk::Result {
    state::with(|s| {
        s.record("vkEnumerateInstanceVersion", &[], std::ptr::null());
        unsafe { *p_api_version = s.profile.api_version };
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}

pub unsafe extern "system" fn enumerate_instance_extension_properties(
    p_layer_name: *const c_char,
    p_property_count: *mut u32,
    p_properties: *mut vk::ExtensionProperties,
) -> vk::Result {
    state::with(|s| {
        s.record("vkEnumerateInstanceExtensionProperties", &[], std::ptr::null());
        if !p_layer_name.is_null() {
            return vk::Result::ERROR_LAYER_NOT_PRESENT;
        }
        let items = extension_properties(&s.profile.instance_extensions);
        if !p_properties.is_null() && s.incomplete_left > 0 {
            // Pretend another extension appeared after the count query.
            s.incomplete_left -= 1;
            return match unsafe { fill_array(&items, p_property_count, p_properties) } {
                vk::Result::SUCCESS | vk::Result::INCOMPLETE => vk::Result::INCOMPLETE,
                error => error,
            };
        }
        unsafe { fill_array(&items, p_property_count, p_properties) }
    })
    .unwrap_or(NO_DRIVER)
}

pub unsafe extern "system" fn enumerate_instance_layer_properties(
    p_property_count: *mut u32,
    p_properties: *mut vk::LayerProperties,
) -> vk::Result {
    state::with(|s| {
        s.record("vkEnumerateInstanceLayerProperties", &[], std::ptr::null());
        unsafe { fill_array::<vk::LayerProperties>(&[], p_property_count, p_properties) }
    })
    .unwrap_or(NO_DRIVER)
}

// ── Instance ────────────────────────────────────────────────

pub unsafe extern "system" fn destroy_instance(
    instance: vk::Instance,
    p_allocator: *const vk::AllocationCallbacks<'_>,
) {
    state::with(|s| {
        s.record("vkDestroyInstance", &[instance.as_raw()], p_allocator);
        let Some(id) = (unsafe { DispatchableHandle::get_id(instance) }) else {
            return;
        };
        if !handle_store::unregister(id, vk::ObjectType::INSTANCE) {
            s.violation(format!("vkDestroyInstance: {:#x} is not a live instance", instance.as_raw()));
            return;
        }
        s.instances.remove(&id);
        for physical_device in s.physical_devices.remove(&id).unwrap_or_default() {
            unsafe {
                if let Some(pd_id) = DispatchableHandle::get_id(physical_device) {
                    handle_store::unregister(pd_id, vk::ObjectType::PHYSICAL_DEVICE);
                }
                DispatchableHandle::destroy(physical_device);
            }
        }
        unsafe { DispatchableHandle::destroy(instance) };
    });
}

pub unsafe extern "system" fn enumerate_physical_devices(
    instance: vk::Instance,
    p_physical_device_count: *mut u32,
    p_physical_devices: *mut vk::PhysicalDevice,
) -> vk::Result {
    state::with(|s| {
        s.record("vkEnumeratePhysicalDevices", &[instance.as_raw()], std::ptr::null());
        let Some(id) = (unsafe { DispatchableHandle::get_id(instance) }) else {
            return vk::Result::ERROR_INITIALIZATION_FAILED;
        };
        let devices = s.physical_devices.get(&id).cloned().unwrap_or_default();
        unsafe { fill_array(&devices, p_physical_device_count, p_physical_devices) }
    })
    .unwrap_or(NO_DRIVER)
}

fn fill_properties(api_version: u32, properties: &mut vk::PhysicalDeviceProperties) {
    properties.api_version = api_version;
    properties.driver_version = 1;
    properties.vendor_id = 0x10005;
    properties.device_id = 0x5c0e;
    properties.device_type = vk::PhysicalDeviceType::CPU;
    write_name(&mut properties.device_name, DEVICE_NAME);
}

pub unsafe extern "system" fn get_physical_device_properties(
    physical_device: vk::PhysicalDevice,
    p_properties: *mut vk::PhysicalDeviceProperties,
) {
    state::with(|s| {
        s.record("vkGetPhysicalDeviceProperties", &[physical_device.as_raw()], std::ptr::null());
        fill_properties(s.profile.api_version, unsafe { &mut *p_properties });
    });
}

pub unsafe extern "system" fn get_physical_device_properties2(
    physical_device: vk::PhysicalDevice,
    p_properties: *mut vk::PhysicalDeviceProperties2<'_>,
) {
    state::with(|s| {
        s.record("vkGetPhysicalDeviceProperties2", &[physical_device.as_raw()], std::ptr::null());
        fill_properties(s.profile.api_version, unsafe { &mut (*p_properties).properties });
    });
}

pub unsafe extern "system" fn get_physical_device_properties2_khr(
    physical_device: vk::PhysicalDevice,
    p_properties: *mut vk::PhysicalDeviceProperties2<'_>,
) {
    state::with(|s| {
        s.record("vkGetPhysicalDeviceProperties2KHR", &[physical_device.as_raw()], std::ptr::null());
        fill_properties(s.profile.api_version, unsafe { &mut (*p_properties).properties });
    });
}

pub unsafe extern "system" fn get_physical_device_queue_family_properties(
    physical_device: vk::PhysicalDevice,
    p_queue_family_property_count: *mut u32,
    p_queue_family_properties: *mut vk::QueueFamilyProperties,
) {
    state::with(|s| {
        s.record(
            "vkGetPhysicalDeviceQueueFamilyProperties",
            &[physical_device.as_raw()],
            std::ptr::null(),
        );
    });
    let family = vk::QueueFamilyProperties {
        queue_flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER,
        queue_count: 2,
        timestamp_valid_bits: 64,
        ..Default::default()
    };
    // Void entry point: a short array is reported only through the count.
    let _status =
        unsafe { fill_array(&[family], p_queue_family_property_count, p_queue_family_properties) };
}

pub unsafe extern "system" fn enumerate_device_extension_properties(
    physical_device: vk::PhysicalDevice,
    p_layer_name: *const c_char,
    p_property_count: *mut u32,
    p_properties: *mut vk::ExtensionProperties,
) -> vk::Result {
    state::with(|s| {
        s.record(
            "vkEnumerateDeviceExtensionProperties",
            &[physical_device.as_raw()],
            std::ptr::null(),
        );
        if !p_layer_name.is_null() {
            return vk::Result::ERROR_LAYER_NOT_PRESENT;
        }
        let items = extension_properties(&s.profile.device_extensions);
        unsafe { fill_array(&items, p_property_count, p_properties) }
    })
    .unwrap_or(NO_DRIVER)
}

pub unsafe extern "system" fn create_device(
    physical_device: vk::PhysicalDevice,
    p_create_info: *const vk::DeviceCreateInfo<'_>,
    p_allocator: *const vk::AllocationCallbacks<'_>,
    p_device: *mut vk::Device,
) -> vk::Result {
    state::with(|s| {
        if let Some(result) = s.failure("vkCreateDevice") {
            s.record("vkCreateDevice", &[physical_device.as_raw()], p_allocator);
            return result;
        }
        let info = unsafe { &*p_create_info };
        let extensions = unsafe { read_names(info.pp_enabled_extension_names, info.enabled_extension_count) };
        if extensions
            .iter()
            .any(|ext| !s.profile.device_extensions.iter().any(|known| known == ext))
        {
            s.record("vkCreateDevice", &[physical_device.as_raw()], p_allocator);
            return vk::Result::ERROR_EXTENSION_NOT_PRESENT;
        }
        let id = handle_store::register(vk::ObjectType::DEVICE);
        let device: vk::Device = DispatchableHandle::new(id);
        s.devices.insert(id, extensions);
        s.record("vkCreateDevice", &[physical_device.as_raw(), device.as_raw()], p_allocator);
        unsafe { *p_device = device };
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}

// ── Surfaces, messengers, displays ──────────────────────────

pub unsafe extern "system" fn create_headless_surface_ext(
    instance: vk::Instance,
    _p_create_info: *const vk::HeadlessSurfaceCreateInfoEXT<'_>,
    p_allocator: *const vk::AllocationCallbacks<'_>,
    p_surface: *mut vk::SurfaceKHR,
) -> vk::Result {
    state::with(|s| {
        if let Some(result) = s.failure("vkCreateHeadlessSurfaceEXT") {
            s.record("vkCreateHeadlessSurfaceEXT", &[instance.as_raw()], p_allocator);
            return result;
        }
        let surface = vk::SurfaceKHR::from_raw(handle_store::register(vk::ObjectType::SURFACE_KHR));
        s.record(
            "vkCreateHeadlessSurfaceEXT",
            &[instance.as_raw(), surface.as_raw()],
            p_allocator,
        );
        unsafe { *p_surface = surface };
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}

pub unsafe extern "system" fn destroy_surface_khr(
    instance: vk::Instance,
    surface: vk::SurfaceKHR,
    p_allocator: *const vk::AllocationCallbacks<'_>,
) {
    state::with(|s| {
        s.record("vkDestroySurfaceKHR", &[instance.as_raw(), surface.as_raw()], p_allocator);
        if surface.as_raw() != 0 && !handle_store::unregister(surface.as_raw(), vk::ObjectType::SURFACE_KHR) {
            s.violation(format!("vkDestroySurfaceKHR: {:#x} is not a live surface", surface.as_raw()));
        }
    });
}

pub unsafe extern "system" fn create_debug_utils_messenger_ext(
    instance: vk::Instance,
    _p_create_info: *const vk::DebugUtilsMessengerCreateInfoEXT<'_>,
    p_allocator: *const vk::AllocationCallbacks<'_>,
    p_messenger: *mut vk::DebugUtilsMessengerEXT,
) -> vk::Result {
    state::with(|s| {
        let messenger = vk::DebugUtilsMessengerEXT::from_raw(handle_store::register(
            vk::ObjectType::DEBUG_UTILS_MESSENGER_EXT,
        ));
        s.record(
            "vkCreateDebugUtilsMessengerEXT",
            &[instance.as_raw(), messenger.as_raw()],
            p_allocator,
        );
        unsafe { *p_messenger = messenger };
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}

pub unsafe extern "system" fn destroy_debug_utils_messenger_ext(
    instance: vk::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
    p_allocator: *const vk::AllocationCallbacks<'_>,
) {
    state::with(|s| {
        s.record(
            "vkDestroyDebugUtilsMessengerEXT",
            &[instance.as_raw(), messenger.as_raw()],
            p_allocator,
        );
        if messenger.as_raw() != 0
            && !handle_store::unregister(messenger.as_raw(), vk::ObjectType::DEBUG_UTILS_MESSENGER_EXT)
        {
            s.violation(format!(
                "vkDestroyDebugUtilsMessengerEXT: {:#x} is not a live messenger",
                messenger.as_raw()
            ));
        }
    });
}

pub unsafe extern "system" fn release_display_ext(
    physical_device: vk::PhysicalDevice,
    display: vk::DisplayKHR,
) -> vk::Result {
    state::with(|s| {
        s.record(
            "vkReleaseDisplayEXT",
            &[physical_device.as_raw(), display.as_raw()],
            std::ptr::null(),
        );
        vk::Result::SUCCESS
    })
    .unwrap_or(NO_DRIVER)
}
