//! Integration test: handle ownership
//!
//! Runs scopes and resources against the in-process stub driver and checks
//! the destroy calls it receives: exactly once, in child-before-parent order,
//! with the right shape, and never for null, released or failed objects.

use std::ffi::{c_char, CStr};

use vkscope::vk;
use vkscope::vk::Handle;
use vkscope::{
    Buffer, Command, Context, Device, DeviceChild, DeviceCommand, Error, GlobalCommand, Instance,
    InstanceCommand, Requirement,
};
use vkscope_stub_icd::{StubDriver, StubProfile};

fn context() -> Context {
    // SAFETY: the stub resolves entry points like a loader and lives for the
    // whole process.
    unsafe { Context::from_proc_addr(vkscope_stub_icd::get_instance_proc_addr()) }
}

fn create_instance<'c>(context: &'c Context, api_version: u32, extensions: &[&CStr]) -> Instance<'c> {
    let app = vk::ApplicationInfo::default().api_version(api_version);
    let names: Vec<*const c_char> = extensions.iter().map(|name| name.as_ptr()).collect();
    let info = vk::InstanceCreateInfo::default()
        .application_info(&app)
        .enabled_extension_names(&names);
    match context.create_instance(&info, None) {
        Ok(instance) => instance,
        Err(e) => panic!("expected an instance, got {:?}", e),
    }
}

fn create_device<'i>(instance: &'i Instance<'i>, extensions: &[&CStr]) -> Device<'i> {
    let physical_device = instance.enumerate_physical_devices().unwrap()[0];
    let priorities = [1.0f32];
    let queue_info = vk::DeviceQueueCreateInfo::default()
        .queue_family_index(0)
        .queue_priorities(&priorities);
    let names: Vec<*const c_char> = extensions.iter().map(|name| name.as_ptr()).collect();
    let info = vk::DeviceCreateInfo::default()
        .queue_create_infos(std::slice::from_ref(&queue_info))
        .enabled_extension_names(&names);
    match physical_device.create_device(&info, None) {
        Ok(device) => device,
        Err(e) => panic!("expected a device, got {:?}", e),
    }
}

fn buffer_info() -> vk::BufferCreateInfo<'static> {
    vk::BufferCreateInfo::default()
        .size(256)
        .usage(vk::BufferUsageFlags::STORAGE_BUFFER)
}

fn position(names: &[&str], name: &str) -> usize {
    names
        .iter()
        .position(|n| *n == name)
        .unwrap_or_else(|| panic!("expected a call to {}, got {:?}", name, names))
}

#[test]
fn test_core_1_0_driver_leaves_extension_slots_null() {
    let _driver = StubDriver::install(StubProfile::core(vk::API_VERSION_1_0));
    let context = context();
    assert!(context.dispatcher().supports(GlobalCommand::CreateInstance));
    assert!(!context.dispatcher().supports(GlobalCommand::EnumerateInstanceVersion));

    let instance = create_instance(&context, vk::API_VERSION_1_0, &[]);
    for cmd in [
        InstanceCommand::DestroyInstance,
        InstanceCommand::EnumeratePhysicalDevices,
        InstanceCommand::GetPhysicalDeviceProperties,
        InstanceCommand::GetPhysicalDeviceQueueFamilyProperties,
        InstanceCommand::EnumerateDeviceExtensionProperties,
        InstanceCommand::CreateDevice,
        InstanceCommand::GetDeviceProcAddr,
    ] {
        assert!(instance.dispatcher().supports(cmd), "{:?}", cmd);
    }
    for &cmd in InstanceCommand::ALL {
        if cmd.requirement() != Requirement::Core(vkscope::ApiVersion::V1_0) {
            assert!(!instance.dispatcher().supports(cmd), "{:?} should be null", cmd);
        }
    }

    let device = create_device(&instance, &[]);
    for cmd in [
        DeviceCommand::DestroyDevice,
        DeviceCommand::CreateBuffer,
        DeviceCommand::DestroyBuffer,
        DeviceCommand::AllocateMemory,
        DeviceCommand::FreeMemory,
        DeviceCommand::AllocateCommandBuffers,
        DeviceCommand::FreeCommandBuffers,
    ] {
        assert!(device.dispatcher().supports(cmd), "{:?}", cmd);
    }
    for &cmd in DeviceCommand::ALL {
        if cmd.requirement() != Requirement::Core(vkscope::ApiVersion::V1_0) {
            assert!(!device.dispatcher().supports(cmd), "{:?} should be null", cmd);
        }
    }
}

#[test]
fn test_child_is_destroyed_before_parent_through_parent_table() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);
    let buffer = device.create_buffer(&buffer_info(), None).unwrap();

    let device_raw = device.handle().as_raw();
    let buffer_raw = buffer.handle().as_raw();
    drop(buffer);
    drop(device);

    let names = driver.call_names();
    assert!(position(&names, "vkDestroyBuffer") < position(&names, "vkDestroyDevice"));
    let destroys = driver.calls_named("vkDestroyBuffer");
    assert_eq!(destroys.len(), 1);
    assert_eq!(destroys[0].args, vec![device_raw, buffer_raw]);
    assert_eq!(driver.count("vkDestroyDevice"), 1);
    assert!(driver.violations().is_empty(), "{:?}", driver.violations());
}

#[test]
fn test_scope_end_tears_down_children_then_device_then_instance() {
    let driver = StubDriver::install(StubProfile::default());
    {
        let context = context();
        let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
        let device = create_device(&instance, &[]);
        let _memory = device
            .allocate_memory(&vk::MemoryAllocateInfo::default().allocation_size(4096), None)
            .unwrap();
        let _fence = device.create_fence(&vk::FenceCreateInfo::default(), None).unwrap();
        let _semaphore = device.create_semaphore(&vk::SemaphoreCreateInfo::default(), None).unwrap();
    }
    let names = driver.call_names();
    let tail: Vec<&str> = names[names.len() - 5..].to_vec();
    assert_eq!(
        tail,
        vec![
            "vkDestroySemaphore",
            "vkDestroyFence",
            "vkFreeMemory",
            "vkDestroyDevice",
            "vkDestroyInstance",
        ]
    );
    assert!(driver.violations().is_empty(), "{:?}", driver.violations());
}

#[test]
fn test_failed_creation_owns_nothing() {
    let driver = StubDriver::install(
        StubProfile::default()
            .fail("vkCreateDevice", vk::Result::ERROR_INITIALIZATION_FAILED)
            .fail("vkCreateBuffer", vk::Result::ERROR_OUT_OF_DEVICE_MEMORY),
    );
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let physical_device = instance.enumerate_physical_devices().unwrap()[0];

    match physical_device.create_device(&vk::DeviceCreateInfo::default(), None) {
        Err(Error::Vulkan(vk::Result::ERROR_INITIALIZATION_FAILED)) => {}
        other => panic!("expected ERROR_INITIALIZATION_FAILED, got {:?}", other),
    }
    assert_eq!(driver.count("vkCreateDevice"), 1);
    assert_eq!(driver.count("vkDestroyDevice"), 0);
}

#[test]
fn test_failed_resource_creation_issues_no_destroy() {
    let driver = StubDriver::install(
        StubProfile::default().fail("vkCreateBuffer", vk::Result::ERROR_OUT_OF_DEVICE_MEMORY),
    );
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    let err = device.create_buffer(&buffer_info(), None).unwrap_err();
    assert_eq!(err.vk_result(), Some(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY));
    drop(device);
    assert_eq!(driver.count("vkDestroyBuffer"), 0);
}

#[test]
fn test_failed_instance_creation_issues_no_destroy() {
    let driver = StubDriver::install(
        StubProfile::default().fail("vkCreateInstance", vk::Result::ERROR_INCOMPATIBLE_DRIVER),
    );
    let context = context();
    let info = vk::InstanceCreateInfo::default();
    match context.create_instance(&info, None) {
        Err(Error::Vulkan(vk::Result::ERROR_INCOMPATIBLE_DRIVER)) => {}
        other => panic!("expected ERROR_INCOMPATIBLE_DRIVER, got {:?}", other.map(|i| i.handle())),
    }
    drop(context);
    assert_eq!(driver.count("vkDestroyInstance"), 0);
}

#[test]
fn test_null_wrapper_destroys_nothing() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    // SAFETY: a null handle is never destroyed.
    let placeholder = unsafe { Buffer::from_raw(&device, vk::Buffer::null(), None) };
    assert!(placeholder.is_null());
    drop(placeholder);
    assert_eq!(driver.count("vkDestroyBuffer"), 0);
}

#[test]
fn test_moved_wrapper_destroys_exactly_once() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    let buffer = device.create_buffer(&buffer_info(), None).unwrap();
    let raw = buffer.handle().as_raw();
    let moved = buffer;
    let holder = vec![moved];
    assert_eq!(driver.count("vkDestroyBuffer"), 0);
    drop(holder);

    let destroys = driver.calls_named("vkDestroyBuffer");
    assert_eq!(destroys.len(), 1);
    assert_eq!(destroys[0].handle(), raw);
}

#[test]
fn test_release_returns_handle_without_destroying() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    let buffer = device.create_buffer(&buffer_info(), None).unwrap();
    let expected = buffer.handle();
    let raw = buffer.release();
    assert_eq!(raw, expected);
    assert_eq!(driver.count("vkDestroyBuffer"), 0);

    // Ownership can be taken back and is then honoured once.
    // SAFETY: raw was created from device and is no longer owned.
    let readopted = unsafe { Buffer::from_raw(&device, raw, None) };
    drop(readopted);
    assert_eq!(driver.count("vkDestroyBuffer"), 1);
}

#[test]
fn test_released_scopes_are_not_destroyed() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    let raw_device = device.release();
    assert!(raw_device.as_raw() != 0);
    let raw_instance = instance.release();
    assert!(raw_instance.as_raw() != 0);
    assert_eq!(driver.count("vkDestroyDevice"), 0);
    assert_eq!(driver.count("vkDestroyInstance"), 0);
}

#[test]
fn test_allocator_is_passed_back_at_destroy() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);
    let callbacks = vk::AllocationCallbacks::default();
    let address = &callbacks as *const vk::AllocationCallbacks<'_> as usize;

    let image = device
        .create_image(&vk::ImageCreateInfo::default(), Some(&callbacks))
        .unwrap();
    drop(image);

    let create = &driver.calls_named("vkCreateImage")[0];
    let destroy = &driver.calls_named("vkDestroyImage")[0];
    assert_eq!(create.allocator, address);
    assert_eq!(destroy.allocator, address);
    assert_eq!(destroy.handle(), create.handle());
}

#[test]
fn test_command_buffers_are_freed_one_by_one_to_their_pool() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);
    let pool = device
        .create_command_pool(&vk::CommandPoolCreateInfo::default().queue_family_index(0), None)
        .unwrap();

    let command_buffers = pool
        .allocate_command_buffers(vk::CommandBufferLevel::PRIMARY, 2)
        .unwrap();
    assert_eq!(command_buffers.len(), 2);
    let raws: Vec<u64> = command_buffers.iter().map(|cb| cb.handle().as_raw()).collect();
    drop(command_buffers);

    let frees = driver.calls_named("vkFreeCommandBuffers");
    assert_eq!(frees.len(), 2);
    for (free, raw) in frees.iter().zip(&raws) {
        assert_eq!(
            free.args,
            vec![device.handle().as_raw(), pool.handle().as_raw(), 1, *raw]
        );
    }
    assert_eq!(driver.count("vkDestroyCommandPool"), 0);
    drop(pool);
    assert_eq!(driver.count("vkDestroyCommandPool"), 1);
    assert!(driver.violations().is_empty(), "{:?}", driver.violations());
}

#[test]
fn test_descriptor_sets_are_freed_to_their_pool() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);
    let layout = device
        .create_descriptor_set_layout(&vk::DescriptorSetLayoutCreateInfo::default(), None)
        .unwrap();
    let pool = device
        .create_descriptor_pool(
            &vk::DescriptorPoolCreateInfo::default()
                .flags(vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET)
                .max_sets(1),
            None,
        )
        .unwrap();

    let sets = pool.allocate_descriptor_sets(&[layout.handle()]).unwrap();
    let set_raw = sets[0].handle().as_raw();
    drop(sets);

    let frees = driver.calls_named("vkFreeDescriptorSets");
    assert_eq!(frees.len(), 1);
    assert_eq!(
        frees[0].args,
        vec![device.handle().as_raw(), pool.handle().as_raw(), 1, set_raw]
    );
}

#[test]
fn test_instance_children_use_instance_destroy_shape() {
    let driver = StubDriver::install(StubProfile::default().with_instance_extensions(&[
        "VK_KHR_surface",
        "VK_EXT_headless_surface",
        "VK_EXT_debug_utils",
    ]));
    let context = context();
    let instance = create_instance(
        &context,
        vk::API_VERSION_1_3,
        &[c"VK_KHR_surface", c"VK_EXT_headless_surface", c"VK_EXT_debug_utils"],
    );

    let surface = instance
        .create_headless_surface(&vk::HeadlessSurfaceCreateInfoEXT::default(), None)
        .unwrap();
    let messenger = instance
        .create_debug_utils_messenger(&vk::DebugUtilsMessengerCreateInfoEXT::default(), None)
        .unwrap();
    let instance_raw = instance.handle().as_raw();
    let surface_raw = surface.handle().as_raw();
    let messenger_raw = messenger.handle().as_raw();
    drop(surface);
    drop(messenger);

    assert_eq!(
        driver.calls_named("vkDestroySurfaceKHR")[0].args,
        vec![instance_raw, surface_raw]
    );
    assert_eq!(
        driver.calls_named("vkDestroyDebugUtilsMessengerEXT")[0].args,
        vec![instance_raw, messenger_raw]
    );
}

#[test]
fn test_display_lease_is_released_with_physical_device() {
    let driver = StubDriver::install(
        StubProfile::default().with_instance_extensions(&["VK_EXT_direct_mode_display"]),
    );
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[c"VK_EXT_direct_mode_display"]);
    let physical_device = instance.enumerate_physical_devices().unwrap()[0];

    // SAFETY: the stub accepts any display handle.
    let lease = unsafe { physical_device.lease_display(vk::DisplayKHR::from_raw(0x77)) };
    drop(lease);

    let releases = driver.calls_named("vkReleaseDisplayEXT");
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].args, vec![physical_device.handle().as_raw(), 0x77]);
    assert_eq!(releases[0].allocator, 0);
}

#[test]
fn test_unresolved_destroy_entry_is_skipped() {
    let driver = StubDriver::install(StubProfile::default().hide("vkDestroyBuffer"));
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    assert_eq!(<vk::Buffer as DeviceChild>::DESTROY, DeviceCommand::DestroyBuffer);
    match device.dispatcher().destroy_buffer() {
        Err(Error::Unsupported { name }) => assert_eq!(name, "vkDestroyBuffer"),
        Err(e) => panic!("expected Unsupported, got {:?}", e),
        Ok(_) => panic!("expected Unsupported, got a function pointer"),
    }

    let buffer = device.create_buffer(&buffer_info(), None).unwrap();
    drop(buffer);
    assert_eq!(driver.count("vkDestroyBuffer"), 0);
}
