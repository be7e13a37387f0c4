//! Integration test: representative operations
//!
//! Enumerations, non-fatal status codes, and calls that are served through
//! an alias when only the extension variant of a promoted entry point exists.

use std::ffi::{c_char, CStr};

use vkscope::vk;
use vkscope::vk::Handle;
use vkscope::{
    ApiVersion, Command, Context, Device, DeviceCommand, Error, Instance, InstanceCommand, SurfacePlatform,
};
use vkscope_stub_icd::{StubDriver, StubProfile, DEVICE_NAME};

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
    let names: Vec<*const c_char> = extensions.iter().map(|name| name.as_ptr()).collect();
    let info = vk::DeviceCreateInfo::default().enabled_extension_names(&names);
    match physical_device.create_device(&info, None) {
        Ok(device) => device,
        Err(e) => panic!("expected a device, got {:?}", e),
    }
}

#[test]
fn test_instance_version_falls_back_to_1_0() {
    let _driver = StubDriver::install(StubProfile::core(vk::API_VERSION_1_0));
    let context = context();
    assert_eq!(context.enumerate_instance_version().unwrap(), vk::API_VERSION_1_0);
}

#[test]
fn test_instance_version_is_reported_by_newer_drivers() {
    let driver = StubDriver::install(StubProfile::core(vk::API_VERSION_1_2));
    let context = context();
    assert_eq!(context.enumerate_instance_version().unwrap(), vk::API_VERSION_1_2);
    assert_eq!(driver.count("vkEnumerateInstanceVersion"), 1);
}

#[test]
fn test_extension_enumeration_retries_while_incomplete() {
    let driver = StubDriver::install(
        StubProfile::default()
            .with_instance_extensions(&["VK_KHR_surface", "VK_EXT_debug_utils"])
            .with_incomplete_rounds(2),
    );
    let context = context();
    let extensions = context.enumerate_instance_extension_properties(None).unwrap();
    let names: Vec<&str> = extensions
        .iter()
        .map(|ext| ext.extension_name_as_c_str().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["VK_KHR_surface", "VK_EXT_debug_utils"]);
    // Two INCOMPLETE rounds plus the successful one, two calls each.
    assert_eq!(driver.count("vkEnumerateInstanceExtensionProperties"), 6);
}

#[test]
fn test_empty_enumerations() {
    let _driver = StubDriver::install(StubProfile::default());
    let context = context();
    assert!(context.enumerate_instance_layer_properties().unwrap().is_empty());
    assert!(context.enumerate_instance_extension_properties(None).unwrap().is_empty());
    match context.enumerate_instance_extension_properties(Some(c"VK_LAYER_KHRONOS_validation")) {
        Err(Error::Vulkan(vk::Result::ERROR_LAYER_NOT_PRESENT)) => {}
        other => panic!("expected ERROR_LAYER_NOT_PRESENT, got {:?}", other),
    }
}

#[test]
fn test_unsupported_instance_extension_is_rejected() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let names = [c"VK_EXT_debug_utils".as_ptr()];
    let info = vk::InstanceCreateInfo::default().enabled_extension_names(&names);
    match context.create_instance(&info, None) {
        Err(Error::Vulkan(vk::Result::ERROR_EXTENSION_NOT_PRESENT)) => {}
        other => panic!("expected ERROR_EXTENSION_NOT_PRESENT, got {:?}", other.map(|i| i.handle())),
    }
    assert_eq!(driver.count("vkDestroyInstance"), 0);
}

#[test]
fn test_instance_remembers_creation_state() {
    let _driver = StubDriver::install(StubProfile::default().with_instance_extensions(&["VK_KHR_surface"]));
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_2, &[c"VK_KHR_surface"]);
    assert_eq!(instance.api_version(), ApiVersion::V1_2);
    assert_eq!(instance.enabled_extensions(), ["VK_KHR_surface".to_string()]);
    assert!(instance.is_extension_enabled("VK_KHR_surface"));
    assert!(!instance.is_extension_enabled("VK_EXT_debug_utils"));
}

#[test]
fn test_physical_device_queries() {
    let _driver = StubDriver::install(
        StubProfile::default()
            .with_physical_devices(2)
            .with_device_extensions(&["VK_KHR_swapchain"]),
    );
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let physical_devices = instance.enumerate_physical_devices().unwrap();
    assert_eq!(physical_devices.len(), 2);

    let physical_device = physical_devices[0];
    let properties = physical_device.properties().unwrap();
    assert_eq!(properties.api_version, vk::API_VERSION_1_3);
    assert_eq!(properties.device_type, vk::PhysicalDeviceType::CPU);
    assert_eq!(
        properties.device_name_as_c_str().unwrap().to_str().unwrap(),
        DEVICE_NAME
    );

    let families = physical_device.queue_family_properties().unwrap();
    assert_eq!(families.len(), 1);
    assert!(families[0].queue_flags.contains(vk::QueueFlags::COMPUTE));

    let extensions = physical_device.enumerate_device_extension_properties(None).unwrap();
    assert_eq!(extensions.len(), 1);
    assert_eq!(extensions[0].extension_name_as_c_str().unwrap(), c"VK_KHR_swapchain");
}

#[test]
fn test_properties2_served_by_old_extension_name() {
    let driver = StubDriver::install(
        StubProfile::core(vk::API_VERSION_1_0)
            .with_instance_extensions(&["VK_KHR_get_physical_device_properties2"]),
    );
    let context = context();
    let instance = create_instance(
        &context,
        vk::API_VERSION_1_0,
        &[c"VK_KHR_get_physical_device_properties2"],
    );
    let table = instance.dispatcher().table();
    assert!(table.supports(InstanceCommand::GetPhysicalDeviceProperties2));
    assert_eq!(
        table.get(InstanceCommand::GetPhysicalDeviceProperties2),
        table.get(InstanceCommand::GetPhysicalDeviceProperties2KHR)
    );
    assert_eq!(
        table.origin(InstanceCommand::GetPhysicalDeviceProperties2),
        Some(InstanceCommand::GetPhysicalDeviceProperties2KHR)
    );

    let physical_device = instance.enumerate_physical_devices().unwrap()[0];
    let mut properties = vk::PhysicalDeviceProperties2::default();
    physical_device.properties2(&mut properties).unwrap();
    assert_eq!(properties.properties.api_version, vk::API_VERSION_1_0);
    assert_eq!(driver.count("vkGetPhysicalDeviceProperties2KHR"), 1);
    assert_eq!(driver.count("vkGetPhysicalDeviceProperties2"), 0);
}

#[test]
fn test_properties2_prefers_core_entry_point() {
    let driver = StubDriver::install(
        StubProfile::core(vk::API_VERSION_1_1)
            .with_instance_extensions(&["VK_KHR_get_physical_device_properties2"]),
    );
    let context = context();
    let instance = create_instance(
        &context,
        vk::API_VERSION_1_1,
        &[c"VK_KHR_get_physical_device_properties2"],
    );
    let physical_device = instance.enumerate_physical_devices().unwrap()[0];
    let mut properties = vk::PhysicalDeviceProperties2::default();
    physical_device.properties2(&mut properties).unwrap();
    assert_eq!(driver.count("vkGetPhysicalDeviceProperties2"), 1);
    assert_eq!(driver.count("vkGetPhysicalDeviceProperties2KHR"), 0);
}

#[test]
fn test_trim_command_pool_through_each_provider() {
    // (driver version, device extensions, expected native call)
    let cases: [(u32, &[&CStr], Option<&str>); 3] = [
        (vk::API_VERSION_1_1, &[], Some("vkTrimCommandPool")),
        (vk::API_VERSION_1_0, &[c"VK_KHR_maintenance1"], Some("vkTrimCommandPoolKHR")),
        (vk::API_VERSION_1_0, &[], None),
    ];
    for (api_version, extensions, expected) in cases {
        let driver = StubDriver::install(
            StubProfile::core(api_version).with_device_extensions(&["VK_KHR_maintenance1"]),
        );
        let context = context();
        let instance = create_instance(&context, api_version, &[]);
        let device = create_device(&instance, extensions);
        let pool = device
            .create_command_pool(&vk::CommandPoolCreateInfo::default(), None)
            .unwrap();

        match (pool.trim(vk::CommandPoolTrimFlags::empty()), expected) {
            (Ok(()), Some(name)) => {
                assert_eq!(driver.count(name), 1);
                assert_eq!(driver.calls_named(name)[0].args[1], pool.handle().as_raw());
            }
            (Err(Error::Unsupported { name }), None) => assert_eq!(name, "vkTrimCommandPool"),
            (other, expected) => panic!("expected {:?}, got {:?}", expected, other),
        }
    }
}

#[test]
fn test_buffer_device_address_falls_back_to_ext() {
    let driver = StubDriver::install(
        StubProfile::core(vk::API_VERSION_1_0).with_device_extensions(&["VK_EXT_buffer_device_address"]),
    );
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_0, &[]);
    let device = create_device(&instance, &[c"VK_EXT_buffer_device_address"]);
    assert_eq!(
        device.dispatcher().table().origin(DeviceCommand::GetBufferDeviceAddressKHR),
        Some(DeviceCommand::GetBufferDeviceAddressEXT)
    );

    let buffer = device
        .create_buffer(&vk::BufferCreateInfo::default().size(64), None)
        .unwrap();
    let address = buffer.device_address().unwrap();
    assert_eq!(address, vkscope_stub_icd::device::buffer_address(buffer.handle()));
    assert_eq!(driver.count("vkGetBufferDeviceAddressEXT"), 1);
}

#[test]
fn test_aliased_destroy_goes_through_extension_entry() {
    let driver = StubDriver::install(
        StubProfile::core(vk::API_VERSION_1_0).with_device_extensions(&["VK_KHR_sampler_ycbcr_conversion"]),
    );
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_0, &[]);
    let device = create_device(&instance, &[c"VK_KHR_sampler_ycbcr_conversion"]);

    let conversion = device
        .create_sampler_ycbcr_conversion(&vk::SamplerYcbcrConversionCreateInfo::default(), None)
        .unwrap();
    let raw = conversion.handle().as_raw();
    drop(conversion);

    assert_eq!(driver.count("vkCreateSamplerYcbcrConversionKHR"), 1);
    let destroys = driver.calls_named("vkDestroySamplerYcbcrConversionKHR");
    assert_eq!(destroys.len(), 1);
    assert_eq!(destroys[0].handle(), raw);
}

#[test]
fn test_pipeline_compile_required_is_not_an_error() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    let infos = [
        vk::ComputePipelineCreateInfo::default(),
        vk::ComputePipelineCreateInfo::default()
            .flags(vk::PipelineCreateFlags::FAIL_ON_PIPELINE_COMPILE_REQUIRED),
    ];
    let created = device.create_compute_pipelines(None, &infos, None).unwrap();
    assert_eq!(created.result, vk::Result::PIPELINE_COMPILE_REQUIRED);
    assert!(!created.is_complete());

    let pipelines = created.into_value();
    assert_eq!(pipelines.len(), 2);
    assert!(!pipelines[0].is_null());
    assert!(pipelines[1].is_null());
    drop(pipelines);
    assert_eq!(driver.count("vkDestroyPipeline"), 1);
}

#[test]
fn test_pipeline_creation_failure_is_an_error() {
    let driver = StubDriver::install(
        StubProfile::default().fail("vkCreateComputePipelines", vk::Result::ERROR_OUT_OF_HOST_MEMORY),
    );
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    let infos = [vk::ComputePipelineCreateInfo::default()];
    match device.create_compute_pipelines(None, &infos, None) {
        Err(Error::Vulkan(vk::Result::ERROR_OUT_OF_HOST_MEMORY)) => {}
        other => panic!("expected ERROR_OUT_OF_HOST_MEMORY, got {:?}", other.map(|r| r.result)),
    }
    assert_eq!(driver.count("vkDestroyPipeline"), 0);
}

#[test]
fn test_queue_is_a_copyable_view() {
    let driver = StubDriver::install(StubProfile::default().fail("vkDeviceWaitIdle", vk::Result::ERROR_DEVICE_LOST));
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);

    let queue = device.queue(0, 0).unwrap();
    let copy = queue;
    assert_eq!(copy.handle(), queue.handle());
    assert_eq!(device.queue(0, 0).unwrap().handle(), queue.handle());
    assert_ne!(device.queue(0, 1).unwrap().handle(), queue.handle());

    match device.wait_idle() {
        Err(Error::Vulkan(vk::Result::ERROR_DEVICE_LOST)) => {}
        other => panic!("expected ERROR_DEVICE_LOST, got {:?}", other),
    }
    assert_eq!(driver.count("vkDeviceWaitIdle"), 1);
}

#[test]
fn test_check_accepts_listed_success_codes() {
    assert_eq!(vkscope::check(vk::Result::SUCCESS, &[]).unwrap(), vk::Result::SUCCESS);
    assert_eq!(
        vkscope::check(vk::Result::TIMEOUT, &[vk::Result::TIMEOUT]).unwrap(),
        vk::Result::TIMEOUT
    );
    match vkscope::check(vk::Result::INCOMPLETE, &[]) {
        Err(Error::Vulkan(vk::Result::INCOMPLETE)) => {}
        other => panic!("expected INCOMPLETE to be rejected, got {:?}", other),
    }
}

#[test]
fn test_surface_platforms_follow_enabled_extensions() {
    let _driver = StubDriver::install(
        StubProfile::default().with_instance_extensions(&["VK_KHR_surface", "VK_EXT_headless_surface"]),
    );
    let context = context();
    let instance = create_instance(
        &context,
        vk::API_VERSION_1_3,
        &[c"VK_KHR_surface", c"VK_EXT_headless_surface"],
    );

    for platform in SurfacePlatform::ALL.iter().copied() {
        let [surface, platform_ext] = platform.required_instance_extensions();
        assert_eq!(surface, "VK_KHR_surface");
        assert_eq!(
            platform.create_command().requirement(),
            vkscope::Requirement::Extension(platform_ext)
        );
        assert_eq!(
            instance.supports_surface_platform(platform),
            platform == SurfacePlatform::Headless,
            "{}",
            platform
        );
    }
}

#[test]
fn test_instance_version_is_capped_by_the_loader() {
    let _driver = StubDriver::install(StubProfile::core(vk::API_VERSION_1_1));
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    assert_eq!(instance.api_version(), ApiVersion::V1_1);

    let missing = instance
        .dispatcher()
        .table()
        .missing_for(instance.api_version(), instance.enabled_extensions());
    assert!(!missing.contains(&InstanceCommand::GetPhysicalDeviceToolProperties));
    assert!(!missing.contains(&InstanceCommand::GetPhysicalDeviceToolPropertiesEXT));
    assert!(!missing.contains(&InstanceCommand::GetPhysicalDeviceProperties2));
}

#[test]
fn test_instance_version_keeps_a_lower_request() {
    let _driver = StubDriver::install(StubProfile::core(vk::API_VERSION_1_3));
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_1, &[]);
    assert_eq!(instance.api_version(), ApiVersion::V1_1);
}

#[test]
fn test_check_success_rejects_non_success_statuses() {
    assert!(vkscope::check_success(vk::Result::SUCCESS).is_ok());
    for status in [vk::Result::INCOMPLETE, vk::Result::ERROR_DEVICE_LOST] {
        match vkscope::check_success(status) {
            Err(Error::Vulkan(result)) => assert_eq!(result, status),
            other => panic!("expected {:?} to be rejected, got {:?}", status, other),
        }
    }
}

#[test]
fn test_device_wait_idle_succeeds() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);
    match device.wait_idle() {
        Ok(()) => {}
        other => panic!("expected Ok, got {:?}", other),
    }
    assert_eq!(driver.count("vkDeviceWaitIdle"), 1);
}

#[test]
fn test_stub_reports_bad_count_pointer_during_incomplete_round() {
    let _driver = StubDriver::install(
        StubProfile::default()
            .with_instance_extensions(&["VK_KHR_surface"])
            .with_incomplete_rounds(1),
    );
    let mut properties = [vk::ExtensionProperties::default(); 1];
    // SAFETY: properties has room for one element; the null count is the
    // invalid input under test.
    let result = unsafe {
        vkscope_stub_icd::instance::enumerate_instance_extension_properties(
            std::ptr::null(),
            std::ptr::null_mut(),
            properties.as_mut_ptr(),
        )
    };
    assert_eq!(result, vk::Result::ERROR_INITIALIZATION_FAILED);
}

#[test]
fn test_zero_command_buffers_skip_the_driver() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);
    let pool = device
        .create_command_pool(&vk::CommandPoolCreateInfo::default(), None)
        .unwrap();

    let buffers = pool.allocate_command_buffers(vk::CommandBufferLevel::PRIMARY, 0).unwrap();
    assert!(buffers.is_empty());
    drop(buffers);
    assert_eq!(driver.count("vkAllocateCommandBuffers"), 0);
    assert_eq!(driver.count("vkFreeCommandBuffers"), 0);
}

#[test]
fn test_no_descriptor_layouts_skip_the_driver() {
    let driver = StubDriver::install(StubProfile::default());
    let context = context();
    let instance = create_instance(&context, vk::API_VERSION_1_3, &[]);
    let device = create_device(&instance, &[]);
    let pool = device
        .create_descriptor_pool(&vk::DescriptorPoolCreateInfo::default().max_sets(1), None)
        .unwrap();

    let sets = pool.allocate_descriptor_sets(&[]).unwrap();
    assert!(sets.is_empty());
    drop(sets);
    assert_eq!(driver.count("vkAllocateDescriptorSets"), 0);
    assert_eq!(driver.count("vkFreeDescriptorSets"), 0);
}
