//! Integration test: extension metadata
//!
//! Scope, promotion, deprecation, and how promotion lets a core version
//! provide an extension's entry points.

use vkscope::extension::{self, Deprecation, Successor};
use vkscope::vk;
use vkscope::{ApiVersion, Command, DeviceCommand, InstanceCommand, Requirement};
use vkscope_stub_icd::{StubDriver, StubProfile};

#[test]
fn test_scope_of_known_extensions() {
    assert!(extension::is_instance_extension("VK_KHR_surface"));
    assert!(extension::is_instance_extension("VK_KHR_get_physical_device_properties2"));
    assert!(!extension::is_device_extension("VK_KHR_surface"));
    assert!(extension::is_device_extension("VK_KHR_swapchain"));
    assert!(!extension::is_instance_extension("VK_KHR_swapchain"));

    assert!(extension::extension("VK_VENDOR_made_up").is_none());
    assert!(!extension::is_instance_extension("VK_VENDOR_made_up"));
    assert!(!extension::is_device_extension("VK_VENDOR_made_up"));
}

#[test]
fn test_promotion_targets() {
    assert_eq!(
        extension::promoted_to("VK_KHR_maintenance1"),
        Some(Successor::Core(ApiVersion::V1_1))
    );
    assert_eq!(
        extension::promoted_to("VK_KHR_timeline_semaphore"),
        Some(Successor::Core(ApiVersion::V1_2))
    );
    assert_eq!(
        extension::promoted_to("VK_EXT_debug_marker"),
        Some(Successor::Extension("VK_EXT_debug_utils"))
    );
    assert!(extension::is_promoted_extension("VK_KHR_dynamic_rendering"));
    assert!(!extension::is_promoted_extension("VK_KHR_swapchain"));
    assert_eq!(Successor::Core(ApiVersion::V1_3).to_string(), "Vulkan 1.3");
}

#[test]
fn test_core_version_follows_extension_promotions() {
    assert_eq!(extension::core_version("VK_KHR_draw_indirect_count"), Some(ApiVersion::V1_2));
    assert_eq!(extension::core_version("VK_AMD_draw_indirect_count"), Some(ApiVersion::V1_2));
    // Promoted, but only to another extension.
    assert_eq!(extension::core_version("VK_EXT_debug_marker"), None);
    assert_eq!(extension::core_version("VK_KHR_swapchain"), None);
}

#[test]
fn test_deprecated_and_obsoleted_extensions() {
    assert_eq!(
        extension::deprecated_by("VK_EXT_debug_report"),
        Some(Some(Successor::Extension("VK_EXT_debug_utils")))
    );
    assert_eq!(
        extension::deprecated_by("VK_EXT_shader_subgroup_vote"),
        Some(Some(Successor::Core(ApiVersion::V1_1)))
    );
    assert_eq!(extension::deprecated_by("VK_NV_glsl_shader"), Some(None));
    assert!(extension::is_deprecated_extension("VK_MVK_macos_surface"));
    assert!(!extension::is_deprecated_extension("VK_AMD_negative_viewport_height"));

    assert_eq!(
        extension::obsoleted_by("VK_AMD_negative_viewport_height"),
        Some(Successor::Extension("VK_KHR_maintenance1"))
    );
    assert!(extension::is_obsoleted_extension("VK_AMD_negative_viewport_height"));
    assert!(!extension::is_obsoleted_extension("VK_EXT_debug_report"));
    assert_eq!(extension::obsoleted_by("VK_KHR_surface"), None);

    match extension::extension("VK_AMD_negative_viewport_height").and_then(|info| info.deprecation) {
        Some(Deprecation::Obsoleted(_)) => {}
        other => panic!("expected Obsoleted, got {:?}", other),
    }
}

#[test]
fn test_catalog_names_are_unique() {
    let mut names: Vec<&str> = extension::EXTENSIONS.iter().map(|info| info.name).collect();
    names.sort_unstable();
    let total = names.len();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn test_promoted_extension_is_satisfied_by_its_core_version() {
    let maintenance1 = Requirement::Extension("VK_KHR_maintenance1");
    assert!(!maintenance1.is_satisfied_by::<&str>(ApiVersion::V1_0, &[]));
    assert!(maintenance1.is_satisfied_by::<&str>(ApiVersion::V1_1, &[]));
    assert!(maintenance1.is_satisfied_by(ApiVersion::V1_0, &["VK_KHR_maintenance1"]));

    let amd = Requirement::Extension("VK_AMD_draw_indirect_count");
    assert!(!amd.is_satisfied_by::<&str>(ApiVersion::V1_1, &[]));
    assert!(amd.is_satisfied_by::<&str>(ApiVersion::V1_2, &[]));

    let swapchain = Requirement::Extension("VK_KHR_swapchain");
    assert!(!swapchain.is_satisfied_by::<&str>(ApiVersion::V1_3, &[]));
}

#[test]
fn test_core_instance_reports_unresolved_khr_alias_as_missing_only_when_promoted() {
    let _driver = StubDriver::install(
        StubProfile::core(vk::API_VERSION_1_1).hide("vkGetPhysicalDeviceProperties2"),
    );
    // SAFETY: the stub resolves entry points like a loader and lives for the
    // whole process.
    let context = unsafe { vkscope::Context::from_proc_addr(vkscope_stub_icd::get_instance_proc_addr()) };
    let app = vk::ApplicationInfo::default().api_version(vk::API_VERSION_1_1);
    let instance = context
        .create_instance(&vk::InstanceCreateInfo::default().application_info(&app), None)
        .unwrap();

    // Neither name resolves, and 1.1 covers the promoted extension.
    let missing = instance
        .dispatcher()
        .table()
        .missing_for(instance.api_version(), instance.enabled_extensions());
    assert!(missing.contains(&InstanceCommand::GetPhysicalDeviceProperties2));
    assert!(missing.contains(&InstanceCommand::GetPhysicalDeviceProperties2KHR));

    let at_1_0 = instance.dispatcher().table().missing_for::<&str>(ApiVersion::V1_0, &[]);
    assert!(!at_1_0.contains(&InstanceCommand::GetPhysicalDeviceProperties2KHR));
}

#[test]
fn test_device_commands_of_promoted_extensions_use_the_catalog() {
    assert_eq!(
        DeviceCommand::TrimCommandPoolKHR.requirement(),
        Requirement::Extension("VK_KHR_maintenance1")
    );
    assert!(DeviceCommand::TrimCommandPoolKHR
        .requirement()
        .is_satisfied_by::<&str>(ApiVersion::V1_1, &[]));
}
