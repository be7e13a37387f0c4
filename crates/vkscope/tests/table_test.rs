//! Integration test: EntryPointTable
//!
//! Drives the resolver with a hand-written loader closure (no driver) and
//! checks catalog consistency and the alias fill pass.

use std::collections::HashMap;
use std::ffi::CStr;

use vkscope::vk;
use vkscope::{ApiVersion, Command, DeviceCommand, EntryPointTable, GlobalCommand, InstanceCommand, Requirement};

unsafe extern "system" fn first() {
    std::hint::black_box(1);
}
unsafe extern "system" fn second() {
    std::hint::black_box(2);
}
unsafe extern "system" fn third() {
    std::hint::black_box(3);
}

/// A loader that answers only for the given names.
fn loader(
    answers: &[(&'static str, unsafe extern "system" fn())],
) -> impl FnMut(&CStr) -> vk::PFN_vkVoidFunction {
    let answers: HashMap<&'static str, unsafe extern "system" fn()> = answers.iter().copied().collect();
    move |name: &CStr| -> vk::PFN_vkVoidFunction { answers.get(name.to_str().ok()?).copied() }
}

fn check_catalog<C: Command>() {
    for (i, cmd) in C::ALL.iter().enumerate() {
        assert_eq!(cmd.index(), i, "{:?} index", cmd);
        assert_eq!(C::from_name(cmd.name()), Some(*cmd));
        assert_eq!(cmd.c_name().to_str().ok(), Some(cmd.name()));
        assert!(cmd.name().starts_with("vk"), "{}", cmd.name());
    }
    let mut seen = Vec::new();
    for group in C::ALIASES {
        assert!(group.len() >= 2, "alias group {:?} is too small", group);
        assert!(
            matches!(group[0].requirement(), Requirement::Core(_)),
            "alias group {:?} must start with its core name",
            group
        );
        for member in group.iter() {
            assert!(!seen.contains(member), "{:?} is in two alias groups", member);
            seen.push(*member);
            assert_eq!(member.alias_group(), Some(*group));
        }
    }
}

#[test]
fn test_catalogs_are_consistent() {
    check_catalog::<GlobalCommand>();
    check_catalog::<InstanceCommand>();
    check_catalog::<DeviceCommand>();
}

#[test]
fn test_unknown_name_is_not_in_catalog() {
    assert_eq!(DeviceCommand::from_name("vkCreateBufferXYZ"), None);
    assert_eq!(InstanceCommand::from_name("vkCreateBuffer"), None);
    assert_eq!(DeviceCommand::from_name("vkCreateBuffer"), Some(DeviceCommand::CreateBuffer));
}

#[test]
fn test_loader_that_knows_nothing_leaves_every_slot_null() {
    let table = EntryPointTable::<DeviceCommand>::resolve(loader(&[]));
    assert_eq!(table.resolved_count(), 0);
    assert_eq!(table.unresolved().count(), DeviceCommand::ALL.len());
    for &cmd in DeviceCommand::ALL {
        assert!(!table.supports(cmd));
        assert_eq!(table.origin(cmd), None);
    }
}

#[test]
fn test_alias_fill_uses_only_available_member() {
    // Only the vendor variant of a three-member group.
    let table = EntryPointTable::<DeviceCommand>::resolve(loader(&[("vkCmdDrawIndirectCountAMD", third)]));
    let expected: vk::PFN_vkVoidFunction = Some(third);
    for cmd in [
        DeviceCommand::CmdDrawIndirectCount,
        DeviceCommand::CmdDrawIndirectCountKHR,
        DeviceCommand::CmdDrawIndirectCountAMD,
    ] {
        assert_eq!(table.get(cmd), expected, "{:?}", cmd);
        assert_eq!(table.origin(cmd), Some(DeviceCommand::CmdDrawIndirectCountAMD));
    }
    assert!(table.is_fallback(DeviceCommand::CmdDrawIndirectCount));
    assert!(!table.is_fallback(DeviceCommand::CmdDrawIndirectCountAMD));
    assert_eq!(table.resolved_count(), 3);
}

#[test]
fn test_alias_fill_prefers_core_then_khr() {
    let table = EntryPointTable::<DeviceCommand>::resolve(loader(&[
        ("vkGetBufferDeviceAddressKHR", second),
        ("vkGetBufferDeviceAddressEXT", third),
    ]));
    // The canonical name takes the KHR pointer, not the EXT one.
    assert_eq!(table.get(DeviceCommand::GetBufferDeviceAddress), Some(second as unsafe extern "system" fn()));
    assert_eq!(table.origin(DeviceCommand::GetBufferDeviceAddress), Some(DeviceCommand::GetBufferDeviceAddressKHR));
    // Members that resolved on their own keep their own pointers.
    assert_eq!(table.get(DeviceCommand::GetBufferDeviceAddressEXT), Some(third as unsafe extern "system" fn()));
    assert!(!table.is_fallback(DeviceCommand::GetBufferDeviceAddressEXT));
}

#[test]
fn test_alias_fill_never_overrides_resolved_members() {
    let table = EntryPointTable::<DeviceCommand>::resolve(loader(&[
        ("vkTrimCommandPool", first),
        ("vkTrimCommandPoolKHR", second),
    ]));
    assert_eq!(table.get(DeviceCommand::TrimCommandPool), Some(first as unsafe extern "system" fn()));
    assert_eq!(table.get(DeviceCommand::TrimCommandPoolKHR), Some(second as unsafe extern "system" fn()));
    assert!(!table.is_fallback(DeviceCommand::TrimCommandPool));
    assert!(!table.is_fallback(DeviceCommand::TrimCommandPoolKHR));
}

#[test]
fn test_alias_result_is_independent_of_which_member_resolves() {
    let group = DeviceCommand::GetBufferDeviceAddress
        .alias_group()
        .unwrap_or_else(|| panic!("expected an alias group"));
    for &supplied in group {
        let table = EntryPointTable::<DeviceCommand>::resolve(loader(&[(supplied.name(), first)]));
        for &member in group {
            assert!(table.supports(member), "{:?} with only {:?}", member, supplied);
            assert_eq!(table.origin(member), Some(supplied));
        }
    }
}

#[test]
fn test_missing_for_reports_advertised_but_unresolved_entries() {
    let table = EntryPointTable::<InstanceCommand>::resolve(loader(&[
        ("vkDestroyInstance", first),
        ("vkDestroySurfaceKHR", first),
    ]));
    let missing = table.missing_for(ApiVersion::V1_0, &["VK_KHR_surface"]);
    assert!(missing.contains(&InstanceCommand::EnumeratePhysicalDevices));
    assert!(missing.contains(&InstanceCommand::GetPhysicalDeviceSurfaceSupportKHR));
    assert!(!missing.contains(&InstanceCommand::DestroyInstance));
    assert!(!missing.contains(&InstanceCommand::DestroySurfaceKHR));
    // Not advertised at 1.0 without extensions, so not missing.
    assert!(!missing.contains(&InstanceCommand::GetPhysicalDeviceProperties2));
    assert!(!missing.contains(&InstanceCommand::CreateDebugUtilsMessengerEXT));
}

#[test]
fn test_requirement_satisfaction() {
    let core_1_1 = Requirement::Core(ApiVersion::V1_1);
    assert!(!core_1_1.is_satisfied_by::<&str>(ApiVersion::V1_0, &[]));
    assert!(core_1_1.is_satisfied_by::<&str>(ApiVersion::V1_1, &[]));
    assert!(core_1_1.is_satisfied_by::<&str>(ApiVersion::V1_3, &[]));

    let swapchain = Requirement::Extension("VK_KHR_swapchain");
    assert!(!swapchain.is_satisfied_by::<&str>(ApiVersion::V1_3, &[]));
    assert!(swapchain.is_satisfied_by(ApiVersion::V1_0, &[String::from("VK_KHR_swapchain")]));
}

#[test]
fn test_api_version_round_trips_packed_form() {
    assert_eq!(ApiVersion::from_raw(vk::API_VERSION_1_2), ApiVersion::V1_2);
    assert_eq!(ApiVersion::V1_3.to_raw(), vk::API_VERSION_1_3);
    // An unset application version means 1.0.
    assert_eq!(ApiVersion::from_raw(0), ApiVersion::V1_0);
    assert_eq!(ApiVersion::V1_1.to_string(), "1.1");
}
