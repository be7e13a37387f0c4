//! Configuration parsing: defaults, overrides, and API version strings.

use ash::vk;
use vkscope_core::{CoreError, OutputFormat, RequestedApiVersion, VkscopeConfig};

#[test]
fn test_empty_file_yields_defaults() {
    let config = VkscopeConfig::from_toml("").expect("empty config parses");
    assert_eq!(config.loader.application_name, "vkscope");
    assert_eq!(config.loader.api_version, RequestedApiVersion::new(1, 3, 0));
    assert!(config.loader.library_path.is_none());
    assert!(config.probe.create_device);
    assert_eq!(config.probe.output, OutputFormat::Pretty);
}

#[test]
fn test_loader_and_probe_sections_override_defaults() {
    let text = r#"
        [loader]
        library_path = "/opt/vulkan/libvulkan.so.1"
        api_version = "1.1"
        instance_extensions = ["VK_EXT_debug_utils", "VK_EXT_headless_surface"]

        [probe]
        create_device = false
        show_unresolved = true
        output = "json"
    "#;
    let config = VkscopeConfig::from_toml(text).expect("config parses");
    assert_eq!(
        config.loader.library_path.as_deref(),
        Some("/opt/vulkan/libvulkan.so.1")
    );
    assert_eq!(config.loader.api_version, RequestedApiVersion::new(1, 1, 0));
    assert_eq!(config.loader.instance_extensions.len(), 2);
    assert!(!config.probe.create_device);
    assert!(config.probe.show_unresolved);
    assert_eq!(config.probe.output, OutputFormat::Json);
}

#[test]
fn test_api_version_packs_like_vk_make_api_version() {
    let v: RequestedApiVersion = "1.2.189".parse().expect("valid version");
    assert_eq!(v.to_raw(), (1 << 22) | (2 << 12) | 189);
    assert_eq!(v.to_string(), "1.2.189");
    assert_eq!(RequestedApiVersion::new(1, 0, 0).to_string(), "1.0");
}

#[test]
fn test_api_version_matches_ash_constants() {
    assert_eq!(RequestedApiVersion::default().to_raw(), vk::API_VERSION_1_3);
    assert_eq!(RequestedApiVersion::new(1, 1, 0).to_raw(), vk::API_VERSION_1_1);
    let v: RequestedApiVersion = "1.3.250".parse().expect("valid version");
    assert_eq!(vk::api_version_major(v.to_raw()), 1);
    assert_eq!(vk::api_version_minor(v.to_raw()), 3);
    assert_eq!(vk::api_version_patch(v.to_raw()), 250);
    assert_eq!(vk::api_version_variant(v.to_raw()), 0);
}

#[test]
fn test_malformed_api_version_is_rejected() {
    for bad in ["1", "one.two", "1.2.3.4", "1.1024"] {
        match bad.parse::<RequestedApiVersion>() {
            Err(CoreError::InvalidApiVersion(s)) => assert_eq!(s, bad),
            other => panic!("expected InvalidApiVersion for {bad:?}, got {other:?}"),
        }
    }
    assert!(VkscopeConfig::from_toml("[loader]\napi_version = \"x\"").is_err());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = VkscopeConfig::load_or_default("/nonexistent/vkscope.toml");
    assert!(config.loader.instance_extensions.is_empty());
    assert!(matches!(
        VkscopeConfig::load("/nonexistent/vkscope.toml"),
        Err(CoreError::Io(_))
    ));
}
