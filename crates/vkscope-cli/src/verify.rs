use serde::Serialize;
use vkscope::{ApiVersion, Context, GlobalCommand, Loader, SurfacePlatform};
use vkscope_core::config::VkscopeConfig;

use crate::probe;

// ── Check result types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.to_string(),
            details: Vec::new(),
        }
    }

    fn pass(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Pass, message)
    }

    fn fail(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Fail, message)
    }

    fn warn(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Warn, message)
    }

    fn skip(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Skip, message)
    }

    fn detail(mut self, detail: &str) -> Self {
        self.details.push(detail.to_string());
        self
    }
}

// ── Main entry point ────────────────────────────────────────────────────────

pub fn run_verify(config_path: &str, json: bool) -> anyhow::Result<()> {
    let mut results: Vec<CheckResult> = Vec::new();

    let config = check_config(config_path, &mut results);

    match check_loader(&config, &mut results) {
        Some(loader) => {
            let context = Context::from_loader(loader);
            check_global_table(&context, &mut results);
            check_instance(&context, &config, &mut results);
            check_surface_support(&context, &mut results);
        }
        None => {
            for name in ["Global entry points", "Instance creation", "Surface support"] {
                results.push(CheckResult::skip(name, "No Vulkan loader available"));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results_pretty(&results);
    }

    // Exit code 1 if any failures
    if results
        .iter()
        .any(|r| matches!(r.status, CheckStatus::Fail))
    {
        std::process::exit(1);
    }

    Ok(())
}

// ── Check 1: Configuration ──────────────────────────────────────────────────

fn check_config(config_path: &str, results: &mut Vec<CheckResult>) -> VkscopeConfig {
    if !std::path::Path::new(config_path).exists() {
        results.push(
            CheckResult::warn("Configuration", &format!("Config file not found: {}", config_path))
                .detail("Using default configuration"),
        );
        return VkscopeConfig::default();
    }

    match VkscopeConfig::load(config_path) {
        Ok(config) => {
            results.push(
                CheckResult::pass("Configuration", &format!("Loaded {}", config_path))
                    .detail(&format!("Requested API version: {}", config.loader.api_version))
                    .detail(&format!(
                        "Instance extensions: {}",
                        config.loader.instance_extensions.len()
                    )),
            );
            config
        }
        Err(e) => {
            results.push(CheckResult::fail("Configuration", &format!("Invalid config: {}", e)));
            VkscopeConfig::default()
        }
    }
}

// ── Check 2: Loader library ─────────────────────────────────────────────────

fn check_loader(config: &VkscopeConfig, results: &mut Vec<CheckResult>) -> Option<Loader> {
    let loaded = match config.loader.library_path {
        Some(ref path) => Loader::from_path(path),
        None => Loader::load(),
    };
    match loaded {
        Ok(loader) => {
            results.push(CheckResult::pass(
                "Vulkan loader",
                &format!("vkGetInstanceProcAddr found in {}", loader.origin()),
            ));
            Some(loader)
        }
        Err(e) => {
            let mut result = CheckResult::fail("Vulkan loader", &e.to_string()).detail(&format!(
                "Platform: {}",
                vkscope_common::platform::platform_name()
            ));
            for name in vkscope_common::platform::loader_library_names() {
                result = result.detail(&format!("Tried: {}", name));
            }
            results.push(result);
            None
        }
    }
}

// ── Check 3: Global table ───────────────────────────────────────────────────

fn check_global_table(context: &Context, results: &mut Vec<CheckResult>) {
    let table = context.dispatcher().table();
    if !table.supports(GlobalCommand::CreateInstance) {
        results.push(CheckResult::fail(
            "Global entry points",
            "vkCreateInstance did not resolve",
        ));
        return;
    }
    let version = match context.enumerate_instance_version() {
        Ok(raw) => ApiVersion::from_raw(raw),
        Err(e) => {
            results.push(CheckResult::fail(
                "Global entry points",
                &format!("vkEnumerateInstanceVersion failed: {}", e),
            ));
            return;
        }
    };
    let mut result = CheckResult::pass(
        "Global entry points",
        &format!("Loader supports Vulkan {}", version),
    );
    for cmd in table.unresolved() {
        result = result.detail(&format!("Not provided: {:?}", cmd));
    }
    results.push(result);
}

// ── Check 4: Instance creation ──────────────────────────────────────────────

fn check_instance(context: &Context, config: &VkscopeConfig, results: &mut Vec<CheckResult>) {
    // Same extensions and layers as `probe`, so a config that probes also verifies.
    let instance = match probe::create_instance(context, config) {
        Ok(instance) => instance,
        Err(e) => {
            results.push(CheckResult::fail("Instance creation", &format!("{:#}", e)));
            return;
        }
    };

    let missing = instance
        .dispatcher()
        .table()
        .missing_for(instance.api_version(), instance.enabled_extensions());
    let mut result = if missing.is_empty() {
        CheckResult::pass(
            "Instance creation",
            &format!("Instance table complete for Vulkan {}", instance.api_version()),
        )
    } else {
        CheckResult::warn(
            "Instance creation",
            &format!("{} expected entry points did not resolve", missing.len()),
        )
    };
    if !instance.enabled_extensions().is_empty() {
        result = result.detail(&format!("Enabled: {}", instance.enabled_extensions().join(", ")));
    }
    for cmd in &missing {
        result = result.detail(&format!("Missing: {:?}", cmd));
    }

    match instance.enumerate_physical_devices() {
        Ok(devices) if devices.is_empty() => {
            result = result.detail("No physical devices reported");
        }
        Ok(devices) => {
            for device in devices {
                if let Ok(properties) = device.properties() {
                    let name = properties
                        .device_name_as_c_str()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    result = result.detail(&format!("GPU: {} ({:?})", name, properties.device_type));
                }
            }
        }
        Err(e) => {
            result = result.detail(&format!("vkEnumeratePhysicalDevices failed: {}", e));
        }
    }
    results.push(result);
}

// ── Check 5: Surface support ────────────────────────────────────────────────

fn check_surface_support(context: &Context, results: &mut Vec<CheckResult>) {
    let extensions = match context.enumerate_instance_extension_properties(None) {
        Ok(extensions) => extensions,
        Err(e) => {
            results.push(CheckResult::fail(
                "Surface support",
                &format!("vkEnumerateInstanceExtensionProperties failed: {}", e),
            ));
            return;
        }
    };
    let available: Vec<String> = extensions
        .iter()
        .filter_map(|ext| ext.extension_name_as_c_str().ok())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    let has = |name: &str| available.iter().any(|ext| ext == name);

    let candidates = SurfacePlatform::native_candidates();
    if candidates.is_empty() {
        results.push(CheckResult::skip("Surface support", "No native window system on this platform"));
        return;
    }

    let mut supported = Vec::new();
    let mut result_details = Vec::new();
    for platform in candidates {
        let ok = platform.required_instance_extensions().iter().all(|ext| has(*ext));
        result_details.push(format!(
            "{}: {}",
            platform,
            if ok { "available" } else { "not exposed by the loader" }
        ));
        if ok {
            supported.push(*platform);
        }
    }

    let mut result = if supported.is_empty() {
        CheckResult::warn("Surface support", "No native surface extension available")
    } else {
        CheckResult::pass(
            "Surface support",
            &format!("{} native surface platform(s) available", supported.len()),
        )
    };
    for detail in &result_details {
        result = result.detail(detail);
    }
    results.push(result);
}

// ── Output ──────────────────────────────────────────────────────────────────

fn print_results_pretty(results: &[CheckResult]) {
    println!();
    println!("vkscope Verification");
    println!("====================");
    println!();

    let mut pass_count = 0u32;
    let mut fail_count = 0u32;
    let mut warn_count = 0u32;

    for result in results {
        let (icon, color_start, color_end) = match result.status {
            CheckStatus::Pass => {
                pass_count += 1;
                ("[PASS]", "\x1b[32m", "\x1b[0m")
            }
            CheckStatus::Fail => {
                fail_count += 1;
                ("[FAIL]", "\x1b[31m", "\x1b[0m")
            }
            CheckStatus::Warn => {
                warn_count += 1;
                ("[WARN]", "\x1b[33m", "\x1b[0m")
            }
            CheckStatus::Skip => ("[SKIP]", "\x1b[90m", "\x1b[0m"),
        };

        println!(
            "  {}{}{} {} - {}",
            color_start, icon, color_end, result.name, result.message
        );

        for detail in &result.details {
            println!("         {}", detail);
        }
        println!();
    }

    println!("-------------------------------");
    println!(
        "  {} passed, {} failed, {} warnings",
        pass_count, fail_count, warn_count
    );
    println!();
}

#[cfg(test)]
mod tests {
    use vkscope_stub_icd::{StubDriver, StubProfile};

    use super::*;

    fn context() -> Context {
        // SAFETY: the stub resolves entry points like a loader and lives for
        // the whole process.
        unsafe { Context::from_proc_addr(vkscope_stub_icd::get_instance_proc_addr()) }
    }

    fn config_with_extensions(extensions: &[&str]) -> VkscopeConfig {
        let mut config = VkscopeConfig::default();
        config.loader.instance_extensions = extensions.iter().map(|ext| ext.to_string()).collect();
        config
    }

    #[test]
    fn test_check_instance_enables_configured_extensions() {
        let driver = StubDriver::install(StubProfile::default().with_instance_extensions(&["VK_KHR_surface"]));
        let context = context();
        let mut results = Vec::new();
        check_instance(&context, &config_with_extensions(&["VK_KHR_surface"]), &mut results);

        let result = &results[0];
        if matches!(result.status, CheckStatus::Fail) {
            panic!("expected instance creation to succeed, got {:?}", result);
        }
        assert!(result.details.iter().any(|detail| detail == "Enabled: VK_KHR_surface"));
        assert_eq!(driver.count("vkCreateInstance"), 1);
        assert_eq!(driver.count("vkDestroyInstance"), 1);
    }

    #[test]
    fn test_check_instance_fails_on_unavailable_configured_extension() {
        let _driver = StubDriver::install(StubProfile::default().with_instance_extensions(&["VK_KHR_surface"]));
        let context = context();
        let mut results = Vec::new();
        check_instance(&context, &config_with_extensions(&["VK_EXT_debug_utils"]), &mut results);

        let result = &results[0];
        match result.status {
            CheckStatus::Fail => assert!(result.message.starts_with("vkCreateInstance failed")),
            status => panic!("expected Fail, got {:?}", status),
        }
    }
}
