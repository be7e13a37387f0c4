//! `vkscope probe`: bring up every scope the configuration asks for and
//! report how its table resolved.

use std::ffi::{c_char, CString};

use anyhow::Context as _;
use serde::Serialize;
use tracing::{info, warn};
use vkscope::{vk, ApiVersion, Context, Instance, Loader};
use vkscope_core::{OutputFormat, VkscopeConfig};

use crate::report::TableReport;

#[derive(Debug, Serialize)]
struct ProbeReport {
    loader: String,
    instance_version: String,
    tables: Vec<TableReport>,
    physical_devices: Vec<PhysicalDeviceReport>,
}

#[derive(Debug, Serialize)]
struct PhysicalDeviceReport {
    name: String,
    device_type: String,
    api_version: String,
}

pub fn run_probe(config: &VkscopeConfig) -> anyhow::Result<()> {
    let loader = match config.loader.library_path {
        Some(ref path) => Loader::from_path(path)?,
        None => Loader::load()?,
    };
    let context = Context::from_loader(loader);
    let instance_version = context.enumerate_instance_version()?;

    let mut report = ProbeReport {
        loader: context.loader().origin().to_string(),
        instance_version: ApiVersion::from_raw(instance_version).to_string(),
        tables: vec![TableReport::new(
            context.dispatcher().table(),
            ApiVersion::from_raw(instance_version),
            &[] as &[&str],
        )],
        physical_devices: Vec::new(),
    };

    let instance = create_instance(&context, config)?;
    report.tables.push(TableReport::new(
        instance.dispatcher().table(),
        instance.api_version(),
        instance.enabled_extensions(),
    ));

    let physical_devices = instance.enumerate_physical_devices()?;
    for physical_device in &physical_devices {
        let properties = physical_device.properties()?;
        let name = properties
            .device_name_as_c_str()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        report.physical_devices.push(PhysicalDeviceReport {
            name,
            device_type: format!("{:?}", properties.device_type),
            api_version: ApiVersion::from_raw(properties.api_version).to_string(),
        });
    }

    match physical_devices.first() {
        Some(physical_device) if config.probe.create_device => {
            let extensions = vkscope::to_c_strings(&config.probe.device_extensions)?;
            let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|e| e.as_ptr()).collect();
            let priorities = [1.0f32];
            let queue_infos = [vk::DeviceQueueCreateInfo::default()
                .queue_family_index(0)
                .queue_priorities(&priorities)];
            let info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_infos)
                .enabled_extension_names(&extension_ptrs);
            let device = physical_device
                .create_device(&info, None)
                .context("vkCreateDevice failed")?;

            let device_version = physical_device.properties()?.api_version;
            let api_version = ApiVersion::from_raw(device_version.min(instance.api_version().to_raw()));
            report.tables.push(TableReport::new(
                device.dispatcher().table(),
                api_version,
                device.enabled_extensions(),
            ));
        }
        Some(_) => info!("device creation disabled"),
        None => warn!("no physical devices, skipping device table"),
    }

    match config.probe.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Pretty => print_pretty(&report, config.probe.show_unresolved),
    }
    Ok(())
}

pub(crate) fn create_instance<'c>(
    context: &'c Context,
    config: &VkscopeConfig,
) -> anyhow::Result<Instance<'c>> {
    let application_name = CString::new(config.loader.application_name.as_str())
        .context("application name contains a NUL byte")?;
    let extensions = vkscope::to_c_strings(&config.loader.instance_extensions)?;
    let layers = vkscope::to_c_strings(&config.loader.layers)?;
    let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|e| e.as_ptr()).collect();
    let layer_ptrs: Vec<*const c_char> = layers.iter().map(|l| l.as_ptr()).collect();

    let app = vk::ApplicationInfo::default()
        .application_name(&application_name)
        .engine_name(c"vkscope")
        .api_version(config.loader.api_version.to_raw());
    let info = vk::InstanceCreateInfo::default()
        .application_info(&app)
        .enabled_extension_names(&extension_ptrs)
        .enabled_layer_names(&layer_ptrs);
    context
        .create_instance(&info, None)
        .context("vkCreateInstance failed")
}

fn print_pretty(report: &ProbeReport, show_unresolved: bool) {
    println!();
    println!("vkscope probe");
    println!("=============");
    println!();
    println!("  loader:           {}", report.loader);
    println!("  instance version: {}", report.instance_version);
    println!();
    for table in &report.tables {
        table.print(show_unresolved);
    }
    println!();
    for (index, device) in report.physical_devices.iter().enumerate() {
        println!(
            "  [{}] {} ({}, Vulkan {})",
            index, device.name, device.device_type, device.api_version
        );
    }
    println!();
}
