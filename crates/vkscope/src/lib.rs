//! Scoped Vulkan dispatch tables and move-only owned handles.
//!
//! A [`Context`] resolves the global entry points, an [`Instance`] resolves
//! its own table through the context's loader, and a [`Device`] resolves its
//! table through `vkGetDeviceProcAddr`. Every object created from a scope
//! borrows it and calls the matching destroy entry point on drop, so a child
//! can never outlive the table it is destroyed through.
//!
//! ```no_run
//! use ash::vk;
//! use vkscope::Context;
//!
//! # fn main() -> vkscope::Result<()> {
//! let context = Context::new()?;
//! let app = vk::ApplicationInfo::default().api_version(vk::API_VERSION_1_3);
//! let instance = context.create_instance(
//!     &vk::InstanceCreateInfo::default().application_info(&app),
//!     None,
//! )?;
//! for physical_device in instance.enumerate_physical_devices()? {
//!     println!("{:?}", physical_device.properties()?.device_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod commands;
pub mod context;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod extension;
pub mod instance;
pub mod loader;
pub mod object;
pub mod result;
pub mod surface;
pub mod table;

pub use ash::vk;

pub use command::{ApiVersion, Command, Requirement, Scope};
pub use commands::{DeviceCommand, GlobalCommand, InstanceCommand};
pub use context::{to_c_strings, Context};
pub use device::{Device, Queue};
pub use dispatch::{ContextDispatcher, DeviceDispatcher, InstanceDispatcher};
pub use error::{Error, LoaderError, Result};
pub use extension::{Deprecation, ExtensionInfo, Successor};
pub use instance::{Instance, PhysicalDevice};
pub use loader::Loader;
pub use object::*;
pub use result::{check, check_success, ResultValue};
pub use surface::SurfacePlatform;
pub use table::EntryPointTable;
