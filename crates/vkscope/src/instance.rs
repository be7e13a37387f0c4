use std::ffi::CStr;
use std::fmt;
use std::ptr;

use ash::vk;
use ash::vk::Handle;
use tracing::{debug, warn};

use crate::command::ApiVersion;
use crate::commands::InstanceCommand;
use crate::context::{c_string_array, Context};
use crate::device::Device;
use crate::dispatch::{allocation_callbacks, InstanceDispatcher};
use crate::error::{Error, Result};
use crate::object::{DebugUtilsMessengerEXT, DisplayLease, InstanceObject, SurfaceKHR};
use crate::result::{enumerate, enumerate_infallible};
use crate::surface::SurfacePlatform;

/// An owned `VkInstance` and its resolved instance table.
pub struct Instance<'c> {
    context: &'c Context,
    handle: vk::Instance,
    allocator: Option<&'c vk::AllocationCallbacks<'c>>,
    dispatcher: InstanceDispatcher,
    api_version: ApiVersion,
    enabled_extensions: Vec<String>,
}

impl<'c> Instance<'c> {
    /// Take ownership of `handle` and resolve its table.
    ///
    /// # Safety
    ///
    /// `handle` must be a live instance created through `context` with
    /// `allocator`, and not owned by anything else. `api_version` is the
    /// version usable on the instance (the lower of the requested version and
    /// the loader's), `enabled_extensions` what it was created with.
    pub unsafe fn from_raw(
        context: &'c Context,
        handle: vk::Instance,
        allocator: Option<&'c vk::AllocationCallbacks<'c>>,
        api_version: ApiVersion,
        enabled_extensions: Vec<String>,
    ) -> Self {
        let gipa = context.dispatcher().get_instance_proc_addr();
        // SAFETY: guaranteed by the caller.
        let dispatcher = unsafe { InstanceDispatcher::new(gipa, handle) };
        let missing = dispatcher
            .table()
            .missing_for(api_version, &enabled_extensions);
        if !missing.is_empty() {
            debug!(
                count = missing.len(),
                "instance does not provide {} advertised entry points",
                missing.len()
            );
        }
        Self {
            context,
            handle,
            allocator,
            dispatcher,
            api_version,
            enabled_extensions,
        }
    }

    pub fn handle(&self) -> vk::Instance {
        self.handle
    }

    pub fn context(&self) -> &'c Context {
        self.context
    }

    pub fn dispatcher(&self) -> &InstanceDispatcher {
        &self.dispatcher
    }

    pub fn allocator(&self) -> Option<&'c vk::AllocationCallbacks<'c>> {
        self.allocator
    }

    /// The API version usable on this instance: the version requested at
    /// creation (1.0 when none was given), capped at what the loader supports.
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn enabled_extensions(&self) -> &[String] {
        &self.enabled_extensions
    }

    pub fn is_extension_enabled(&self, name: &str) -> bool {
        self.enabled_extensions.iter().any(|ext| ext == name)
    }

    /// Give up ownership without destroying the instance.
    pub fn release(mut self) -> vk::Instance {
        std::mem::replace(&mut self.handle, vk::Instance::null())
    }

    pub fn enumerate_physical_devices(&self) -> Result<Vec<PhysicalDevice<'_>>> {
        let f = self.dispatcher.enumerate_physical_devices()?;
        // SAFETY: count and data pointers come from `enumerate`.
        let handles = enumerate(|count, data| unsafe { f(self.handle, count, data) })?;
        Ok(handles
            .into_iter()
            .map(|handle| PhysicalDevice {
                instance: self,
                handle,
            })
            .collect())
    }

    pub fn create_debug_utils_messenger<'a>(
        &'a self,
        create_info: &vk::DebugUtilsMessengerCreateInfoEXT<'_>,
        allocator: Option<&'a vk::AllocationCallbacks<'a>>,
    ) -> Result<DebugUtilsMessengerEXT<'a>> {
        let create = self.dispatcher.create_debug_utils_messenger_ext()?;
        let mut handle = vk::DebugUtilsMessengerEXT::null();
        // SAFETY: arguments are valid for the call.
        let result = unsafe {
            create(
                self.handle,
                create_info,
                allocation_callbacks(allocator),
                &mut handle,
            )
        };
        created(result, "vkCreateDebugUtilsMessengerEXT")?;
        // SAFETY: handle was just created from this instance.
        Ok(unsafe { InstanceObject::from_raw(self, handle, allocator) })
    }

    pub fn create_headless_surface<'a>(
        &'a self,
        create_info: &vk::HeadlessSurfaceCreateInfoEXT<'_>,
        allocator: Option<&'a vk::AllocationCallbacks<'a>>,
    ) -> Result<SurfaceKHR<'a>> {
        let create = self.dispatcher.create_headless_surface_ext()?;
        let mut handle = vk::SurfaceKHR::null();
        // SAFETY: arguments are valid for the call.
        let result = unsafe {
            create(
                self.handle,
                create_info,
                allocation_callbacks(allocator),
                &mut handle,
            )
        };
        created(result, "vkCreateHeadlessSurfaceEXT")?;
        // SAFETY: handle was just created from this instance.
        Ok(unsafe { InstanceObject::from_raw(self, handle, allocator) })
    }

    /// Whether this instance can create surfaces for `platform`.
    pub fn supports_surface_platform(&self, platform: SurfacePlatform) -> bool {
        self.dispatcher.supports(platform.create_command())
            && self.dispatcher.supports(InstanceCommand::DestroySurfaceKHR)
    }
}

impl Drop for Instance<'_> {
    fn drop(&mut self) {
        if self.handle.as_raw() == 0 {
            return;
        }
        match self.dispatcher.destroy_instance() {
            Ok(destroy) => {
                // SAFETY: this wrapper owns the live instance; children borrow it
                // and are therefore already gone.
                unsafe { destroy(self.handle, allocation_callbacks(self.allocator)) };
            }
            Err(e) => warn!("leaking instance {:?}: {}", self.handle, e),
        }
    }
}

impl fmt::Debug for Instance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("handle", &self.handle)
            .field("api_version", &self.api_version)
            .field("enabled_extensions", &self.enabled_extensions)
            .finish()
    }
}

/// A physical device enumerated from an instance. Nothing to destroy, so
/// freely copyable.
#[derive(Clone, Copy)]
pub struct PhysicalDevice<'i> {
    instance: &'i Instance<'i>,
    handle: vk::PhysicalDevice,
}

impl<'i> PhysicalDevice<'i> {
    /// # Safety
    ///
    /// `handle` must be a physical device enumerated from `instance`.
    pub unsafe fn from_raw(instance: &'i Instance<'i>, handle: vk::PhysicalDevice) -> Self {
        Self { instance, handle }
    }

    pub fn handle(&self) -> vk::PhysicalDevice {
        self.handle
    }

    pub fn instance(&self) -> &'i Instance<'i> {
        self.instance
    }

    pub fn properties(&self) -> Result<vk::PhysicalDeviceProperties> {
        let f = self.instance.dispatcher().get_physical_device_properties()?;
        let mut properties = vk::PhysicalDeviceProperties::default();
        // SAFETY: properties is a valid out pointer.
        unsafe { f(self.handle, &mut properties) };
        Ok(properties)
    }

    /// Fill `properties` and its extension chain. Served by the core entry
    /// point or by `VK_KHR_get_physical_device_properties2`, whichever the
    /// instance provides.
    pub fn properties2(&self, properties: &mut vk::PhysicalDeviceProperties2<'_>) -> Result<()> {
        let f = self.instance.dispatcher().get_physical_device_properties2()?;
        // SAFETY: properties is a valid structure chain.
        unsafe { f(self.handle, properties) };
        Ok(())
    }

    pub fn queue_family_properties(&self) -> Result<Vec<vk::QueueFamilyProperties>> {
        let f = self
            .instance
            .dispatcher()
            .get_physical_device_queue_family_properties()?;
        // SAFETY: count and data pointers come from `enumerate_infallible`.
        Ok(enumerate_infallible(|count, data| unsafe {
            f(self.handle, count, data)
        }))
    }

    pub fn enumerate_device_extension_properties(
        &self,
        layer_name: Option<&CStr>,
    ) -> Result<Vec<vk::ExtensionProperties>> {
        let f = self
            .instance
            .dispatcher()
            .enumerate_device_extension_properties()?;
        let layer = layer_name.map_or(ptr::null(), CStr::as_ptr);
        // SAFETY: count and data pointers come from `enumerate`.
        enumerate(|count, data| unsafe { f(self.handle, layer, count, data) })
    }

    /// Create a logical device and resolve its table through
    /// `vkGetDeviceProcAddr`.
    pub fn create_device(
        &self,
        create_info: &vk::DeviceCreateInfo<'_>,
        allocator: Option<&'i vk::AllocationCallbacks<'i>>,
    ) -> Result<Device<'i>> {
        let dispatcher = self.instance.dispatcher();
        let create = dispatcher.create_device()?;
        let get_device_proc_addr = dispatcher.get_device_proc_addr()?;
        let mut handle = vk::Device::null();
        // SAFETY: arguments are valid for the call.
        let result = unsafe {
            create(
                self.handle,
                create_info,
                allocation_callbacks(allocator),
                &mut handle,
            )
        };
        if result != vk::Result::SUCCESS {
            warn!("vkCreateDevice failed: {}", result);
            return Err(Error::Vulkan(result));
        }
        // SAFETY: the names are valid for the duration of this call.
        let extensions = unsafe {
            c_string_array(
                create_info.pp_enabled_extension_names,
                create_info.enabled_extension_count,
            )
        };
        // SAFETY: handle was just created from this physical device.
        Ok(unsafe { Device::from_raw(*self, handle, allocator, get_device_proc_addr, extensions) })
    }

    /// Take ownership of a display the caller acquired for direct access
    /// (e.g. with `vkAcquireXlibDisplayEXT`); it is released on drop.
    ///
    /// # Safety
    ///
    /// See [`DisplayLease::from_raw`].
    pub unsafe fn lease_display(&self, display: vk::DisplayKHR) -> DisplayLease<'i> {
        unsafe { DisplayLease::from_raw(*self, display) }
    }

    /// Release an acquired display right away.
    ///
    /// # Safety
    ///
    /// See [`DisplayLease::from_raw`].
    pub unsafe fn release_display(&self, display: vk::DisplayKHR) -> Result<()> {
        let release = self.instance.dispatcher().release_display_ext()?;
        // SAFETY: guaranteed by the caller.
        crate::result::check_success(unsafe { release(self.handle, display) })
    }
}

impl fmt::Debug for PhysicalDevice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PhysicalDevice").field(&self.handle).finish()
    }
}

/// Map a creation status to `Err` for anything but `SUCCESS`.
pub(crate) fn created(result: vk::Result, call: &'static str) -> Result<()> {
    if result == vk::Result::SUCCESS {
        Ok(())
    } else {
        debug!("{} failed: {}", call, result);
        Err(Error::Vulkan(result))
    }
}
