use std::ffi::{CStr, CString};
use std::ptr;

use ash::vk;
use tracing::{debug, warn};

use crate::command::ApiVersion;
use crate::dispatch::{allocation_callbacks, ContextDispatcher};
use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::loader::Loader;
use crate::result::enumerate;

/// The global scope: the loader plus the entry points that need no instance.
///
/// Has no native handle and nothing to destroy; it must outlive every
/// [`Instance`] created from it.
#[derive(Debug)]
pub struct Context {
    loader: Loader,
    dispatcher: ContextDispatcher,
}

impl Context {
    /// Load the system Vulkan loader and resolve the global table.
    pub fn new() -> Result<Self> {
        Ok(Self::from_loader(Loader::load()?))
    }

    pub fn from_loader(loader: Loader) -> Self {
        // SAFETY: Loader guarantees a callable vkGetInstanceProcAddr.
        let dispatcher = unsafe { ContextDispatcher::new(loader.get_instance_proc_addr()) };
        Self { loader, dispatcher }
    }

    /// # Safety
    ///
    /// See [`Loader::from_proc_addr`].
    pub unsafe fn from_proc_addr(get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr) -> Self {
        Self::from_loader(unsafe { Loader::from_proc_addr(get_instance_proc_addr) })
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn dispatcher(&self) -> &ContextDispatcher {
        &self.dispatcher
    }

    /// Highest instance-level version the loader supports. Loaders that
    /// predate `vkEnumerateInstanceVersion` only support 1.0.
    pub fn enumerate_instance_version(&self) -> Result<u32> {
        let enumerate_version = match self.dispatcher.enumerate_instance_version() {
            Ok(f) => f,
            Err(Error::Unsupported { .. }) => return Ok(vk::API_VERSION_1_0),
            Err(e) => return Err(e),
        };
        let mut version = 0u32;
        // SAFETY: version is a valid out pointer.
        let result = unsafe { enumerate_version(&mut version) };
        crate::result::check_success(result)?;
        Ok(version)
    }

    pub fn enumerate_instance_extension_properties(
        &self,
        layer_name: Option<&CStr>,
    ) -> Result<Vec<vk::ExtensionProperties>> {
        let f = self.dispatcher.enumerate_instance_extension_properties()?;
        let layer = layer_name.map_or(ptr::null(), CStr::as_ptr);
        // SAFETY: count and data pointers come from `enumerate`.
        enumerate(|count, data| unsafe { f(layer, count, data) })
    }

    pub fn enumerate_instance_layer_properties(&self) -> Result<Vec<vk::LayerProperties>> {
        let f = self.dispatcher.enumerate_instance_layer_properties()?;
        // SAFETY: count and data pointers come from `enumerate`.
        enumerate(|count, data| unsafe { f(count, data) })
    }

    /// Create an instance and resolve its table.
    ///
    /// On failure nothing is owned and no destroy call will ever be made.
    pub fn create_instance<'c>(
        &'c self,
        create_info: &vk::InstanceCreateInfo<'_>,
        allocator: Option<&'c vk::AllocationCallbacks<'c>>,
    ) -> Result<Instance<'c>> {
        let create = self.dispatcher.create_instance()?;
        let loader_version = ApiVersion::from_raw(self.enumerate_instance_version()?);
        let mut handle = vk::Instance::null();
        // SAFETY: create_info is a valid structure chain; handle is a valid out pointer.
        let result = unsafe { create(create_info, allocation_callbacks(allocator), &mut handle) };
        if result != vk::Result::SUCCESS {
            warn!("vkCreateInstance failed: {}", result);
            return Err(Error::Vulkan(result));
        }

        // SAFETY: the pointers inside create_info are valid for the duration
        // of this call.
        let (requested, extensions) = unsafe { requested_instance_state(create_info) };
        // Core entry points above the loader's version are never exposed,
        // whatever the application asked for.
        let api_version = requested.min(loader_version);
        debug!(
            api_version = %api_version,
            requested = %requested,
            extensions = extensions.len(),
            "instance created"
        );
        // SAFETY: handle was just created from this context.
        Ok(unsafe { Instance::from_raw(self, handle, allocator, api_version, extensions) })
    }
}

/// Requested API version and enabled extension names of an instance create
/// info.
unsafe fn requested_instance_state(
    create_info: &vk::InstanceCreateInfo<'_>,
) -> (ApiVersion, Vec<String>) {
    let api_version = if create_info.p_application_info.is_null() {
        ApiVersion::V1_0
    } else {
        ApiVersion::from_raw(unsafe { (*create_info.p_application_info).api_version })
    };
    let extensions = unsafe {
        c_string_array(
            create_info.pp_enabled_extension_names,
            create_info.enabled_extension_count,
        )
    };
    (api_version, extensions)
}

/// Copy a `const char* const*` array into owned strings.
pub(crate) unsafe fn c_string_array(names: *const *const std::ffi::c_char, count: u32) -> Vec<String> {
    if names.is_null() {
        return Vec::new();
    }
    (0..count as usize)
        .filter_map(|i| {
            let name = unsafe { *names.add(i) };
            if name.is_null() {
                None
            } else {
                Some(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
            }
        })
        .collect()
}

/// Owned NUL-terminated copies of `names`, for building create infos.
pub fn to_c_strings<S: AsRef<str>>(names: &[S]) -> Result<Vec<CString>> {
    names
        .iter()
        .map(|name| {
            CString::new(name.as_ref()).map_err(|_| Error::InvalidName(name.as_ref().to_string()))
        })
        .collect()
}
