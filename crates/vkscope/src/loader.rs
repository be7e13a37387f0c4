//! Locating `vkGetInstanceProcAddr`, the one symbol everything else is
//! resolved from.

use std::ffi::OsStr;
use std::fmt;

use ash::vk;
use libloading::{Library, Symbol};
use tracing::{debug, info};

use crate::error::LoaderError;

const GET_INSTANCE_PROC_ADDR: &str = "vkGetInstanceProcAddr";

/// The Vulkan loader (or any ICD-style library) plus its
/// `vkGetInstanceProcAddr`.
///
/// When loaded from a library, the library stays mapped for as long as the
/// `Loader` lives; every pointer resolved through it is only valid for that
/// long.
pub struct Loader {
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    origin: String,
    _library: Option<Library>,
}

impl Loader {
    /// Load the platform's Vulkan loader, trying the usual library names.
    pub fn load() -> Result<Self, LoaderError> {
        let mut last_err = String::new();
        for name in vkscope_common::platform::loader_library_names() {
            match Self::from_path(name) {
                Ok(loader) => return Ok(loader),
                Err(e) => {
                    debug!("failed to load {}: {}", name, e);
                    last_err = e.to_string();
                }
            }
        }
        Err(LoaderError::Library(last_err))
    }

    /// Load a specific loader library.
    pub fn from_path(path: impl AsRef<OsStr>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let shown = path.to_string_lossy().into_owned();
        // SAFETY: loading a shared library runs its initializers; the Vulkan
        // loader has no unsound ones.
        let library = unsafe { Library::new(path) }
            .map_err(|e| LoaderError::Library(format!("{}: {}", shown, e)))?;
        // SAFETY: the symbol is declared with the signature from the Vulkan headers.
        let get_instance_proc_addr = unsafe {
            let sym: Symbol<vk::PFN_vkGetInstanceProcAddr> = library
                .get(GET_INSTANCE_PROC_ADDR.as_bytes())
                .map_err(|_| LoaderError::MissingSymbol {
                    library: shown.clone(),
                    symbol: GET_INSTANCE_PROC_ADDR,
                })?;
            *sym
        };
        info!("loaded Vulkan loader from: {}", shown);
        Ok(Self {
            get_instance_proc_addr,
            origin: shown,
            _library: Some(library),
        })
    }

    /// Wrap an already available `vkGetInstanceProcAddr` (a statically linked
    /// loader, or an in-process driver).
    ///
    /// # Safety
    ///
    /// `get_instance_proc_addr` must behave like the Vulkan loader entry point
    /// and stay callable for the lifetime of the returned value.
    pub unsafe fn from_proc_addr(get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr) -> Self {
        Self {
            get_instance_proc_addr,
            origin: String::from("<proc addr>"),
            _library: None,
        }
    }

    pub fn get_instance_proc_addr(&self) -> vk::PFN_vkGetInstanceProcAddr {
        self.get_instance_proc_addr
    }

    /// Where the entry point came from: a library path or `<proc addr>`.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader").field("origin", &self.origin).finish()
    }
}
