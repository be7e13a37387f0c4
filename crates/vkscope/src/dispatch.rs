//! Per-scope dispatchers.
//!
//! Each scope object builds exactly one dispatcher when it comes alive and
//! lends it to everything it creates. Typed accessors
//! (`dispatcher.create_buffer()?` and friends) are generated next to the
//! catalogs in `commands.rs`.

use std::ptr;

use ash::vk;
use ash::vk::Handle;

use crate::commands::{DeviceCommand, GlobalCommand, InstanceCommand};
use crate::table::EntryPointTable;

/// Entry points that need no instance: `vkCreateInstance` and the global
/// enumerations.
#[derive(Debug)]
pub struct ContextDispatcher {
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    table: EntryPointTable<GlobalCommand>,
}

impl ContextDispatcher {
    /// Resolve the global catalog through `vkGetInstanceProcAddr(NULL, name)`.
    ///
    /// # Safety
    ///
    /// `get_instance_proc_addr` must be a valid loader entry point.
    pub unsafe fn new(get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr) -> Self {
        let table = EntryPointTable::resolve(|name| {
            // SAFETY: a null instance is valid for global commands.
            unsafe { get_instance_proc_addr(vk::Instance::null(), name.as_ptr()) }
        });
        Self { get_instance_proc_addr, table }
    }

    pub fn get_instance_proc_addr(&self) -> vk::PFN_vkGetInstanceProcAddr {
        self.get_instance_proc_addr
    }

    pub fn table(&self) -> &EntryPointTable<GlobalCommand> {
        &self.table
    }

    pub fn supports(&self, cmd: GlobalCommand) -> bool {
        self.table.supports(cmd)
    }
}

/// Entry points of one instance, including physical-device queries.
#[derive(Debug)]
pub struct InstanceDispatcher {
    instance: vk::Instance,
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
    table: EntryPointTable<InstanceCommand>,
}

impl InstanceDispatcher {
    /// Resolve the instance catalog through
    /// `vkGetInstanceProcAddr(instance, name)`.
    ///
    /// # Safety
    ///
    /// `instance` must be a live instance created through the loader that
    /// `get_instance_proc_addr` belongs to.
    pub unsafe fn new(
        get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
        instance: vk::Instance,
    ) -> Self {
        debug_assert!(instance.as_raw() != 0);
        let table = EntryPointTable::resolve(|name| {
            // SAFETY: guaranteed by the caller.
            unsafe { get_instance_proc_addr(instance, name.as_ptr()) }
        });
        Self {
            instance,
            get_instance_proc_addr,
            table,
        }
    }

    pub fn instance(&self) -> vk::Instance {
        self.instance
    }

    pub fn get_instance_proc_addr(&self) -> vk::PFN_vkGetInstanceProcAddr {
        self.get_instance_proc_addr
    }

    pub fn table(&self) -> &EntryPointTable<InstanceCommand> {
        &self.table
    }

    pub fn supports(&self, cmd: InstanceCommand) -> bool {
        self.table.supports(cmd)
    }
}

/// Entry points of one logical device, fetched with `vkGetDeviceProcAddr` so
/// calls skip the loader trampoline.
#[derive(Debug)]
pub struct DeviceDispatcher {
    device: vk::Device,
    table: EntryPointTable<DeviceCommand>,
}

impl DeviceDispatcher {
    /// Resolve the device catalog through `vkGetDeviceProcAddr(device, name)`.
    ///
    /// # Safety
    ///
    /// `device` must be a live device and `get_device_proc_addr` the entry
    /// point taken from its parent instance's table.
    pub unsafe fn new(get_device_proc_addr: vk::PFN_vkGetDeviceProcAddr, device: vk::Device) -> Self {
        debug_assert!(device.as_raw() != 0);
        let table = EntryPointTable::resolve(|name| {
            // SAFETY: guaranteed by the caller.
            unsafe { get_device_proc_addr(device, name.as_ptr()) }
        });
        Self { device, table }
    }

    pub fn device(&self) -> vk::Device {
        self.device
    }

    pub fn table(&self) -> &EntryPointTable<DeviceCommand> {
        &self.table
    }

    pub fn supports(&self, cmd: DeviceCommand) -> bool {
        self.table.supports(cmd)
    }
}

/// `pAllocator` argument for an optional borrowed callback set.
pub(crate) fn allocation_callbacks(
    allocator: Option<&vk::AllocationCallbacks<'_>>,
) -> *const vk::AllocationCallbacks<'static> {
    allocator.map_or(ptr::null(), |callbacks| {
        (callbacks as *const vk::AllocationCallbacks<'_>).cast()
    })
}
