//! Move-only owners of child handles.
//!
//! Every wrapper borrows the scope that created it, so the compiler rejects
//! code that would let a child outlive its parent's table. Dropping a wrapper
//! issues the matching destroy call exactly once; wrapping a null handle gives
//! a placeholder that never calls anything.

use std::fmt;

use ash::vk;
use ash::vk::Handle;
use tracing::warn;

use crate::commands::{DeviceCommand, InstanceCommand};
use crate::device::Device;
use crate::dispatch::{allocation_callbacks, DeviceDispatcher, InstanceDispatcher};
use crate::error::Result;
use crate::instance::{Instance, PhysicalDevice};

/// A handle destroyed with `vkDestroyX(device, handle, pAllocator)` (or
/// `vkFreeMemory`, which has the same shape).
pub trait DeviceChild: Handle + Copy + fmt::Debug {
    const DESTROY: DeviceCommand;

    /// # Safety
    ///
    /// `handle` must be a live object created from `device`.
    unsafe fn destroy(
        dispatcher: &DeviceDispatcher,
        device: vk::Device,
        handle: Self,
        allocator: *const vk::AllocationCallbacks<'_>,
    ) -> Result<()>;
}

/// A handle destroyed with `vkDestroyX(instance, handle, pAllocator)`.
pub trait InstanceChild: Handle + Copy + fmt::Debug {
    const DESTROY: InstanceCommand;

    /// # Safety
    ///
    /// `handle` must be a live object created from `instance`.
    unsafe fn destroy(
        dispatcher: &InstanceDispatcher,
        instance: vk::Instance,
        handle: Self,
        allocator: *const vk::AllocationCallbacks<'_>,
    ) -> Result<()>;
}

/// A handle allocated from a pool and returned with
/// `vkFreeX(device, pool, 1, &handle)`.
pub trait PoolChild: Handle + Copy + fmt::Debug {
    type Pool: DeviceChild;
    const FREE: DeviceCommand;

    /// # Safety
    ///
    /// `handle` must be a live object allocated from `pool`.
    unsafe fn free(
        dispatcher: &DeviceDispatcher,
        device: vk::Device,
        pool: Self::Pool,
        handle: Self,
    ) -> Result<()>;
}

macro_rules! device_children {
    ($($handle:ident => $cmd:ident, $destroy:ident;)*) => {
        $(
            impl DeviceChild for vk::$handle {
                const DESTROY: DeviceCommand = DeviceCommand::$cmd;

                unsafe fn destroy(
                    dispatcher: &DeviceDispatcher,
                    device: vk::Device,
                    handle: Self,
                    allocator: *const vk::AllocationCallbacks<'_>,
                ) -> Result<()> {
                    let destroy = dispatcher.$destroy()?;
                    unsafe { destroy(device, handle, allocator) };
                    Ok(())
                }
            }
        )*
    };
}

device_children! {
    Buffer => DestroyBuffer, destroy_buffer;
    BufferView => DestroyBufferView, destroy_buffer_view;
    Image => DestroyImage, destroy_image;
    ImageView => DestroyImageView, destroy_image_view;
    DeviceMemory => FreeMemory, free_memory;
    Fence => DestroyFence, destroy_fence;
    Semaphore => DestroySemaphore, destroy_semaphore;
    Event => DestroyEvent, destroy_event;
    QueryPool => DestroyQueryPool, destroy_query_pool;
    ShaderModule => DestroyShaderModule, destroy_shader_module;
    PipelineCache => DestroyPipelineCache, destroy_pipeline_cache;
    Pipeline => DestroyPipeline, destroy_pipeline;
    PipelineLayout => DestroyPipelineLayout, destroy_pipeline_layout;
    Sampler => DestroySampler, destroy_sampler;
    DescriptorSetLayout => DestroyDescriptorSetLayout, destroy_descriptor_set_layout;
    DescriptorPool => DestroyDescriptorPool, destroy_descriptor_pool;
    Framebuffer => DestroyFramebuffer, destroy_framebuffer;
    RenderPass => DestroyRenderPass, destroy_render_pass;
    CommandPool => DestroyCommandPool, destroy_command_pool;
    SamplerYcbcrConversion => DestroySamplerYcbcrConversion, destroy_sampler_ycbcr_conversion;
    DescriptorUpdateTemplate => DestroyDescriptorUpdateTemplate, destroy_descriptor_update_template;
    PrivateDataSlot => DestroyPrivateDataSlot, destroy_private_data_slot;
    SwapchainKHR => DestroySwapchainKHR, destroy_swapchain_khr;
    AccelerationStructureKHR => DestroyAccelerationStructureKHR, destroy_acceleration_structure_khr;
}

impl InstanceChild for vk::SurfaceKHR {
    const DESTROY: InstanceCommand = InstanceCommand::DestroySurfaceKHR;

    unsafe fn destroy(
        dispatcher: &InstanceDispatcher,
        instance: vk::Instance,
        handle: Self,
        allocator: *const vk::AllocationCallbacks<'_>,
    ) -> Result<()> {
        let destroy = dispatcher.destroy_surface_khr()?;
        unsafe { destroy(instance, handle, allocator) };
        Ok(())
    }
}

impl InstanceChild for vk::DebugUtilsMessengerEXT {
    const DESTROY: InstanceCommand = InstanceCommand::DestroyDebugUtilsMessengerEXT;

    unsafe fn destroy(
        dispatcher: &InstanceDispatcher,
        instance: vk::Instance,
        handle: Self,
        allocator: *const vk::AllocationCallbacks<'_>,
    ) -> Result<()> {
        let destroy = dispatcher.destroy_debug_utils_messenger_ext()?;
        unsafe { destroy(instance, handle, allocator) };
        Ok(())
    }
}

impl PoolChild for vk::CommandBuffer {
    type Pool = vk::CommandPool;
    const FREE: DeviceCommand = DeviceCommand::FreeCommandBuffers;

    unsafe fn free(
        dispatcher: &DeviceDispatcher,
        device: vk::Device,
        pool: vk::CommandPool,
        handle: Self,
    ) -> Result<()> {
        let free = dispatcher.free_command_buffers()?;
        unsafe { free(device, pool, 1, &handle) };
        Ok(())
    }
}

impl PoolChild for vk::DescriptorSet {
    type Pool = vk::DescriptorPool;
    const FREE: DeviceCommand = DeviceCommand::FreeDescriptorSets;

    unsafe fn free(
        dispatcher: &DeviceDispatcher,
        device: vk::Device,
        pool: vk::DescriptorPool,
        handle: Self,
    ) -> Result<()> {
        let free = dispatcher.free_descriptor_sets()?;
        // The status of a free call is not reported.
        let _ = unsafe { free(device, pool, 1, &handle) };
        Ok(())
    }
}

/// Owner of one device-level handle.
pub struct DeviceObject<'d, T: DeviceChild> {
    device: &'d Device<'d>,
    handle: T,
    allocator: Option<&'d vk::AllocationCallbacks<'d>>,
}

impl<'d, T: DeviceChild> DeviceObject<'d, T> {
    /// Take ownership of `handle`.
    ///
    /// # Safety
    ///
    /// `handle` must be null or a live object created from `device` with
    /// `allocator`, and not owned by anything else.
    pub unsafe fn from_raw(
        device: &'d Device<'d>,
        handle: T,
        allocator: Option<&'d vk::AllocationCallbacks<'d>>,
    ) -> Self {
        Self {
            device,
            handle,
            allocator,
        }
    }

    pub fn handle(&self) -> T {
        self.handle
    }

    pub fn device(&self) -> &'d Device<'d> {
        self.device
    }

    pub fn dispatcher(&self) -> &'d DeviceDispatcher {
        self.device.dispatcher()
    }

    pub fn allocator(&self) -> Option<&'d vk::AllocationCallbacks<'d>> {
        self.allocator
    }

    pub fn is_null(&self) -> bool {
        self.handle.as_raw() == 0
    }

    /// Give up ownership without destroying.
    pub fn release(mut self) -> T {
        std::mem::replace(&mut self.handle, T::from_raw(0))
    }
}

impl<T: DeviceChild> Drop for DeviceObject<'_, T> {
    fn drop(&mut self) {
        if self.is_null() {
            return;
        }
        // SAFETY: this wrapper owns a live handle created from self.device.
        let destroyed = unsafe {
            T::destroy(
                self.device.dispatcher(),
                self.device.handle(),
                self.handle,
                allocation_callbacks(self.allocator),
            )
        };
        if let Err(e) = destroyed {
            warn!("leaking {:?}: {}", self.handle, e);
        }
    }
}

impl<T: DeviceChild> fmt::Debug for DeviceObject<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceObject")
            .field("handle", &self.handle)
            .field("device", &self.device.handle())
            .finish()
    }
}

/// Owner of one instance-level handle.
pub struct InstanceObject<'i, T: InstanceChild> {
    instance: &'i Instance<'i>,
    handle: T,
    allocator: Option<&'i vk::AllocationCallbacks<'i>>,
}

impl<'i, T: InstanceChild> InstanceObject<'i, T> {
    /// # Safety
    ///
    /// `handle` must be null or a live object created from `instance` with
    /// `allocator`, and not owned by anything else.
    pub unsafe fn from_raw(
        instance: &'i Instance<'i>,
        handle: T,
        allocator: Option<&'i vk::AllocationCallbacks<'i>>,
    ) -> Self {
        Self {
            instance,
            handle,
            allocator,
        }
    }

    pub fn handle(&self) -> T {
        self.handle
    }

    pub fn instance(&self) -> &'i Instance<'i> {
        self.instance
    }

    pub fn is_null(&self) -> bool {
        self.handle.as_raw() == 0
    }

    pub fn release(mut self) -> T {
        std::mem::replace(&mut self.handle, T::from_raw(0))
    }
}

impl<T: InstanceChild> Drop for InstanceObject<'_, T> {
    fn drop(&mut self) {
        if self.is_null() {
            return;
        }
        // SAFETY: this wrapper owns a live handle created from self.instance.
        let destroyed = unsafe {
            T::destroy(
                self.instance.dispatcher(),
                self.instance.handle(),
                self.handle,
                allocation_callbacks(self.allocator),
            )
        };
        if let Err(e) = destroyed {
            warn!("leaking {:?}: {}", self.handle, e);
        }
    }
}

impl<T: InstanceChild> fmt::Debug for InstanceObject<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceObject")
            .field("handle", &self.handle)
            .field("instance", &self.instance.handle())
            .finish()
    }
}

/// Owner of one handle allocated from a pool.
///
/// Borrows the pool wrapper, so the pool (and its device) outlive it.
pub struct PoolObject<'p, T: PoolChild> {
    pool: &'p DeviceObject<'p, T::Pool>,
    handle: T,
}

impl<'p, T: PoolChild> PoolObject<'p, T> {
    /// # Safety
    ///
    /// `handle` must be null or a live object allocated from `pool`, and not
    /// owned by anything else.
    pub unsafe fn from_raw(pool: &'p DeviceObject<'p, T::Pool>, handle: T) -> Self {
        Self { pool, handle }
    }

    pub fn handle(&self) -> T {
        self.handle
    }

    pub fn pool(&self) -> &'p DeviceObject<'p, T::Pool> {
        self.pool
    }

    pub fn device(&self) -> &'p Device<'p> {
        self.pool.device()
    }

    pub fn is_null(&self) -> bool {
        self.handle.as_raw() == 0
    }

    pub fn release(mut self) -> T {
        std::mem::replace(&mut self.handle, T::from_raw(0))
    }
}

impl<T: PoolChild> Drop for PoolObject<'_, T> {
    fn drop(&mut self) {
        if self.is_null() {
            return;
        }
        let device = self.pool.device();
        // SAFETY: this wrapper owns a live handle allocated from self.pool.
        let freed = unsafe {
            T::free(
                device.dispatcher(),
                device.handle(),
                self.pool.handle(),
                self.handle,
            )
        };
        if let Err(e) = freed {
            warn!("leaking {:?}: {}", self.handle, e);
        }
    }
}

impl<T: PoolChild> fmt::Debug for PoolObject<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolObject")
            .field("handle", &self.handle)
            .field("pool", &self.pool.handle())
            .finish()
    }
}

/// A display acquired for direct access, handed back with
/// `vkReleaseDisplayEXT(physical_device, display)` on drop.
pub struct DisplayLease<'i> {
    physical_device: PhysicalDevice<'i>,
    display: vk::DisplayKHR,
}

impl<'i> DisplayLease<'i> {
    /// # Safety
    ///
    /// `display` must be null or a display of `physical_device` that the
    /// caller acquired and has not released.
    pub unsafe fn from_raw(physical_device: PhysicalDevice<'i>, display: vk::DisplayKHR) -> Self {
        Self {
            physical_device,
            display,
        }
    }

    pub fn display(&self) -> vk::DisplayKHR {
        self.display
    }

    pub fn physical_device(&self) -> PhysicalDevice<'i> {
        self.physical_device
    }

    pub fn release(mut self) -> vk::DisplayKHR {
        std::mem::replace(&mut self.display, vk::DisplayKHR::null())
    }
}

impl Drop for DisplayLease<'_> {
    fn drop(&mut self) {
        if self.display.as_raw() == 0 {
            return;
        }
        match self.physical_device.instance().dispatcher().release_display_ext() {
            Ok(release) => {
                // SAFETY: the display was acquired on this physical device.
                let _ = unsafe { release(self.physical_device.handle(), self.display) };
            }
            Err(e) => warn!("leaking {:?}: {}", self.display, e),
        }
    }
}

impl fmt::Debug for DisplayLease<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayLease")
            .field("display", &self.display)
            .field("physical_device", &self.physical_device.handle())
            .finish()
    }
}

pub type Buffer<'d> = DeviceObject<'d, vk::Buffer>;
pub type BufferView<'d> = DeviceObject<'d, vk::BufferView>;
pub type Image<'d> = DeviceObject<'d, vk::Image>;
pub type ImageView<'d> = DeviceObject<'d, vk::ImageView>;
pub type DeviceMemory<'d> = DeviceObject<'d, vk::DeviceMemory>;
pub type Fence<'d> = DeviceObject<'d, vk::Fence>;
pub type Semaphore<'d> = DeviceObject<'d, vk::Semaphore>;
pub type Event<'d> = DeviceObject<'d, vk::Event>;
pub type QueryPool<'d> = DeviceObject<'d, vk::QueryPool>;
pub type ShaderModule<'d> = DeviceObject<'d, vk::ShaderModule>;
pub type PipelineCache<'d> = DeviceObject<'d, vk::PipelineCache>;
pub type Pipeline<'d> = DeviceObject<'d, vk::Pipeline>;
pub type PipelineLayout<'d> = DeviceObject<'d, vk::PipelineLayout>;
pub type Sampler<'d> = DeviceObject<'d, vk::Sampler>;
pub type DescriptorSetLayout<'d> = DeviceObject<'d, vk::DescriptorSetLayout>;
pub type DescriptorPool<'d> = DeviceObject<'d, vk::DescriptorPool>;
pub type Framebuffer<'d> = DeviceObject<'d, vk::Framebuffer>;
pub type RenderPass<'d> = DeviceObject<'d, vk::RenderPass>;
pub type CommandPool<'d> = DeviceObject<'d, vk::CommandPool>;
pub type SamplerYcbcrConversion<'d> = DeviceObject<'d, vk::SamplerYcbcrConversion>;
pub type DescriptorUpdateTemplate<'d> = DeviceObject<'d, vk::DescriptorUpdateTemplate>;
pub type PrivateDataSlot<'d> = DeviceObject<'d, vk::PrivateDataSlot>;
pub type SwapchainKHR<'d> = DeviceObject<'d, vk::SwapchainKHR>;
pub type AccelerationStructureKHR<'d> = DeviceObject<'d, vk::AccelerationStructureKHR>;

pub type CommandBuffer<'p> = PoolObject<'p, vk::CommandBuffer>;
pub type DescriptorSet<'p> = PoolObject<'p, vk::DescriptorSet>;

pub type SurfaceKHR<'i> = InstanceObject<'i, vk::SurfaceKHR>;
pub type DebugUtilsMessengerEXT<'i> = InstanceObject<'i, vk::DebugUtilsMessengerEXT>;
