//! Dispatchable handles (VkInstance, VkPhysicalDevice, VkDevice, VkQueue,
//! VkCommandBuffer) are pointers; the first pointer-sized slot is reserved
//! for a loader dispatch table, as with a real ICD.

use ash::vk::Handle;

/// Value a freshly created dispatchable object carries in its loader slot.
pub const ICD_LOADER_MAGIC: usize = 0x01CD_C0DE;

#[repr(C)]
pub struct DispatchableHandle {
    pub loader_data: usize,
    /// Registry id, see `handle_store`.
    pub local_id: u64,
}

impl DispatchableHandle {
    /// Allocate a handle object and return it as a typed Vulkan handle.
    pub fn new<H: Handle>(local_id: u64) -> H {
        let ptr = Box::into_raw(Box::new(Self {
            loader_data: ICD_LOADER_MAGIC,
            local_id,
        }));
        H::from_raw(ptr as u64)
    }

    /// Registry id behind a dispatchable handle, or `None` for null.
    ///
    /// # Safety
    /// A non-null handle must have been created by [`DispatchableHandle::new`]
    /// and not yet destroyed.
    pub unsafe fn get_id<H: Handle>(handle: H) -> Option<u64> {
        let ptr = handle.as_raw() as *const Self;
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { (*ptr).local_id })
        }
    }

    /// # Safety
    /// The handle must have been created by [`DispatchableHandle::new`] and
    /// not yet destroyed.
    pub unsafe fn destroy<H: Handle>(handle: H) {
        let ptr = handle.as_raw() as *mut Self;
        if !ptr.is_null() {
            drop(unsafe { Box::from_raw(ptr) });
        }
    }
}
