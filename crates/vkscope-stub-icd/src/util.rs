use std::ffi::{c_char, CStr};

use ash::vk;

/// Answer a two-call enumeration from `items`.
///
/// # Safety
/// `count` must be valid; `data`, when non-null, must have room for `*count`
/// elements.
pub(crate) unsafe fn fill_array<T: Copy>(items: &[T], count: *mut u32, data: *mut T) -> vk::Result {
    if count.is_null() {
        return vk::Result::ERROR_INITIALIZATION_FAILED;
    }
    if data.is_null() {
        unsafe { *count = items.len() as u32 };
        return vk::Result::SUCCESS;
    }
    let capacity = unsafe { *count } as usize;
    let written = capacity.min(items.len());
    unsafe {
        std::ptr::copy_nonoverlapping(items.as_ptr(), data, written);
        *count = written as u32;
    }
    if written < items.len() {
        vk::Result::INCOMPLETE
    } else {
        vk::Result::SUCCESS
    }
}

/// Copy `value` into a fixed-size, NUL-terminated char array.
pub(crate) fn write_name<const N: usize>(dst: &mut [c_char; N], value: &str) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(N - 1);
    for (slot, byte) in dst.iter_mut().zip(&bytes[..len]) {
        *slot = *byte as c_char;
    }
    dst[len] = 0;
}

pub(crate) fn extension_properties(names: &[&str]) -> Vec<vk::ExtensionProperties> {
    names
        .iter()
        .map(|name| {
            let mut props = vk::ExtensionProperties {
                spec_version: 1,
                ..Default::default()
            };
            write_name(&mut props.extension_name, name);
            props
        })
        .collect()
}

/// Read a `const char* const*` array.
///
/// # Safety
/// `names` must be null or point to `count` valid C strings.
pub(crate) unsafe fn read_names(names: *const *const c_char, count: u32) -> Vec<String> {
    if names.is_null() {
        return Vec::new();
    }
    (0..count as usize)
        .map(|i| unsafe { CStr::from_ptr(*names.add(i)) }.to_string_lossy().into_owned())
        .collect()
}
