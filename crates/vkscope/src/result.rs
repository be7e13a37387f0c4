use ash::vk;

use crate::error::{Error, Result};

/// A value together with the success status that produced it.
///
/// Returned by calls that can succeed with a status other than `SUCCESS`
/// (`INCOMPLETE`, `TIMEOUT`, `SUBOPTIMAL_KHR`, `PIPELINE_COMPILE_REQUIRED`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultValue<T> {
    pub result: vk::Result,
    pub value: T,
}

impl<T> ResultValue<T> {
    pub fn new(result: vk::Result, value: T) -> Self {
        Self { result, value }
    }

    /// True when the status is plain `SUCCESS`.
    pub fn is_complete(&self) -> bool {
        self.result == vk::Result::SUCCESS
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (vk::Result, T) {
        (self.result, self.value)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultValue<U> {
        ResultValue {
            result: self.result,
            value: f(self.value),
        }
    }
}

/// Accept `SUCCESS` and any of `success_codes`; everything else is an error.
pub fn check(result: vk::Result, success_codes: &[vk::Result]) -> Result<vk::Result> {
    if result == vk::Result::SUCCESS || success_codes.contains(&result) {
        Ok(result)
    } else {
        Err(Error::Vulkan(result))
    }
}

/// For calls whose only success status is `SUCCESS`.
pub fn check_success(result: vk::Result) -> Result<()> {
    match result {
        vk::Result::SUCCESS => Ok(()),
        error => Err(Error::Vulkan(error)),
    }
}

/// Two-call enumeration: query the count, fetch, and start over while the
/// driver reports `INCOMPLETE` (the set grew between the calls).
pub(crate) fn enumerate<T, F>(mut call: F) -> Result<Vec<T>>
where
    T: Clone + Default,
    F: FnMut(&mut u32, *mut T) -> vk::Result,
{
    loop {
        let mut count = 0u32;
        check_success(call(&mut count, std::ptr::null_mut()))?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut items = vec![T::default(); count as usize];
        let result = call(&mut count, items.as_mut_ptr());
        if result == vk::Result::INCOMPLETE {
            tracing::trace!("enumeration reported INCOMPLETE, retrying");
            continue;
        }
        check_success(result)?;
        items.truncate(count as usize);
        return Ok(items);
    }
}

/// Two-call enumeration for queries that cannot fail.
pub(crate) fn enumerate_infallible<T, F>(mut call: F) -> Vec<T>
where
    T: Clone + Default,
    F: FnMut(&mut u32, *mut T),
{
    let mut count = 0u32;
    call(&mut count, std::ptr::null_mut());
    let mut items = vec![T::default(); count as usize];
    call(&mut count, items.as_mut_ptr());
    items.truncate(count as usize);
    items
}
