//! Shared helpers for the vkscope crates: logging setup and per-platform
//! knowledge about where the Vulkan loader lives.

pub mod logging;
pub mod platform;

pub use logging::init_logging;
