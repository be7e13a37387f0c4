/// Candidate file names of the Vulkan loader library, in probing order.
pub fn loader_library_names() -> &'static [&'static str] {
    #[cfg(target_os = "windows")]
    {
        &["vulkan-1.dll"]
    }
    #[cfg(target_os = "linux")]
    {
        &["libvulkan.so.1", "libvulkan.so"]
    }
    #[cfg(target_os = "android")]
    {
        &["libvulkan.so"]
    }
    #[cfg(target_os = "macos")]
    {
        &["libvulkan.1.dylib", "libvulkan.dylib", "libMoltenVK.dylib"]
    }
    #[cfg(not(any(
        target_os = "windows",
        target_os = "linux",
        target_os = "android",
        target_os = "macos"
    )))]
    {
        &["libvulkan.so.1", "libvulkan.so"]
    }
}

/// Returns the platform name string.
pub fn platform_name() -> &'static str {
    #[cfg(target_os = "windows")]
    { "windows" }
    #[cfg(target_os = "linux")]
    { "linux" }
    #[cfg(target_os = "android")]
    { "android" }
    #[cfg(target_os = "macos")]
    { "macos" }
    #[cfg(not(any(
        target_os = "windows",
        target_os = "linux",
        target_os = "android",
        target_os = "macos"
    )))]
    { "unknown" }
}
