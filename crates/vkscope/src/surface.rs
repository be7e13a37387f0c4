//! Window-system surface variants.

use std::fmt;

use crate::commands::InstanceCommand;

/// The window systems a surface can be created for.
///
/// Every variant's create entry point is part of the instance catalog on
/// every build target; a loader that does not implement one leaves it null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfacePlatform {
    Xlib,
    Xcb,
    Wayland,
    Win32,
    Metal,
    Android,
    Headless,
}

impl SurfacePlatform {
    pub const ALL: &'static [SurfacePlatform] = &[
        SurfacePlatform::Xlib,
        SurfacePlatform::Xcb,
        SurfacePlatform::Wayland,
        SurfacePlatform::Win32,
        SurfacePlatform::Metal,
        SurfacePlatform::Android,
        SurfacePlatform::Headless,
    ];

    /// The instance extension that provides the create entry point.
    pub fn extension_name(self) -> &'static str {
        match self {
            SurfacePlatform::Xlib => "VK_KHR_xlib_surface",
            SurfacePlatform::Xcb => "VK_KHR_xcb_surface",
            SurfacePlatform::Wayland => "VK_KHR_wayland_surface",
            SurfacePlatform::Win32 => "VK_KHR_win32_surface",
            SurfacePlatform::Metal => "VK_EXT_metal_surface",
            SurfacePlatform::Android => "VK_KHR_android_surface",
            SurfacePlatform::Headless => "VK_EXT_headless_surface",
        }
    }

    pub fn create_command(self) -> InstanceCommand {
        match self {
            SurfacePlatform::Xlib => InstanceCommand::CreateXlibSurfaceKHR,
            SurfacePlatform::Xcb => InstanceCommand::CreateXcbSurfaceKHR,
            SurfacePlatform::Wayland => InstanceCommand::CreateWaylandSurfaceKHR,
            SurfacePlatform::Win32 => InstanceCommand::CreateWin32SurfaceKHR,
            SurfacePlatform::Metal => InstanceCommand::CreateMetalSurfaceEXT,
            SurfacePlatform::Android => InstanceCommand::CreateAndroidSurfaceKHR,
            SurfacePlatform::Headless => InstanceCommand::CreateHeadlessSurfaceEXT,
        }
    }

    /// Instance extensions to enable for surfaces on this platform.
    pub fn required_instance_extensions(self) -> [&'static str; 2] {
        ["VK_KHR_surface", self.extension_name()]
    }

    /// The windowing platform the current build target normally uses, or
    /// `None` on targets without a window system.
    pub fn native() -> Option<SurfacePlatform> {
        Self::native_candidates().first().copied()
    }

    /// Every windowing platform plausible on the current build target, most
    /// common first.
    pub fn native_candidates() -> &'static [SurfacePlatform] {
        if cfg!(target_os = "android") {
            &[SurfacePlatform::Android]
        } else if cfg!(target_os = "windows") {
            &[SurfacePlatform::Win32]
        } else if cfg!(any(target_os = "macos", target_os = "ios")) {
            &[SurfacePlatform::Metal]
        } else if cfg!(unix) {
            &[SurfacePlatform::Wayland, SurfacePlatform::Xcb, SurfacePlatform::Xlib]
        } else {
            &[]
        }
    }
}

impl fmt::Display for SurfacePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SurfacePlatform::Xlib => "xlib",
            SurfacePlatform::Xcb => "xcb",
            SurfacePlatform::Wayland => "wayland",
            SurfacePlatform::Win32 => "win32",
            SurfacePlatform::Metal => "metal",
            SurfacePlatform::Android => "android",
            SurfacePlatform::Headless => "headless",
        })
    }
}
