//! Entry point descriptors shared by the three command catalogs.

use std::ffi::CStr;
use std::fmt;

use ash::vk;

/// A core API version (`major.minor`); patch level never gates an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub const V1_0: Self = Self::new(1, 0);
    pub const V1_1: Self = Self::new(1, 1);
    pub const V1_2: Self = Self::new(1, 2);
    pub const V1_3: Self = Self::new(1, 3);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Decode a packed `VK_MAKE_API_VERSION` value. Zero means 1.0.
    pub const fn from_raw(raw: u32) -> Self {
        if raw == 0 {
            return Self::V1_0;
        }
        Self::new(vk::api_version_major(raw), vk::api_version_minor(raw))
    }

    pub const fn to_raw(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, 0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// What a scope must provide for an entry point to be usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Part of the core API since this version.
    Core(ApiVersion),
    /// Provided by the named extension.
    Extension(&'static str),
}

impl Requirement {
    /// Whether a scope created with `api_version` and `enabled_extensions`
    /// advertises this entry point. An extension promoted to a core version
    /// at or below `api_version` counts as provided.
    pub fn is_satisfied_by<S: AsRef<str>>(
        self,
        api_version: ApiVersion,
        enabled_extensions: &[S],
    ) -> bool {
        match self {
            Requirement::Core(version) => api_version >= version,
            Requirement::Extension(name) => {
                enabled_extensions.iter().any(|ext| ext.as_ref() == name)
                    || crate::extension::core_version(name)
                        .is_some_and(|promoted| api_version >= promoted)
            }
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Core(version) => write!(f, "Vulkan {}", version),
            Requirement::Extension(name) => f.write_str(name),
        }
    }
}

/// The loader context an entry point is resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `vkGetInstanceProcAddr(NULL, name)`
    Global,
    /// `vkGetInstanceProcAddr(instance, name)`
    Instance,
    /// `vkGetDeviceProcAddr(device, name)`
    Device,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Global => "global",
            Scope::Instance => "instance",
            Scope::Device => "device",
        })
    }
}

/// One closed catalog of entry points, resolved together in one [`Scope`].
///
/// Implemented by [`GlobalCommand`](crate::GlobalCommand),
/// [`InstanceCommand`](crate::InstanceCommand) and
/// [`DeviceCommand`](crate::DeviceCommand).
pub trait Command: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    const SCOPE: Scope;

    /// Every member, in slot order.
    const ALL: &'static [Self];

    /// Alias groups, each ordered by precedence (canonical core name first,
    /// then KHR/EXT, then vendor).
    const ALIASES: &'static [&'static [Self]];

    /// Slot index; `Self::ALL[cmd.index()] == cmd`.
    fn index(self) -> usize;

    /// Native entry point name, e.g. `vkCreateBuffer`.
    fn name(self) -> &'static str;

    /// The same name, NUL-terminated for the loader.
    fn c_name(self) -> &'static CStr;

    fn requirement(self) -> Requirement;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cmd| cmd.name() == name)
    }

    /// The alias group containing `self`, if any.
    fn alias_group(self) -> Option<&'static [Self]> {
        Self::ALIASES
            .iter()
            .copied()
            .find(|group| group.contains(&self))
    }
}
