use std::fmt;
use std::str::FromStr;

use ash::vk;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Top-level vkscope configuration, loaded from vkscope.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VkscopeConfig {
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// How the global scope is brought up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Explicit path to the Vulkan loader library (None = platform default)
    pub library_path: Option<String>,
    /// Application name reported in VkApplicationInfo
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// API version requested at instance creation
    #[serde(default)]
    pub api_version: RequestedApiVersion,
    /// Instance extensions to enable
    #[serde(default)]
    pub instance_extensions: Vec<String>,
    /// Instance layers to enable
    #[serde(default)]
    pub layers: Vec<String>,
}

/// Settings for `vkscope probe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Also create a logical device on the first physical device
    #[serde(default = "default_true")]
    pub create_device: bool,
    /// Device extensions to enable when a device is created
    #[serde(default)]
    pub device_extensions: Vec<String>,
    /// List entry points that did not resolve
    #[serde(default)]
    pub show_unresolved: bool,
    /// Report format
    #[serde(default)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

/// A `major.minor[.patch]` API version as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestedApiVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl RequestedApiVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Packed value as expected by `VkApplicationInfo::apiVersion` (variant 0).
    pub const fn to_raw(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, self.patch)
    }
}

impl Default for RequestedApiVersion {
    fn default() -> Self {
        Self::new(1, 3, 0)
    }
}

impl FromStr for RequestedApiVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidApiVersion(s.to_string());
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid());
        }
        let mut nums = [0u32; 3];
        for (slot, part) in nums.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        // major is 7 bits, minor 10 bits, patch 12 bits in the packed form
        if nums[0] > 0x7f || nums[1] > 0x3ff || nums[2] > 0xfff {
            return Err(invalid());
        }
        Ok(Self::new(nums[0], nums[1], nums[2]))
    }
}

impl TryFrom<String> for RequestedApiVersion {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequestedApiVersion> for String {
    fn from(value: RequestedApiVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RequestedApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            application_name: default_application_name(),
            api_version: RequestedApiVersion::default(),
            instance_extensions: Vec::new(),
            layers: Vec::new(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            create_device: true,
            device_extensions: Vec::new(),
            show_unresolved: false,
            output: OutputFormat::default(),
        }
    }
}

impl VkscopeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        let config: VkscopeConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default configuration ({}): {}", path, e);
                Self::default()
            }
        }
    }
}

/// Returns the default config file path based on platform conventions.
/// Search order:
/// 1. System-wide config: `%PROGRAMDATA%\vkscope\vkscope.toml` (Windows) or `/etc/vkscope/vkscope.toml`
/// 2. Local fallback: `./vkscope.toml`
pub fn default_config_path() -> String {
    #[cfg(windows)]
    {
        let programdata = std::env::var("PROGRAMDATA")
            .unwrap_or_else(|_| r"C:\ProgramData".to_string());
        let system_path = format!(r"{}\vkscope\vkscope.toml", programdata);
        if std::path::Path::new(&system_path).exists() {
            return system_path;
        }
    }
    #[cfg(not(windows))]
    {
        let system_path = "/etc/vkscope/vkscope.toml";
        if std::path::Path::new(system_path).exists() {
            return system_path.to_string();
        }
    }
    "vkscope.toml".to_string()
}

fn default_application_name() -> String {
    "vkscope".to_string()
}

fn default_true() -> bool {
    true
}
