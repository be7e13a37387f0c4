//! Configuration shared by the vkscope library and CLI.

pub mod config;
pub mod error;

pub use config::{LoaderConfig, OutputFormat, ProbeConfig, RequestedApiVersion, VkscopeConfig};
pub use error::CoreError;
