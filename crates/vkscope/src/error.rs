use ash::vk;

/// Failures while locating the Vulkan loader.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("failed to load Vulkan loader library: {0}")]
    Library(String),

    #[error("{library} does not export {symbol}")]
    MissingSymbol {
        library: String,
        symbol: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A native call reported a failure status.
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::Result),

    /// The entry point (and every alias of it) resolved to null in this scope.
    #[error("entry point {name} is not available in this scope")]
    Unsupported { name: &'static str },

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("string contains an interior NUL byte: {0:?}")]
    InvalidName(String),
}

impl Error {
    /// The native status code, if this error came from a native call.
    pub fn vk_result(&self) -> Option<vk::Result> {
        match self {
            Error::Vulkan(code) => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
