#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid API version {0:?}, expected \"major.minor\" or \"major.minor.patch\"")]
    InvalidApiVersion(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
