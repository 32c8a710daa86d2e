/// Result alias that carries the custom [`MetronomeError`] type.
pub type Result<T> = std::result::Result<T, MetronomeError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum MetronomeError {
    /// Construction or setup received unusable values: BPM bounds out of
    /// order, or a canvas/reference dimension that is not strictly
    /// positive. Not recoverable; the host should abort setup.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A derived geometry value was requested before every required input
    /// was supplied. Signals a caller ordering bug.
    #[error("not fully initialized: {0}")]
    NotInitialized(&'static str),
    /// Wrapper around standard IO errors raised while loading configuration.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialization errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl MetronomeError {
    /// Creates an [`MetronomeError::InvalidConfiguration`] from any message.
    pub fn invalid_configuration<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
