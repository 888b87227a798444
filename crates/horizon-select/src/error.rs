//! Error types for the select widget.

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, SelectError>;

/// Errors raised while configuring the widget.
///
/// Runtime failures never surface here: transport errors become in-panel
/// messages and mapper failures are recovered in place.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// JSON configuration could not be parsed.
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed.
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configured HTTP method is not recognized.
    #[error("Invalid HTTP method '{method}' in ajax configuration")]
    InvalidMethod { method: String },
}

/// Failure reported by a host-supplied mapper function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapperError {
    /// The mapper returned an error.
    #[error("{0}")]
    Failed(String),

    /// The mapper panicked.
    #[error("mapper panicked: {0}")]
    Panicked(String),
}

impl MapperError {
    /// Create a failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
