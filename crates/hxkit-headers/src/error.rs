//! Error types for HTMX header handling.

/// Errors that can occur while building HTMX response headers.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// The value contains bytes that are not allowed in an HTTP header.
    #[error("invalid value for header {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    /// Event detail or a location object could not be encoded as JSON.
    #[error("failed to encode header JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl HeaderError {
    /// Create an invalid-value error.
    pub fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            name,
            value: value.into(),
        }
    }
}
