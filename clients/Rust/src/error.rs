use thiserror::Error;

/// Result type for MPS API client operations
pub type Result<T> = std::result::Result<T, MpsApiError>;

/// Errors that can occur when using the MPS API client
#[derive(Error, Debug)]
pub enum MpsApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// API rejected the conversion
    #[error("API error {status} ({code}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Semantic error code, e.g. `MPS_REFERENTIAL`
        code: String,
        /// Human readable message
        message: String,
        /// Offending MPS line, for parse errors
        line: Option<usize>,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The model was rejected before sending
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Authentication failed
    #[error("Authentication failed")]
    AuthenticationFailed,
}

impl MpsApiError {
    /// Semantic error code reported by the server, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            MpsApiError::ApiError { code, .. } => Some(code),
            _ => None,
        }
    }
}
