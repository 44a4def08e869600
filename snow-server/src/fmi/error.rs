//! Feed client error types.

/// Maximum number of response body characters kept in an error.
const MAX_BODY_CHARS: usize = 500;

/// Errors from the FMI observation feed client.
///
/// The type is `Clone` so a single failed request can be reported to every
/// caller that was waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FmiError {
    /// Network failure, timeout, or unreadable response body
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Feed answered with a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response did not have the expected structure
    #[error("malformed payload: {message}")]
    MalformedPayload { message: String },

    /// Client could not be constructed from its configuration
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl FmiError {
    /// Build an `Api` error, truncating the body.
    pub(crate) fn api(status: u16, body: &str) -> Self {
        FmiError::Api {
            status,
            message: body.chars().take(MAX_BODY_CHARS).collect(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        FmiError::MalformedPayload {
            message: message.into(),
        }
    }

    /// Whether the failure happened before a usable response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, FmiError::Transport { .. })
    }
}

impl From<reqwest::Error> for FmiError {
    fn from(err: reqwest::Error) -> Self {
        FmiError::Transport {
            message: err.to_string(),
        }
    }
}
