use serde_json::Value;
use thiserror::Error;

/// Shown when the backend answered with an error but gave no usable `detail`.
pub const FALLBACK_DETAIL: &str = "Failed to get answer";

/// Shown for every transport failure, whatever the underlying cause.
pub const NETWORK_MESSAGE: &str =
    "Network error: Could not connect to the API. Please make sure the backend is running.";

/// Failures of a single call against the answer service.
///
/// `Display` is the user-facing message; diagnostic detail lives in the
/// variant fields and goes to the log.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QaError {
    /// The question was empty after trimming. No request was made.
    #[error("Please enter a question")]
    EmptyQuestion,

    /// The backend responded with a non-success status.
    #[error("Error: {}", .detail.as_deref().unwrap_or(FALLBACK_DETAIL))]
    Server { status: u16, detail: Option<String> },

    /// The request went out but no response came back.
    #[error("{}", NETWORK_MESSAGE)]
    Network { reason: String },

    /// The request could not be built or the response could not be read.
    #[error("Error: {0}")]
    Client(String),
}

impl QaError {
    pub fn server(status: u16, detail: Option<String>) -> Self {
        Self::Server { status, detail }
    }

    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    pub fn client(msg: impl Into<String>) -> Self {
        Self::Client(msg.into())
    }
}

impl From<reqwest::Error> for QaError {
    fn from(e: reqwest::Error) -> Self {
        // Builder errors (bad URL, unencodable body) never reach the wire.
        if e.is_builder() {
            QaError::Client(e.to_string())
        } else {
            QaError::Network {
                reason: e.to_string(),
            }
        }
    }
}

/// Pull the `detail` field out of an error body.
///
/// Falsy values (`null`, `""`, `false`, `0`) count as absent. Non-string
/// values are kept as compact JSON so validation errors stay readable.
pub fn detail_from_body(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
