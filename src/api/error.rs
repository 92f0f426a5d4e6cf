//! Failure classification for API calls

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Fallback when the server fails without a usable `detail`
pub const GENERIC_SERVER_MESSAGE: &str = "An error occurred";

/// Why an API call did not produce a result.
///
/// The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The server answered with an error status
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// No response reached us
    #[error("Network error. Please check your connection.")]
    Network,
    #[error("{0}")]
    Unknown(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Value,
}

impl GatewayError {
    /// Classify an HTTP error response from its status and body
    pub fn from_response(status: u16, body: &str) -> Self {
        GatewayError::Rejected {
            status,
            message: detail_message(body).unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string()),
        }
    }

    /// Classify a transport-level failure
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() || error.is_request() {
            GatewayError::Network
        } else {
            GatewayError::Unknown(error.to_string())
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract a readable message from a `{"detail": ...}` body.
///
/// `detail` is either a plain string or, for request validation failures, a
/// list of objects carrying a `msg`.
fn detail_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Value::String(message) if !message.trim().is_empty() => Some(message),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
