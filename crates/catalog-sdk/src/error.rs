//! Error types for the Catalog SDK.

use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// The request never produced a response (DNS, refused, reset, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status
    #[error("{}", rejected_message(.status, .message))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// `error` field of the response body, when the service sent one
        message: Option<String>,
    },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The configured base URL cannot be used
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl SdkError {
    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the service, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            SdkError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

fn rejected_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(msg) => format!("HTTP {}: {}", status, msg),
        None => format!("HTTP {}", status),
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SdkError::Decode(e.to_string())
        } else if e.is_status() {
            match e.status() {
                Some(status) => SdkError::Rejected {
                    status: status.as_u16(),
                    message: None,
                },
                None => SdkError::Network(e.to_string()),
            }
        } else if e.is_builder() {
            SdkError::InvalidEndpoint(e.to_string())
        } else {
            SdkError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Decode(format!("JSON parsing error: {}", e))
    }
}
