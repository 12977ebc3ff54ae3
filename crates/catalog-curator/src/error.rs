//! Error types for recommendation controller operations

use catalog_domain::{EntryKey, EntryStatus, ShapeError};
use catalog_sdk::SdkError;
use thiserror::Error;

/// Errors that can occur while driving the recommendation queue
///
/// None of these is fatal: each is also surfaced as a notice on the
/// controller snapshot, and queue state is left consistent.
#[derive(Error, Debug)]
pub enum CuratorError {
    /// Payload is not a JSON object and cannot be queued
    #[error("Invalid recommendation payload: {0}")]
    Payload(#[from] ShapeError),

    /// Entry is a flat record, not a `{sourceProductId, recommendedProduct}` wrapper
    #[error("Cannot save this recommendation - invalid format")]
    InvalidShape,

    /// Another save is in flight
    #[error("Another recommendation is being saved ({0})")]
    Busy(EntryKey),

    /// No queued entry matches the key
    #[error("Recommendation not found: {0}")]
    EntryNotFound(EntryKey),

    /// Entry is already saving or fading
    #[error("Recommendation {key} cannot be saved while {status}")]
    NotSavable {
        /// Entry that was asked for
        key: EntryKey,
        /// Its current status
        status: EntryStatus,
    },

    /// The catalog service refused or could not be reached
    #[error("{message}")]
    Service {
        /// User-facing message
        message: String,
        /// Underlying SDK failure
        #[source]
        source: SdkError,
    },
}

impl CuratorError {
    /// Wrap an SDK failure of `action` ("delete product", ...) with the
    /// generic status-coded message
    pub fn service(action: &str, source: SdkError) -> Self {
        CuratorError::Service {
            message: failure_message(action, &source),
            source,
        }
    }

    /// Text shown to the user for this failure
    pub fn notice_message(&self) -> String {
        self.to_string()
    }
}

/// `"Failed to <action> (<status>)"` for rejected requests, the transport
/// error otherwise
pub fn failure_message(action: &str, error: &SdkError) -> String {
    match error.status() {
        Some(status) => format!("Failed to {} ({})", action, status),
        None => format!("Failed to {}: {}", action, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_domain::ProductId;
    use std::error::Error as _;

    #[test]
    fn test_invalid_shape_message() {
        assert_eq!(
            CuratorError::InvalidShape.to_string(),
            "Cannot save this recommendation - invalid format"
        );
    }

    #[test]
    fn test_service_error_keeps_source() {
        let err = CuratorError::Service {
            message: "boom".to_string(),
            source: SdkError::Rejected {
                status: 500,
                message: Some("boom".to_string()),
            },
        };
        assert_eq!(err.notice_message(), "boom");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_service_helper_ignores_server_text() {
        let err = CuratorError::service(
            "delete product",
            SdkError::Rejected {
                status: 404,
                message: Some("no such product".to_string()),
            },
        );
        assert_eq!(err.notice_message(), "Failed to delete product (404)");

        let err = CuratorError::service("load products", SdkError::Decode("eof".to_string()));
        assert_eq!(err.notice_message(), "Failed to load products: Decode error: eof");
    }

    #[test]
    fn test_not_savable_message() {
        let err = CuratorError::NotSavable {
            key: EntryKey::Product(ProductId::new(7)),
            status: EntryStatus::Fading,
        };
        assert_eq!(
            err.to_string(),
            "Recommendation product:7 cannot be saved while fading"
        );
    }
}
