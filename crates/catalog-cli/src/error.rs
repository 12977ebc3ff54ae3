//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Controller error; already carries the user-facing message
    #[error("{0}")]
    Curator(#[from] catalog_curator::CuratorError),

    /// Several controller errors from one batch command
    #[error("{}", join_messages(.0))]
    Curators(Vec<catalog_curator::CuratorError>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),

    /// Command needs the queue kept alive by the REPL
    #[error("'{0}' works on the recommendation queue; run it inside 'catalog repl'")]
    ReplOnly(&'static str),
}

impl CliError {
    /// Whether the error only repeats notices the controller already published
    pub fn is_controller_notice(&self) -> bool {
        matches!(self, CliError::Curator(_) | CliError::Curators(_))
    }
}

fn join_messages(errors: &[catalog_curator::CuratorError]) -> String {
    errors
        .iter()
        .map(|e| e.notice_message())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_curator::CuratorError;
    use catalog_sdk::SdkError;

    #[test]
    fn test_service_failure_reaches_user_unprefixed() {
        let sdk = SdkError::Rejected {
            status: 404,
            message: None,
        };
        let err: CliError = CuratorError::service("delete product", sdk).into();

        assert!(matches!(err, CliError::Curator(_)));
        assert_eq!(err.to_string(), "Failed to delete product (404)");
    }

    #[test]
    fn test_batch_failures_join_messages() {
        let rejected = |status| SdkError::Rejected {
            status,
            message: None,
        };
        let err = CliError::Curators(vec![
            CuratorError::service("delete product", rejected(404)),
            CuratorError::service("delete product", rejected(500)),
        ]);

        assert!(err.is_controller_notice());
        assert_eq!(
            err.to_string(),
            "Failed to delete product (404); Failed to delete product (500)"
        );
        assert!(!CliError::InvalidInput("x".to_string()).is_controller_notice());
    }

    #[test]
    fn test_repl_only_message_names_command() {
        let err = CliError::ReplOnly("save");
        assert!(err.to_string().starts_with("'save' works on the recommendation queue"));
    }
}
