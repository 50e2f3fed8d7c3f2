//! Error types for CliniPick
//!
//! Fetch failures are caught at the fetcher boundary and turned into state;
//! everything else propagates through [`Result`].

use thiserror::Error;

/// Main error type for CliniPick operations
#[derive(Error, Debug)]
pub enum CliniPickError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Unknown clinic '{0}'")]
    UnknownScope(String),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse data file: {0}")]
    DataParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Result type alias for CliniPick operations
pub type Result<T> = std::result::Result<T, CliniPickError>;

impl CliniPickError {
    /// Create a fetch error from anything printable
    pub fn fetch(message: impl std::fmt::Display) -> Self {
        CliniPickError::FetchFailed(message.to_string())
    }

    /// Check if this error is local to one control and may be retried
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CliniPickError::FetchFailed(_) | CliniPickError::UnknownScope(_)
        )
    }

    /// Message suitable for an inline alert next to the failing control
    pub fn inline_message(&self) -> String {
        match self {
            CliniPickError::FetchFailed(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_and_scope_errors_are_recoverable() {
        assert!(CliniPickError::fetch("timeout").is_recoverable());
        assert!(CliniPickError::UnknownScope("Nowhere".into()).is_recoverable());
        assert!(!CliniPickError::InvalidPageSize(0).is_recoverable());
    }

    #[test]
    fn inline_message_strips_prefix_for_fetch_failures() {
        assert_eq!(CliniPickError::fetch("server down").inline_message(), "server down");
        assert_eq!(
            CliniPickError::UnknownScope("X".into()).inline_message(),
            "Unknown clinic 'X'"
        );
    }
}
