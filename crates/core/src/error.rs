//! Error taxonomy for identifier resolution and network expansion.
//!
//! Ambiguous and orphaned aliases are *not* errors: they are reported through
//! resolution result values. The variants here cover caller errors,
//! backing-store failures, malformed rows and stalled expansions.

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the resolution and expansion engine.
#[derive(Debug, Error)]
pub enum NetError {
    /// Bad shape of candidate or restriction input.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input.
        message: String,
    },

    /// The record store failed. Fatal for the current run, never retried here.
    #[error("record store failure: {message}")]
    Store {
        /// Description of the failed lookup.
        message: String,
        /// Underlying adapter error, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// An interaction row lacked a required field.
    #[error("malformed interaction row: {reason}")]
    MalformedRow {
        /// Which field was missing or unusable.
        reason: String,
    },

    /// Configuration could not be read or failed validation.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
        /// Underlying parse or I/O error, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Materialization of required new nodes failed mid-round.
    #[error("expansion stalled in shell {shell}: none of {candidates} candidate(s) could be materialized")]
    ExpansionStalled {
        /// Shell that was being built.
        shell: u32,
        /// Number of candidates that were dropped.
        candidates: usize,
    },
}

impl NetError {
    /// Create an [`NetError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        NetError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a [`NetError::Store`] without an underlying source.
    pub fn store(message: impl Into<String>) -> Self {
        NetError::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a [`NetError::Store`] wrapping an adapter error.
    pub fn store_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        NetError::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a [`NetError::MalformedRow`].
    pub fn malformed_row(reason: impl Into<String>) -> Self {
        NetError::MalformedRow {
            reason: reason.into(),
        }
    }

    /// Create a [`NetError::Config`] without an underlying source.
    pub fn config(message: impl Into<String>) -> Self {
        NetError::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NetError::Store { .. } | NetError::Config { .. })
    }
}

impl From<toml::de::Error> for NetError {
    fn from(err: toml::de::Error) -> Self {
        NetError::Config {
            message: format!("TOML error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for NetError {
    fn from(err: serde_json::Error) -> Self {
        NetError::Config {
            message: format!("JSON error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias used across the workspace.
pub type NetResult<T> = std::result::Result<T, NetError>;
