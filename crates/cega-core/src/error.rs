use thiserror::Error;

/// Canonical error type for directory and configuration operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Startup-time fault: the process must not serve in this state.
    #[error("configuration error: {message}")]
    Configuration {
        /// Human-readable description of the misconfiguration.
        message: String,
    },

    /// Unknown instance or mismatched shared secret.
    #[error("authentication failed")]
    Authentication,

    /// The caller asked for an unsupported identifier type.
    #[error("missing or wrong idType")]
    InvalidQuery,

    /// No record for the given identifier.
    #[error("{entity} `{id}` was not found")]
    NotFound {
        /// Entity type name (e.g. `"user"`).
        entity: &'static str,
        /// Identifier that did not resolve.
        id: String,
    },

    /// I/O error while reading a directory source or key material.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record or payload did not parse.
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates a `Configuration` variant.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a `NotFound` variant.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Convenient result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
