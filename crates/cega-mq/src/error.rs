use thiserror::Error;

/// Canonical error type for broker operations.
#[derive(Debug, Error)]
pub enum MqError {
    /// Broker unreachable after the configured retry budget.
    #[error("broker connection failed: {message}")]
    Connection {
        /// Last underlying failure, redacted of credentials.
        message: String,
    },

    /// The broker refused or garbled an operation mid-flight.
    #[error("broker protocol error: {0}")]
    Protocol(#[from] lapin::Error),

    /// Operation addressed a queue this broker does not know.
    #[error("unknown queue `{0}`")]
    UnknownQueue(String),

    /// Settlement referenced a delivery tag that is not outstanding.
    #[error("unknown delivery tag {0}")]
    UnknownDelivery(u64),

    /// A scan finished without any matching message.
    #[error("no matching message")]
    NoMatch,

    /// Payload serialization failed.
    #[error("payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    /// I/O error while reading TLS material.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for broker operations.
pub type MqResult<T> = Result<T, MqError>;
