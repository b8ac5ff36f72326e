//! Error types surfaced by transports.

use thiserror::Error;

/// Errors raised below the Bot API layer: connecting, sending, decoding bytes.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("failed to build client: {0}")]
    ClientBuild(String),

    /// The request could not be delivered or the response could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The server answered with a status and a body that is not a Bot API envelope.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body (possibly truncated).
        body: String,
    },

    /// Invalid transport configuration.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),
}

/// Error type for Bot API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The transport is not connected.
    #[error("bot is not connected")]
    NotConnected,

    /// The API call timed out.
    #[error("API call timed out")]
    Timeout,

    /// The Bot API rejected the call.
    #[error("API error ({code}): {description}")]
    Api { code: i64, description: String },

    /// Failed to serialize parameters or deserialize a result.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Neither a chat nor a sender could be resolved for a reply.
    #[error("no chat or sender to reply to")]
    MissingChat,

    /// The transport does not implement this call.
    #[error("operation not supported by this transport")]
    NotSupported,

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;
