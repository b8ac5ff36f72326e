//! Runtime error types.

use thiserror::Error;

use telestage_core::TransportError;

use crate::config::ConfigError;

/// Errors that can occur while building or running a [`StageRuntime`](crate::StageRuntime).
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The transport could not be constructed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
