//! Error types for the Telestage framework.

use thiserror::Error;

/// Errors returned by [`Stage::run`](crate::Stage::run).
///
/// Handler failures never show up here: a handler owns whatever its own
/// calls return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// The state resolver produced a name with no registered scene.
    #[error("scene not found with name {state}")]
    SceneNotFound {
        /// The state name that was looked up.
        state: String,
    },
}

/// Errors returned when reading the per-dispatch key/value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The stored value has a different type than the one requested.
    #[error("value under '{key}' is '{found}', not '{expected}'")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type for stage dispatch.
pub type StageResult<T> = Result<T, StageError>;

/// Result type for store reads.
pub type StoreResult<T> = Result<T, StoreError>;
