use serde::{Deserialize, Serialize};

/// Parameters of a `getUpdates` long-poll request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUpdates {
    /// Identifier of the first update to return.
    pub offset: i64,
    /// Maximum number of updates (1-100).
    pub limit: u32,
    /// Long-poll timeout in seconds.
    pub timeout: u64,
    /// Update kinds to receive. Empty means "keep the server's current setting".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_updates: Vec<String>,
}
