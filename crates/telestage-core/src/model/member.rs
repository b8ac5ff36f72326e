use serde::{Deserialize, Serialize};

use super::user::{Chat, User};

/// A member's status inside a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMember {
    /// "creator", "administrator", "member", "restricted", "left" or "kicked".
    #[serde(default)]
    pub status: String,
    pub user: User,
}

/// A change of membership status, used both for the bot itself
/// (`my_chat_member`) and for other members (`chat_member`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMemberUpdated {
    pub chat: Chat,
    /// The user who performed the change.
    pub from: User,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub old_chat_member: ChatMember,
    #[serde(default)]
    pub new_chat_member: ChatMember,
}

/// A request to join a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatJoinRequest {
    pub chat: Chat,
    pub from: User,
    #[serde(default)]
    pub user_chat_id: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}
