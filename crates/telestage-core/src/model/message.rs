//! Messages and their entities.
//!
//! Entity offsets and lengths are measured in UTF-16 code units, as the
//! Bot API specifies. The command helpers on [`Message`] convert them to
//! byte offsets before slicing, so commands following non-ASCII text or
//! emoji are handled correctly.

use serde::{Deserialize, Serialize};

use super::user::{Chat, User};

/// A chat message, channel post or edited variant of either.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i32,
    #[serde(default)]
    pub date: i64,
    /// Empty for messages sent to channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<MessageEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption_entities: Vec<MessageEntity>,
    /// Available sizes of an attached photo, smallest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo: Vec<PhotoSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Sticker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_message: Option<Box<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message: Option<Box<Message>>,
}

impl Message {
    /// Returns `true` if the text starts with a bot command entity.
    pub fn is_command(&self) -> bool {
        self.entities
            .first()
            .is_some_and(|entity| entity.is_bot_command() && entity.offset == 0)
    }

    /// Returns the command name including any `@botname` suffix, without
    /// the leading slash. Empty when the message is not a command.
    pub fn command_with_at(&self) -> &str {
        let (Some(text), Some(entity)) = (self.text.as_deref(), self.command_entity()) else {
            return "";
        };
        utf16_slice(text, 1, entity.length).unwrap_or("")
    }

    /// Returns the command name without the leading slash or `@botname`
    /// suffix. Empty when the message is not a command.
    pub fn command(&self) -> &str {
        let command = self.command_with_at();
        match command.find('@') {
            Some(at) => &command[..at],
            None => command,
        }
    }

    /// Returns everything after the command and the single separator that
    /// follows it. Empty when there are no arguments or no command.
    pub fn command_arguments(&self) -> &str {
        let (Some(text), Some(entity)) = (self.text.as_deref(), self.command_entity()) else {
            return "";
        };
        let Some(start) = utf16_to_byte(text, entity.length) else {
            return "";
        };
        let rest = &text[start..];
        let mut chars = rest.chars();
        match chars.next() {
            Some(_) => chars.as_str(),
            None => "",
        }
    }

    fn command_entity(&self) -> Option<&MessageEntity> {
        if self.is_command() {
            self.entities.first()
        } else {
            None
        }
    }
}

/// A special span inside a message text: command, mention, link, ...
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    /// Offset in UTF-16 code units.
    pub offset: usize,
    /// Length in UTF-16 code units.
    pub length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl MessageEntity {
    pub fn is_bot_command(&self) -> bool {
        self.kind == "bot_command"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub file_unique_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sticker {
    pub file_id: String,
    #[serde(default)]
    pub file_unique_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub is_animated: bool,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// Converts a UTF-16 offset into a byte offset within `text`.
///
/// Returns `None` if the offset falls past the end of the text or inside a
/// surrogate pair.
fn utf16_to_byte(text: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == offset {
            return Some(byte);
        }
        if units > offset {
            return None;
        }
        units += ch.len_utf16();
    }
    (units == offset).then_some(text.len())
}

fn utf16_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let from = utf16_to_byte(text, start)?;
    let to = utf16_to_byte(text, end)?;
    Some(&text[from..to])
}
