//! Shared test doubles.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use telestage_core::{
    ApiError, ApiResult, Bot, BoxedBot, Chat, Message, MessageEntity, User,
};

/// A bot that records `sendMessage` calls and answers with a plausible message.
#[derive(Default)]
pub(crate) struct MockBot {
    sent: Mutex<Vec<(i64, String)>>,
    next_id: AtomicI32,
    failing: bool,
}

impl MockBot {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    pub(crate) fn boxed() -> BoxedBot {
        Self::new()
    }

    pub(crate) fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Bot for MockBot {
    fn id(&self) -> &str {
        "mock"
    }

    async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value> {
        if self.failing {
            return Err(ApiError::NotConnected);
        }
        match method {
            "sendMessage" => {
                let chat_id = params["chat_id"].as_i64().unwrap_or_default();
                let text = params["text"].as_str().unwrap_or_default().to_string();
                self.sent.lock().push((chat_id, text.clone()));
                Ok(json!({
                    "message_id": self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    "date": 0,
                    "chat": { "id": chat_id, "type": "private" },
                    "text": text,
                }))
            }
            other => Err(ApiError::Other(format!("unexpected call: {other}"))),
        }
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub(crate) fn user(id: i64) -> User {
    User {
        id,
        first_name: format!("user{id}"),
        ..Default::default()
    }
}

/// A text message sent by `user_id` in their private chat.
pub(crate) fn private_text(message_id: i32, user_id: i64, text: &str) -> Message {
    Message {
        message_id,
        from: Some(user(user_id)),
        chat: Chat {
            id: user_id,
            kind: "private".into(),
            ..Default::default()
        },
        text: Some(text.into()),
        ..Default::default()
    }
}

/// A private message whose first word is tagged as a bot command.
pub(crate) fn command(user_id: i64, text: &str) -> Message {
    let head = text.split_whitespace().next().unwrap_or_default();
    let mut message = private_text(1, user_id, text);
    message.entities = vec![MessageEntity {
        kind: "bot_command".into(),
        offset: 0,
        length: head.encode_utf16().count(),
        ..Default::default()
    }];
    message
}
