//! Per-dispatch context handed to predicates, middleware and handlers.
//!
//! One [`Context`] is built for every call to [`Stage::run`](crate::Stage::run)
//! and dropped when it returns. It carries:
//!
//! - the transport handle that delivered the update ([`Context::bot`]),
//! - the raw update ([`Context::update`]) and normalised views over it
//!   ([`message`](Context::message), [`sender`](Context::sender),
//!   [`chat`](Context::chat), [`text`](Context::text)),
//! - a string-keyed store that middleware uses to hand values to handlers.
//!
//! # Resolution order
//!
//! An update carries its payload in one of several optional fields. The
//! accessors pick the first one present, in a fixed order:
//!
//! | Accessor  | Order |
//! |-----------|-------|
//! | `message` | message, callback query message, edited message, channel post (its pinned message if any), edited channel post |
//! | `sender`  | callback query, `message()` sender, inline query, shipping query, pre-checkout query, poll answer, my chat member, chat member, join request |
//! | `chat`    | message, `message()` chat, my chat member, chat member, join request |
//!
//! # Example
//!
//! ```rust,ignore
//! scene.on_message(handler(|ctx: Arc<Context>| async move {
//!     let text = ctx.text().to_owned();
//!     if let Err(err) = ctx.reply(&text).await {
//!         tracing::warn!(%err, "Echo failed");
//!     }
//! }));
//! ```

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use telestage_core::{ApiError, ApiResult, Bot, BoxedBot, Chat, Message, Update, User};

use crate::error::{StoreError, StoreResult};

struct StoredValue {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// The context of one dispatch.
pub struct Context {
    bot: BoxedBot,
    update: Update,
    store: RwLock<HashMap<String, StoredValue>>,
}

impl Context {
    /// Creates a context with an empty store.
    pub fn new(bot: BoxedBot, update: Update) -> Self {
        Self {
            bot,
            update,
            store: RwLock::new(HashMap::new()),
        }
    }

    // ─── Handle and update ───────────────────────────────────────────────────

    /// Returns the transport handle that delivered this update.
    pub fn bot(&self) -> &BoxedBot {
        &self.bot
    }

    /// Downcasts the transport handle to a concrete type.
    pub fn bot_as<B: Bot>(&self) -> Option<Arc<B>> {
        Arc::clone(&self.bot).as_any().downcast::<B>().ok()
    }

    /// Returns the update as delivered.
    pub fn update(&self) -> &Update {
        &self.update
    }

    // ─── Normalised views ────────────────────────────────────────────────────

    /// Returns the message this update is about, if any.
    ///
    /// A callback query decides the result on its own: when the button's
    /// message is no longer available this returns `None` even if other
    /// fields are set.
    pub fn message(&self) -> Option<&Message> {
        let update = &self.update;
        if let Some(message) = &update.message {
            return Some(message);
        }
        if let Some(query) = &update.callback_query {
            return query.message.as_ref();
        }
        if let Some(message) = &update.edited_message {
            return Some(message);
        }
        if let Some(post) = &update.channel_post {
            return Some(post.pinned_message.as_deref().unwrap_or(post));
        }
        update.edited_channel_post.as_ref()
    }

    /// Returns the user who caused this update, if any.
    pub fn sender(&self) -> Option<&User> {
        let update = &self.update;
        if let Some(query) = &update.callback_query {
            return Some(&query.from);
        }
        if let Some(message) = self.message() {
            return message.from.as_ref();
        }
        if let Some(query) = &update.inline_query {
            return Some(&query.from);
        }
        if let Some(query) = &update.shipping_query {
            return Some(&query.from);
        }
        if let Some(query) = &update.pre_checkout_query {
            return Some(&query.from);
        }
        if let Some(answer) = &update.poll_answer {
            return answer.user.as_ref();
        }
        if let Some(member) = &update.my_chat_member {
            return Some(&member.from);
        }
        if let Some(member) = &update.chat_member {
            return Some(&member.from);
        }
        update.chat_join_request.as_ref().map(|request| &request.from)
    }

    /// Returns the chat this update belongs to, if any.
    pub fn chat(&self) -> Option<&Chat> {
        let update = &self.update;
        if let Some(message) = &update.message {
            return Some(&message.chat);
        }
        if let Some(message) = self.message() {
            return Some(&message.chat);
        }
        if let Some(member) = &update.my_chat_member {
            return Some(&member.chat);
        }
        if let Some(member) = &update.chat_member {
            return Some(&member.chat);
        }
        update.chat_join_request.as_ref().map(|request| &request.chat)
    }

    /// Returns the chat id, falling back to the sender's id.
    ///
    /// `None` when the update has neither a chat nor a sender; there is
    /// nowhere to reply in that case.
    pub fn chat_id(&self) -> Option<i64> {
        self.chat()
            .map(|chat| chat.id)
            .or_else(|| self.sender().map(|user| user.id))
    }

    /// Returns the message caption if non-empty, else its text, else `""`.
    pub fn text(&self) -> &str {
        let Some(message) = self.message() else {
            return "";
        };
        match message.caption.as_deref() {
            Some(caption) if !caption.is_empty() => caption,
            _ => message.text.as_deref().unwrap_or(""),
        }
    }

    /// Sends `text` to [`chat_id`](Self::chat_id).
    ///
    /// Transport errors are returned as-is. Fails with
    /// [`ApiError::MissingChat`] without touching the transport when there is
    /// no chat to reply to.
    pub async fn reply(&self, text: &str) -> ApiResult<Message> {
        let chat_id = self.chat_id().ok_or(ApiError::MissingChat)?;
        self.bot.send_text(chat_id, text).await
    }

    // ─── Store ───────────────────────────────────────────────────────────────

    /// Stores a value under `key`, replacing any previous value.
    pub fn set<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.store.write().insert(
            key.into(),
            StoredValue {
                value: Box::new(value),
                type_name: type_name::<T>(),
            },
        );
    }

    /// Returns a clone of the value under `key`.
    ///
    /// `Ok(None)` when nothing is stored; [`StoreError::TypeMismatch`] when
    /// the stored value is not a `T`.
    pub fn get<T: Clone + 'static>(&self, key: &str) -> StoreResult<Option<T>> {
        let store = self.store.read();
        let Some(stored) = store.get(key) else {
            return Ok(None);
        };
        stored
            .value
            .downcast_ref::<T>()
            .cloned()
            .map(Some)
            .ok_or_else(|| StoreError::TypeMismatch {
                key: key.to_owned(),
                expected: type_name::<T>(),
                found: stored.type_name,
            })
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.store.read().contains_key(key)
    }

    /// Removes the value under `key`, returning whether one was present.
    pub fn remove(&self, key: &str) -> bool {
        self.store.write().remove(key).is_some()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("bot", &self.bot.id())
            .field("update_id", &self.update.update_id)
            .field("stored_keys", &self.store.read().len())
            .finish()
    }
}
