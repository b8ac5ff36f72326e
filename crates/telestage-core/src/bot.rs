//! The transport handle passed through every dispatch.
//!
//! A [`Bot`] is the only way handlers talk back to the messaging platform.
//! Implementations provide [`call_api`](Bot::call_api); the typed helpers are
//! default methods built on top of it, so a test double only needs one method.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::trace;

use crate::error::ApiResult;
use crate::model::{GetUpdates, Message, Update, User};

/// The core Bot trait.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct Recorder;
///
/// #[async_trait]
/// impl Bot for Recorder {
///     fn id(&self) -> &str { "recorder" }
///
///     async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value> {
///         println!("{method}: {params}");
///         Ok(Value::Null)
///     }
///
///     fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> { self }
/// }
/// ```
#[async_trait]
pub trait Bot: Send + Sync + 'static {
    /// Returns the bot's identifier.
    fn id(&self) -> &str;

    /// Calls a Bot API method with JSON parameters and returns its `result`.
    async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value>;

    /// Sends a plain text message to a chat.
    async fn send_text(&self, chat_id: i64, text: &str) -> ApiResult<Message> {
        trace!(chat_id, "Sending text message");
        let result = self
            .call_api("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Fetches pending updates (long polling).
    async fn get_updates(&self, request: &GetUpdates) -> ApiResult<Vec<Update>> {
        let result = self
            .call_api("getUpdates", serde_json::to_value(request)?)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Returns the bot's own user.
    async fn get_me(&self) -> ApiResult<User> {
        let result = self.call_api("getMe", json!({})).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Returns self as an `Arc<dyn Any>` so callers can downcast to the concrete
    /// handle. Implementors should simply return `self`.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A shared Bot trait object.
pub type BoxedBot = Arc<dyn Bot>;
