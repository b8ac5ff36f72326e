use serde::{Deserialize, Serialize};

use super::member::{ChatJoinRequest, ChatMemberUpdated};
use super::message::Message;
use super::query::{CallbackQuery, InlineQuery, PollAnswer, PreCheckoutQuery, ShippingQuery};

/// One inbound update as delivered by the Bot API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_query: Option<InlineQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_query: Option<ShippingQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_checkout_query: Option<PreCheckoutQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_answer: Option<PollAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_chat_member: Option<ChatMemberUpdated>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_member: Option<ChatMemberUpdated>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_join_request: Option<ChatJoinRequest>,
}

impl Update {
    /// Returns the name of the first payload present, for logging.
    pub fn kind(&self) -> &'static str {
        if self.message.is_some() {
            "message"
        } else if self.edited_message.is_some() {
            "edited_message"
        } else if self.channel_post.is_some() {
            "channel_post"
        } else if self.edited_channel_post.is_some() {
            "edited_channel_post"
        } else if self.callback_query.is_some() {
            "callback_query"
        } else if self.inline_query.is_some() {
            "inline_query"
        } else if self.shipping_query.is_some() {
            "shipping_query"
        } else if self.pre_checkout_query.is_some() {
            "pre_checkout_query"
        } else if self.poll_answer.is_some() {
            "poll_answer"
        } else if self.my_chat_member.is_some() {
            "my_chat_member"
        } else if self.chat_member.is_some() {
            "chat_member"
        } else if self.chat_join_request.is_some() {
            "chat_join_request"
        } else {
            "unknown"
        }
    }
}
