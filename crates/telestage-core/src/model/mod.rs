//! Bot API update model.
//!
//! # Hierarchy
//!
//! ```text
//! Update { update_id }
//! ├── message / edited_message / channel_post / edited_channel_post  → Message
//! │   └── Message { from: User, chat: Chat, pinned_message: Message, … }
//! ├── callback_query      → CallbackQuery { from, message }
//! ├── inline_query        → InlineQuery { from }
//! ├── shipping_query      → ShippingQuery { from }
//! ├── pre_checkout_query  → PreCheckoutQuery { from }
//! ├── poll_answer         → PollAnswer { user }
//! ├── my_chat_member      → ChatMemberUpdated { chat, from }
//! ├── chat_member         → ChatMemberUpdated { chat, from }
//! └── chat_join_request   → ChatJoinRequest { chat, from }
//! ```
//!
//! Every payload on [`Update`] is optional. The platform sends exactly one per
//! update, but nothing here relies on that.

mod member;
mod message;
mod query;
mod request;
mod update;
mod user;

pub use member::{ChatJoinRequest, ChatMember, ChatMemberUpdated};
pub use message::{Message, MessageEntity, PhotoSize, Sticker};
pub use query::{CallbackQuery, InlineQuery, PollAnswer, PreCheckoutQuery, ShippingQuery};
pub use request::GetUpdates;
pub use update::Update;
pub use user::{Chat, User};
