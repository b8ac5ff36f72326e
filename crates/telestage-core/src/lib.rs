//! # Telestage Core
//!
//! Foundation types shared by every Telestage crate:
//!
//! - **Update model** ([`model`]): the inbound Bot API update and its nested
//!   message, user, chat and query shapes, deserialised straight from JSON.
//! - **Transport handle** ([`Bot`]): the object handed to every dispatch, able to
//!   call Bot API methods and send text replies.
//! - **Errors** ([`ApiError`], [`TransportError`]): failures surfaced by a transport.
//!
//! The core owns no I/O. Concrete transports live in `telestage-transport`, and
//! routing lives in `telestage-framework`.

pub mod bot;
pub mod error;
pub mod model;

pub use bot::{Bot, BoxedBot};
pub use error::{ApiError, ApiResult, TransportError, TransportResult};
pub use model::{
    CallbackQuery, Chat, ChatJoinRequest, ChatMember, ChatMemberUpdated, GetUpdates,
    InlineQuery, Message, MessageEntity, PhotoSize, PollAnswer, PreCheckoutQuery, ShippingQuery,
    Sticker, Update, User,
};
