//! Matchers: a predicate paired with a composed handler.
//!
//! A [`Matcher`] is created by one of the [`Scene`](crate::Scene) registration
//! methods and is immutable afterwards. The predicate only looks at the
//! [`Context`]; the handler already has all middleware applied.
//!
//! The built-in predicates used by those registration methods are exposed
//! here as well, so custom predicates can combine them:
//!
//! ```rust,ignore
//! let photo_or_sticker = {
//!     let (photo, sticker) = (is_photo(), is_sticker());
//!     move |ctx: &Context| photo(ctx) || sticker(ctx)
//! };
//! scene.on(photo_or_sticker, handler(media));
//! ```

use std::sync::Arc;

use crate::context::Context;
use crate::handler::{BoxFuture, EventFn};

/// A type-erased predicate over the dispatch context.
pub type Predicate = Arc<dyn Fn(&Context) -> bool + Send + Sync>;

/// A registered `(predicate, handler)` pair.
#[derive(Clone)]
pub struct Matcher {
    name: String,
    predicate: Predicate,
    handler: EventFn,
}

impl Matcher {
    /// Creates a matcher. `name` is only used in logs.
    pub fn new(name: impl Into<String>, predicate: Predicate, handler: EventFn) -> Self {
        Self {
            name: name.into(),
            predicate,
            handler,
        }
    }

    /// Returns the matcher's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this matcher accepts the context.
    pub fn matches(&self, ctx: &Context) -> bool {
        (self.predicate)(ctx)
    }

    /// Returns the composed handler.
    pub fn handler(&self) -> &EventFn {
        &self.handler
    }

    /// Runs the composed handler.
    pub fn call(&self, ctx: Arc<Context>) -> BoxFuture<'static, ()> {
        (self.handler)(ctx)
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Built-in predicates
// =============================================================================

/// Accepts a direct message whose command equals `name`.
///
/// The message must actually be a command. Routers that parse plain text as
/// the empty command let `on_command("")` catch every text message; this one
/// does not, so an empty `name` never matches plain text.
pub fn is_command(name: impl Into<String>) -> Predicate {
    let name = name.into();
    Arc::new(move |ctx: &Context| {
        ctx.update()
            .message
            .as_ref()
            .is_some_and(|message| message.is_command() && message.command() == name)
    })
}

/// Accepts any direct message.
pub fn is_message() -> Predicate {
    Arc::new(|ctx: &Context| ctx.update().message.is_some())
}

/// Accepts an update whose normalised message has at least one photo size.
pub fn is_photo() -> Predicate {
    Arc::new(|ctx: &Context| ctx.message().is_some_and(|message| !message.photo.is_empty()))
}

/// Accepts an update whose normalised message has a sticker.
pub fn is_sticker() -> Predicate {
    Arc::new(|ctx: &Context| ctx.message().is_some_and(|message| message.sticker.is_some()))
}
