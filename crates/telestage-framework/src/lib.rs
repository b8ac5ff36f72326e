//! # Telestage Framework
//!
//! A finite-state router for bot updates.
//!
//! This layer provides:
//! - [`Context`]: the per-dispatch view over one update, with normalised
//!   message/sender/chat accessors and a typed key/value store
//! - [`EventFn`] handlers and [`Middleware`] decorators, composed with
//!   [`apply_middleware`]
//! - [`Scene`]: ordered matchers for one conversational state
//! - [`Stage`]: maps state names to scenes and dispatches each update to the
//!   scene of the state its resolver returns
//! - [`StageService`]: a `tower::Service` wrapper around a stage
//!
//! Where a user currently is lives outside the stage; the resolver reads it
//! and handlers change it.

pub mod context;
pub mod error;
pub mod handler;
pub mod matcher;
pub mod scene;
pub mod service;
pub mod stage;

#[cfg(test)]
pub(crate) mod test_utils;

pub use context::Context;
pub use error::{StageError, StageResult, StoreError, StoreResult};
pub use handler::{
    BoxFuture, EventFn, Middleware, apply_middleware, handler, middleware, middleware_fn,
};
pub use matcher::{Matcher, Predicate, is_command, is_message, is_photo, is_sticker};
pub use scene::Scene;
pub use service::StageService;
pub use stage::{Stage, StateResolver};
