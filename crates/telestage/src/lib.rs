//! # Telestage
//!
//! A finite-state scene router for Telegram bots.
//!
//! ## Overview
//!
//! A conversation is split into named states. Each state has a [`Scene`]
//! holding ordered matchers; the [`Stage`] asks a resolver for the current
//! state of every update and runs the first matching handler of that scene.
//! Where a user currently is stays in the host's hands: the resolver reads it,
//! handlers write it.
//!
//! ```text
//! ┌─────────────┐  update  ┌─────────┐ resolver(ctx) ┌──────────────┐ first match ┌─────────┐
//! │   Runtime   │─────────▶│  Stage  │──────────────▶│ Scene "main" │────────────▶│ Handler │
//! │ (getUpdates)│          │         │               └──────────────┘             └─────────┘
//! └─────────────┘          └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use telestage::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut main = Scene::new();
//!     main.on_start(handler(|ctx: Arc<Context>| async move {
//!         let _ = ctx.reply("Hello world").await;
//!     }));
//!
//!     let stage = Stage::new(|_: &Context| "main".to_string()).with("main", main);
//!
//!     StageRuntime::builder().build(stage)?.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `http-client` *(default)*: HTTP Bot API transport and `StageRuntime::builder`
//! - `toml-config` *(default)*: `telestage.toml` configuration files
//! - `yaml-config`: `telestage.yaml` configuration files
//! - `json-log`: JSON log output

pub use telestage_core as core;
pub use telestage_framework as framework;
pub use telestage_runtime as runtime;
pub use telestage_transport as transport;

pub use telestage_framework::{Context, Scene, Stage};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use telestage::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    // Routing
    pub use telestage_framework::{
        Context, EventFn, Middleware, Scene, Stage, StageError, StoreError, apply_middleware,
        handler, middleware, middleware_fn,
    };

    // Runtime
    pub use telestage_runtime::{StageRuntime, TelestageConfig};

    #[cfg(feature = "http-client")]
    pub use telestage_transport::HttpBot;

    // Bot handle and update model
    pub use telestage_core::{ApiError, Bot, BoxedBot, Chat, Message, Update, User};
}
