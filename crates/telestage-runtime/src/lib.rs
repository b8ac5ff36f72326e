//! Telestage Runtime - hosting layer for a Telestage [`Stage`](telestage_framework::Stage).
//!
//! This crate provides:
//! - Configuration loading (`ConfigLoader`, figment: defaults, files, env)
//! - Logging configuration (`LoggingBuilder`)
//! - The long-polling update loop (`StageRuntime`) with graceful shutdown
//!
//! ```ignore
//! use telestage_runtime::StageRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = StageRuntime::builder().build(build_stage())?;
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: `telestage.toml` files
//! - `yaml-config`: `telestage.yaml` files
//! - `json-log`: JSON log format
//! - `http-client`: builds the HTTP transport from configuration
//!   ([`StageRuntime::builder`])

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    BotConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig, PollingConfig,
    TelestageConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, init_from_config};
#[cfg(feature = "http-client")]
pub use runtime::RuntimeBuilder;
pub use runtime::{StageRuntime, shutdown_signal};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports of the logging macros.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
