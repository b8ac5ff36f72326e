//! Configuration for the Telestage runtime.
//!
//! Settings are layered with figment: built-in defaults, then a
//! `telestage.toml` file, then `TELESTAGE_*` environment variables, then
//! programmatic overrides. See [`ConfigLoader`] for the details.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, PollingConfig, SpanEventConfig,
    TelestageConfig,
};
pub use validation::validate_config;
