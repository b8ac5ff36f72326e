//! The long-polling runtime.
//!
//! [`StageRuntime`] pulls batches from `getUpdates` and feeds every update
//! through [`Stage::run`], one at a time and in order. The offset always
//! advances past the updates it has seen, whether their dispatch succeeded
//! or not, so an update is never delivered twice.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use telestage_runtime::StageRuntime;
//!
//! // Loads telestage.toml / TELESTAGE_* / BOT_TOKEN, sets up logging and
//! // the HTTP transport.
//! let runtime = StageRuntime::builder().build(stage)?;
//!
//! // Runs until Ctrl+C or SIGTERM.
//! runtime.run().await?;
//! ```
//!
//! # Failure Handling
//!
//! - `SceneNotFound` from a dispatch is logged at `warn` and the loop moves on.
//! - A failed `getUpdates` call is logged at `error`; the loop sleeps for
//!   `polling.error_pause_ms` and polls again from the same offset.

use std::future::Future;
use std::sync::Arc;

use tokio::signal;
use tracing::{debug, error, info, warn};

use telestage_core::{ApiResult, BoxedBot, GetUpdates, Update};
use telestage_framework::Stage;

use crate::config::PollingConfig;
#[cfg(feature = "http-client")]
use crate::config::{ConfigLoader, TelestageConfig, validate_config};
use crate::error::RuntimeResult;

/// Drives a [`Stage`] from a long-polling update source.
pub struct StageRuntime {
    bot: BoxedBot,
    stage: Arc<Stage>,
    polling: PollingConfig,
}

impl StageRuntime {
    /// Creates a runtime around an existing transport handle.
    pub fn new(bot: BoxedBot, stage: impl Into<Arc<Stage>>, polling: PollingConfig) -> Self {
        Self {
            bot,
            stage: stage.into(),
            polling,
        }
    }

    /// Creates a runtime builder that loads configuration.
    #[cfg(feature = "http-client")]
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from a loaded configuration.
    ///
    /// Validates the configuration, initializes logging from it and builds
    /// the HTTP transport.
    #[cfg(feature = "http-client")]
    pub fn from_config(
        config: &TelestageConfig,
        stage: impl Into<Arc<Stage>>,
    ) -> RuntimeResult<Self> {
        use telestage_transport::HttpBot;

        validate_config(config)?;
        crate::logging::init_from_config(&config.logging);

        let bot = HttpBot::with_options(
            config.bot.token.clone(),
            config.bot.api_url.clone(),
            config.bot.request_timeout(),
        )?;

        info!(
            bot_id = %telestage_core::Bot::id(&bot),
            api_url = %config.bot.api_url,
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Ok(Self::new(Arc::new(bot), stage, config.polling.clone()))
    }

    pub fn bot(&self) -> &BoxedBot {
        &self.bot
    }

    pub fn stage(&self) -> &Arc<Stage> {
        &self.stage
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    /// Runs until Ctrl+C or SIGTERM.
    pub async fn run(&self) -> RuntimeResult<()> {
        info!("Telestage runtime is now running. Press Ctrl+C to stop.");
        self.run_until(shutdown_signal()).await
    }

    /// Runs until `shutdown` completes.
    ///
    /// Shutdown interrupts a pending `getUpdates` call or error pause, but
    /// never a dispatch in progress.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset = 0;

        info!(bot_id = %self.bot.id(), stages = self.stage.len(), "Polling for updates");

        loop {
            let fetched = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                fetched = self.fetch(offset) => fetched,
            };

            match fetched {
                Ok(updates) => offset = self.dispatch_batch(offset, updates).await,
                Err(err) => {
                    error!(error = %err, offset, "Failed to fetch updates");
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(self.polling.error_pause()) => {}
                    }
                }
            }
        }

        info!("Polling stopped");
        Ok(())
    }

    /// Fetches one batch and dispatches it, returning the next offset.
    pub async fn poll_once(&self, offset: i64) -> ApiResult<i64> {
        let updates = self.fetch(offset).await?;
        Ok(self.dispatch_batch(offset, updates).await)
    }

    async fn fetch(&self, offset: i64) -> ApiResult<Vec<Update>> {
        let request = GetUpdates {
            offset,
            limit: self.polling.limit,
            timeout: self.polling.timeout_secs,
            allowed_updates: self.polling.allowed_updates.clone(),
        };
        let updates = self.bot.get_updates(&request).await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), offset, "Received updates");
        }
        Ok(updates)
    }

    async fn dispatch_batch(&self, mut offset: i64, updates: Vec<Update>) -> i64 {
        for update in updates {
            let update_id = update.update_id;
            offset = offset.max(update_id + 1);

            if let Err(err) = self.stage.run(Arc::clone(&self.bot), update).await {
                warn!(update_id, error = %err, "Update dropped");
            }
        }
        offset
    }
}

impl std::fmt::Debug for StageRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRuntime")
            .field("bot", &self.bot.id())
            .field("stage", &self.stage)
            .field("polling", &self.polling)
            .finish()
    }
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {
                        info!("Received Ctrl+C, shutting down");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down");
                    }
                }
                return;
            }
            Err(err) => warn!(error = %err, "Failed to register SIGTERM handler"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(err) => error!(error = %err, "Failed to listen for Ctrl+C, shutting down"),
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`StageRuntime`] from configuration.
///
/// ```rust,ignore
/// let runtime = StageRuntime::builder()
///     .config_file("config/telestage.toml")
///     .profile("production")
///     .build(stage)?;
/// ```
#[cfg(feature = "http-client")]
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

#[cfg(feature = "http-client")]
impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Enables loading environment variables (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: TelestageConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self, stage: impl Into<Arc<Stage>>) -> RuntimeResult<StageRuntime> {
        let config = self.config_loader.load()?;
        StageRuntime::from_config(&config, stage)
    }
}

#[cfg(feature = "http-client")]
impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
