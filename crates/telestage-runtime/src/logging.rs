//! Subscriber setup for the runtime.
//!
//! Dispatch logging is built around the `dispatch` span that
//! [`Stage::run`](telestage_framework::Stage::run) opens for every update.
//! The span carries `update_id`, `kind` and `state`, so a filter can select
//! one conversation state:
//!
//! ```toml
//! [logging]
//! level = "info"
//! trace_states = ["checkout"]
//! span_events = { close = true }
//! ```
//!
//! logs every matcher decision for updates routed to `checkout`, plus one
//! closing line per dispatch with its busy and idle time. The HTTP stack
//! below `telestage_transport` is held at `warn` unless a `filters` entry
//! says otherwise.
//!
//! `RUST_LOG`, when set, replaces the configured base level.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig, SpanEventConfig};

/// Name of the span opened around each dispatch.
pub const DISPATCH_SPAN: &str = "dispatch";

/// Crates under the HTTP transport that are quiet unless asked for.
const TRANSPORT_DEPS: &[&str] = &["hyper", "hyper_util", "reqwest"];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber described by `config`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    if let Err(err) = LoggingBuilder::from_config(config).try_init() {
        tracing::debug!(error = %err, "Global subscriber already set");
    }
}

/// Filter directive that traces every dispatch routed to `state`.
pub fn state_directive(state: &str) -> String {
    format!("[{DISPATCH_SPAN}{{state={state}}}]=trace")
}

fn fmt_span(events: &SpanEventConfig) -> FmtSpan {
    [
        (events.new, FmtSpan::NEW),
        (events.enter, FmtSpan::ENTER),
        (events.exit, FmtSpan::EXIT),
        (events.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |acc, (_, span)| acc | span)
}

/// Builds and installs the runtime's `tracing` subscriber.
///
/// ```rust,ignore
/// LoggingBuilder::new()
///     .level(Level::DEBUG)
///     .trace_state("checkout")
///     .time_dispatches()
///     .init();
/// ```
#[derive(Debug)]
pub struct LoggingBuilder {
    level: Level,
    filters: Vec<String>,
    states: Vec<String>,
    span_events: FmtSpan,
    format: LogFormat,
    output: LogOutput,
    file_path: Option<PathBuf>,
    thread_ids: bool,
    file_location: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Compact lines on stdout at `info`.
    pub fn new() -> Self {
        Self {
            level: Level::INFO,
            filters: Vec::new(),
            states: Vec::new(),
            span_events: FmtSpan::NONE,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            thread_ids: false,
            file_location: false,
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut filters: Vec<_> = config.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));

        Self {
            level: config.level.to_tracing_level(),
            filters: filters
                .into_iter()
                .map(|(target, level)| format!("{target}={level}"))
                .collect(),
            states: config.trace_states.clone(),
            span_events: fmt_span(&config.span_events),
            format: config.format,
            output: config.output,
            file_path: config.file_path.clone(),
            thread_ids: config.thread_ids,
            file_location: config.file_location,
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Adds a raw filter directive such as `telestage_runtime=debug`.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.filters.push(directive.into());
        self
    }

    /// Traces every dispatch whose resolved state is `state`.
    pub fn trace_state(mut self, state: impl Into<String>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Logs one line per finished dispatch with its timings.
    pub fn time_dispatches(mut self) -> Self {
        self.span_events = self.span_events | FmtSpan::CLOSE;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sends output to `path` instead of stdout.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = LogOutput::File;
        self.file_path = Some(path.into());
        self
    }

    /// Directives added on top of the base level, lowest precedence first.
    pub fn directives(&self) -> Vec<String> {
        TRANSPORT_DEPS
            .iter()
            .map(|target| format!("{target}=warn"))
            .chain(self.filters.iter().cloned())
            .chain(self.states.iter().map(|state| state_directive(state)))
            .collect()
    }

    fn build_filter(&self) -> EnvFilter {
        let base = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()));

        self.directives()
            .iter()
            .fold(base, |filter, directive| match directive.parse() {
                Ok(parsed) => filter.add_directive(parsed),
                Err(err) => {
                    eprintln!("Ignoring log directive {directive:?}: {err}");
                    filter
                }
            })
    }

    fn fmt_layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_span_events(self.span_events.clone())
            .with_thread_ids(self.thread_ids)
            .with_file(self.file_location)
            .with_line_number(self.file_location);

        match self.format {
            LogFormat::Full => layer.boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
            _ => layer.compact().boxed(),
        }
    }

    fn output_layer(&self) -> BoxedLayer {
        match (self.output, &self.file_path) {
            (LogOutput::Stderr, _) => self.fmt_layer(std::io::stderr),
            (LogOutput::File, Some(path)) => self.fmt_layer(tracing_appender::rolling::never(
                path.parent().unwrap_or_else(|| Path::new(".")),
                path.file_name().unwrap_or_else(|| OsStr::new("telestage.log")),
            )),
            // A file output without a path is rejected by validation.
            (LogOutput::Stdout, _) | (LogOutput::File, None) => self.fmt_layer(std::io::stdout),
        }
    }

    /// Installs the subscriber, ignoring an already installed one.
    pub fn init(self) {
        let _ = self.try_init();
    }

    pub fn try_init(self) -> Result<(), TryInitError> {
        tracing_subscriber::registry()
            .with(self.output_layer())
            .with(self.build_filter())
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn span_event_config_maps_to_fmt_span() {
        assert_eq!(fmt_span(&SpanEventConfig::default()), FmtSpan::NONE);

        let lifecycle = SpanEventConfig {
            new: true,
            close: true,
            ..Default::default()
        };
        assert_eq!(fmt_span(&lifecycle), FmtSpan::NEW | FmtSpan::CLOSE);

        let all = SpanEventConfig {
            new: true,
            enter: true,
            exit: true,
            close: true,
        };
        assert_eq!(fmt_span(&all), FmtSpan::FULL);
    }

    #[test]
    fn state_directive_targets_dispatch_span() {
        assert_eq!(state_directive("main"), "[dispatch{state=main}]=trace");
        assert!(state_directive("main").parse::<tracing_subscriber::filter::Directive>().is_ok());
    }

    #[test]
    fn config_filters_override_transport_defaults() {
        let mut config = LoggingConfig {
            level: LogLevel::Debug,
            trace_states: vec!["checkout".into()],
            ..Default::default()
        };
        config.filters.insert("reqwest".into(), LogLevel::Debug);
        config.filters.insert("hyper".into(), LogLevel::Error);

        let builder = LoggingBuilder::from_config(&config);

        assert_eq!(builder.level, Level::DEBUG);
        assert_eq!(
            builder.directives(),
            [
                "hyper=warn",
                "hyper_util=warn",
                "reqwest=warn",
                "hyper=error",
                "reqwest=debug",
                "[dispatch{state=checkout}]=trace",
            ]
        );
    }

    #[test]
    fn builder_collects_states_and_timing() {
        let builder = LoggingBuilder::new()
            .level(Level::WARN)
            .trace_state("main")
            .directive("telestage_runtime=debug")
            .time_dispatches()
            .file("logs/bot.log");

        assert_eq!(builder.span_events, FmtSpan::CLOSE);
        assert_eq!(builder.output, LogOutput::File);
        assert_eq!(builder.file_path, Some(PathBuf::from("logs/bot.log")));
        assert_eq!(
            builder.directives()[3..],
            ["telestage_runtime=debug", "[dispatch{state=main}]=trace"]
        );
    }

    #[test]
    fn config_copies_output_settings() {
        let config = LoggingConfig {
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
            thread_ids: true,
            file_location: true,
            ..Default::default()
        };

        let builder = LoggingBuilder::from_config(&config);

        assert_eq!(builder.format, LogFormat::Pretty);
        assert_eq!(builder.output, LogOutput::Stderr);
        assert!(builder.thread_ids && builder.file_location);
    }
}
