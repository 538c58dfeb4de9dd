//! Structured logging setup.
//!
//! [`build`] turns a [`LogConfig`] into an owned [`Dispatch`]; [`init`] installs
//! one as the process-wide default and bridges `log` records emitted by the
//! database driver.

use std::str::FromStr;

use thiserror::Error;
use tracing::{level_filters::LevelFilter, Dispatch, Level};
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    EnvFilter, Layer, Registry,
};

use crate::config::{Environment, LogConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("unsupported log format: {0}")]
    UnsupportedFormat(String),

    #[error("logger already initialized")]
    AlreadyInitialized,

    /// The tracing logger is installed but `log` records are not forwarded
    #[error("log bridge not installed: {0}")]
    LogBridge(String),
}

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Console,
}

impl LogFormat {
    /// Resolve a configured format; empty picks json in production and
    /// console in development.
    pub fn resolve(format: &str, environment: Environment) -> Result<Self, LogError> {
        if format.is_empty() {
            return Ok(match environment {
                Environment::Production => LogFormat::Json,
                Environment::Development => LogFormat::Console,
            });
        }
        format.parse()
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "console" => Ok(LogFormat::Console),
            _ => Err(LogError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Parse a level name, defaulting to `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::default().add_directive(LevelFilter::from_level(parse_level(level)).into())
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Build a dispatcher writing to `writer` at the configured level.
pub fn build<W>(config: &LogConfig, writer: W) -> Result<Dispatch, LogError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    build_with_filter(config, writer, level_filter(&config.level))
}

fn build_with_filter<W>(config: &LogConfig, writer: W, filter: EnvFilter) -> Result<Dispatch, LogError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let format = LogFormat::resolve(&config.format, config.environment)?;
    let development = config.environment == Environment::Development;

    let layer: BoxedLayer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(config.stack)
            .with_span_list(config.stack)
            .with_file(config.caller)
            .with_line_number(config.caller)
            .with_thread_names(development)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Console if config.stack => fmt::layer()
            .with_ansi(development)
            .with_file(config.caller)
            .with_line_number(config.caller)
            .with_thread_names(development)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Console => fmt::layer()
            .compact()
            .with_ansi(development)
            .with_file(config.caller)
            .with_line_number(config.caller)
            .with_thread_names(development)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
    };

    Ok(Dispatch::new(tracing_subscriber::registry().with(layer)))
}

/// Install the stdout logger as the global default.
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
pub fn init(config: &LogConfig) -> Result<Dispatch, LogError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level));
    let dispatch = build_with_filter(config, std::io::stdout, filter)?;

    tracing::dispatcher::set_global_default(dispatch.clone())
        .map_err(|_| LogError::AlreadyInitialized)?;
    tracing_log::LogTracer::init().map_err(|e| LogError::LogBridge(e.to_string()))?;

    tracing::debug!(
        environment = %config.environment,
        level = %config.level,
        format = ?LogFormat::resolve(&config.format, config.environment),
        "logger initialized"
    );

    Ok(dispatch)
}
