//! Logging infrastructure - structured tracing for the native side
//!
//! Uses `tracing` with a `tracing-subscriber` registry. Nothing is installed
//! until [`init`] or [`init_logging`] runs, so a host that brings its own
//! subscriber keeps it. Events emitted by the renderer:
//! - `trace` per rendered call (argument count, required length)
//! - `debug` when the caller buffer is too small
//! - `warn` for unrendered type codes and rejected payloads

use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Guard kept alive for logging started through [`init`]
static GLOBAL_GUARD: OnceCell<Option<WorkerGuard>> = OnceCell::new();

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with timestamps
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// File with daily rotation
    File { directory: String, prefix: String },
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Whether to include span events
    pub span_events: bool,
    /// Extra filter directives (e.g., "vararg_native=trace")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // VARARG_NATIVE_LOG_LEVEL: trace, debug, info, warn, error
        if let Some(level) = lookup("VARARG_NATIVE_LOG_LEVEL") {
            config.level = parse_level(&level).unwrap_or(Level::INFO);
        }

        // VARARG_NATIVE_LOG_FILE: directory for daily rotated files
        if let Some(directory) = lookup("VARARG_NATIVE_LOG_FILE") {
            config.output = LogOutput::File {
                directory,
                prefix: "vararg_native".to_string(),
            };
        }

        if lookup("VARARG_NATIVE_LOG_JSON").is_some() {
            config.format = LogFormat::Json;
        }

        config
    }
}

fn parse_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Install a global subscriber for `config`
///
/// Returns the writer guard; logs are flushed when it drops. Returns `None`
/// if a global subscriber was already installed. A file output whose
/// directory cannot be used falls back to stderr.
pub fn init_logging(config: LogConfig) -> Option<WorkerGuard> {
    let filter = build_filter(&config);
    let span_events = span_events_config(config.span_events);

    let mut unusable_file = None;
    let (writer, guard) = match &config.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutput::File { directory, prefix } => match file_appender(directory, prefix) {
            Ok(appender) => tracing_appender::non_blocking(appender),
            Err(error) => {
                unusable_file = Some((directory.clone(), error));
                tracing_appender::non_blocking(std::io::stderr())
            }
        },
    };

    let layer = fmt::layer().with_writer(writer).with_span_events(span_events);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Pretty => layer.pretty().with_filter(filter).boxed(),
        LogFormat::Compact => layer.compact().with_filter(filter).boxed(),
        LogFormat::Json => layer.json().with_filter(filter).boxed(),
    };

    let installed = tracing_subscriber::registry().with(layer).try_init().is_ok();

    if let Some((directory, error)) = unusable_file {
        tracing::warn!(%directory, %error, "log directory unusable, logging to stderr");
    }

    installed.then_some(guard)
}

/// Daily rotated appender, without panicking on a bad directory
fn file_appender(directory: &str, prefix: &str) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .build(directory)
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let base_filter = EnvFilter::from_default_env().add_directive(config.level.into());

    match &config.filter {
        Some(filter_str) => filter_str.split(',').fold(base_filter, |filter, directive| {
            filter.add_directive(directive.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid filter directive: {}", directive);
                config.level.into()
            }))
        }),
        None => base_filter,
    }
}

fn span_events_config(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// Initialise logging from the environment, once per process
pub fn init() {
    GLOBAL_GUARD.get_or_init(|| init_logging(LogConfig::from_env()));
}

/// Check if [`init`] has run
pub fn is_initialized() -> bool {
    GLOBAL_GUARD.get().is_some()
}

/// Log to a rotating JSON file in `log_dir`
pub fn init_file_logging(log_dir: impl AsRef<Path>) -> Option<WorkerGuard> {
    init_logging(
        LogConfig::new()
            .with_format(LogFormat::Json)
            .with_output(LogOutput::File {
                directory: log_dir.as_ref().to_string_lossy().to_string(),
                prefix: "vararg_native".to_string(),
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LogConfig::new()
            .with_level(Level::DEBUG)
            .with_format(LogFormat::Json)
            .with_span_events(true)
            .with_filter("vararg_native=trace");

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.span_events);
        assert_eq!(config.filter, Some("vararg_native=trace".to_string()));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LogConfig::from_lookup(|key| match key {
            "VARARG_NATIVE_LOG_LEVEL" => Some("TRACE".to_string()),
            "VARARG_NATIVE_LOG_FILE" => Some("/tmp/logs".to_string()),
            "VARARG_NATIVE_LOG_JSON" => Some("1".to_string()),
            _ => None,
        });

        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(
            config.output,
            LogOutput::File {
                directory: "/tmp/logs".to_string(),
                prefix: "vararg_native".to_string(),
            }
        );
    }

    #[test]
    fn test_config_from_empty_lookup() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.output, LogOutput::Stderr);
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_bad_level_falls_back() {
        assert_eq!(parse_level("loud"), None);
        let config = LogConfig::from_lookup(|key| {
            (key == "VARARG_NATIVE_LOG_LEVEL").then(|| "loud".to_string())
        });
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn test_file_appender_rejects_unusable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"").unwrap();
        let nested = file.join("logs");

        assert!(file_appender(&nested.to_string_lossy(), "vararg_native").is_err());
    }

    #[test]
    fn test_unusable_directory_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"").unwrap();

        let config = LogConfig::new().with_output(LogOutput::File {
            directory: file.join("logs").to_string_lossy().to_string(),
            prefix: "vararg_native".to_string(),
        });
        // Whether or not a subscriber was already installed, this returns
        let _guard = init_logging(config);
    }

    #[test]
    fn test_init_idempotent() {
        init();
        init(); // Should not panic
        assert!(is_initialized());
    }
}
