//! Logging initialization.
//!
//! The subscriber level resolves from `--log-level` first, then `MSQ_LOG`,
//! defaulting to errors only. A set `RUST_LOG` replaces the filter wholesale.
//! `MSQ_LOG_FORMAT` switches between text and JSON events, and `MSQ_LOG_FILE`
//! redirects output from stderr to a file.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const LEVEL_ENV: &str = "MSQ_LOG";
const FORMAT_ENV: &str = "MSQ_LOG_FORMAT";
const FILE_ENV: &str = "MSQ_LOG_FILE";

/// Log event format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Terse human-readable events.
    #[default]
    Text,
    /// One JSON event per line, for log shippers.
    Json,
}

impl LogFormat {
    /// Parse from a flag or env value, case-insensitive.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "human" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Subscriber verbosity, most to least verbose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl LogLevel {
    /// Parse from a flag or env value, case-insensitive.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "verbose" | "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// The directive string for the `EnvFilter`.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Log level from `MSQ_LOG`, when set to a recognized value.
#[must_use]
pub fn parse_log_level_from_env() -> Option<LogLevel> {
    env_value(LEVEL_ENV).as_deref().and_then(LogLevel::from_arg)
}

/// Log format from `MSQ_LOG_FORMAT`, when set to a recognized value.
#[must_use]
pub fn parse_log_format_from_env() -> Option<LogFormat> {
    env_value(FORMAT_ENV).as_deref().and_then(LogFormat::from_arg)
}

/// Log file path from `MSQ_LOG_FILE`, when set.
#[must_use]
pub fn parse_log_file_from_env() -> Option<PathBuf> {
    env_value(FILE_ENV).map(PathBuf::from)
}

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("msq={}", level.as_filter())))
}

/// A writer for the configured file, or stderr when no file is configured
/// or it cannot be opened.
fn writer_for(log_file: Option<PathBuf>) -> BoxMakeWriter {
    let file = log_file.and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match file {
        Some(file) => BoxMakeWriter::new(file),
        None => BoxMakeWriter::new(std::io::stderr),
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: LogLevel, format: LogFormat, log_file: Option<PathBuf>, verbose: bool) {
    let level = if verbose && matches!(level, LogLevel::Warn | LogLevel::Error) {
        LogLevel::Debug
    } else {
        level
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(writer_for(log_file));

    match format {
        LogFormat::Json => {
            builder
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .try_init()
                .ok();
        }
        LogFormat::Text => {
            builder.with_target(false).without_time().try_init().ok();
        }
    }
}
