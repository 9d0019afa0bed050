//! Structured logging for integration tests.
//!
//! One `TestLogger` per test tracks phases ("setup", "test", "teardown")
//! and the elapsed time, writing to stderr and, when configured, to a log
//! file. `TEST_LOG_LEVEL` sets the minimum level (default info),
//! `TEST_LOG_FILE` the file path (default test-results.log), and `NO_COLOR`
//! disables ANSI output.

#![allow(dead_code)]

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use chrono::Utc;

// =============================================================================
// Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "err" => Some(Self::Error),
            _ => None,
        }
    }

    const fn ansi(self) -> &'static str {
        match self {
            Self::Trace => "\x1b[90m",
            Self::Debug => "\x1b[36m",
            Self::Info => "\x1b[32m",
            Self::Warn => "\x1b[33m",
            Self::Error => "\x1b[31m",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

// =============================================================================
// Sink
// =============================================================================

/// Process-wide output settings, resolved once from the environment.
struct Sink {
    min_level: LogLevel,
    color: bool,
    file: Option<Mutex<File>>,
}

impl Sink {
    fn from_env() -> Self {
        let min_level = std::env::var("TEST_LOG_LEVEL")
            .ok()
            .and_then(|s| LogLevel::parse(&s))
            .unwrap_or(LogLevel::Info);

        let path = std::env::var("TEST_LOG_FILE")
            .unwrap_or_else(|_| "test-results.log".to_string());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
            .map(Mutex::new);

        Self {
            min_level,
            color: std::env::var_os("NO_COLOR").is_none(),
            file,
        }
    }

    fn emit(&self, level: LogLevel, test_name: &str, message: &str) {
        if level < self.min_level {
            return;
        }

        let ts = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let plain = format!("[{ts}] [{level}] [{test_name}] {message}");

        if self.color {
            let (color, reset) = (level.ansi(), "\x1b[0m");
            eprintln!("[{ts}] [{color}{level}{reset}] [{test_name}] {message}");
        } else {
            eprintln!("{plain}");
        }

        if let Some(file) = &self.file
            && let Ok(mut guard) = file.lock()
        {
            let _ = writeln!(guard, "{plain}");
        }
    }
}

fn sink() -> &'static Sink {
    static SINK: OnceLock<Sink> = OnceLock::new();
    SINK.get_or_init(Sink::from_env)
}

// =============================================================================
// TestLogger
// =============================================================================

/// Per-test logger with phase and duration tracking.
pub struct TestLogger {
    test_name: String,
    started: Instant,
}

impl TestLogger {
    /// Create a logger named after the test function.
    #[must_use]
    pub fn new(test_name: &str) -> Self {
        let logger = Self {
            test_name: test_name.to_string(),
            started: Instant::now(),
        };
        logger.log(LogLevel::Info, "Test starting");
        logger
    }

    /// Mark the start of a test phase.
    pub fn phase(&self, phase: &str) {
        self.log(LogLevel::Debug, &format!("Phase: {phase}"));
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Mark the test as passed, with its duration.
    pub fn finish_ok(&self) {
        self.log(
            LogLevel::Info,
            &format!("Test passed (duration: {}ms)", self.elapsed_ms()),
        );
    }

    /// Mark the test as failed, with the reason and duration.
    pub fn finish_err(&self, reason: &str) {
        self.log(
            LogLevel::Error,
            &format!("Test FAILED: {reason} (duration: {}ms)", self.elapsed_ms()),
        );
    }

    #[allow(clippy::cast_possible_truncation)]
    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn log(&self, level: LogLevel, message: &str) {
        sink().emit(level, &self.test_name, message);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing_accepts_aliases() {
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("err"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("invalid"), None);
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn logger_tracks_phases_and_finish() {
        let log = TestLogger::new("logger_tracks_phases_and_finish");
        log.phase("setup");
        log.debug("building fixtures");
        log.phase("test");
        log.info("running assertions");
        log.finish_ok();
    }
}
