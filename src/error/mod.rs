//! Error types for msq, built on `thiserror` and mapped to exit codes.
//!
//! ## Taxonomy
//!
//! Every error falls into one of six categories:
//! - **Authentication**: missing or unusable API credentials
//! - **Network**: connection, timeout, or DNS issues reaching the upstream
//! - **Configuration**: config file parse failures or rejected values
//! - **Validation**: caller-supplied batch input rejected before any probe runs
//! - **Upstream**: non-2xx answers from the inference API, rate limiting
//! - **Internal**: bugs, I/O, and unclassified failures
//!
//! Each variant carries a stable code (e.g. `MSQ-N001`) for programmatic
//! handling, and [`MsqError::is_retryable()`] drives the probe retry loop:
//! only rate limiting and transport failures qualify.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Coarse classification used for rendering and the error-code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credential issues (missing or unusable API key).
    Authentication,
    /// Transport issues (timeout, DNS, connection refused).
    Network,
    /// Config file parse failures or rejected values.
    Configuration,
    /// Batch input rejected before the orchestrator ran.
    Validation,
    /// Rate limits and error statuses from the inference API.
    Upstream,
    /// Bugs, I/O, and unclassified failures.
    Internal,
}

impl ErrorCategory {
    /// Human-readable label, used in rendered error output.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication error",
            Self::Network => "Network error",
            Self::Configuration => "Configuration error",
            Self::Validation => "Validation error",
            Self::Upstream => "Upstream error",
            Self::Internal => "Internal error",
        }
    }

    /// The letter embedded in this category's error codes.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Authentication => "A",
            Self::Network => "N",
            Self::Configuration => "C",
            Self::Validation => "V",
            Self::Upstream => "U",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes for the CLI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success, every probe in the batch succeeded
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Bad arguments, bad config, or rejected batch input
    UsageError = 2,
    /// The batch ran but one or more probes carry an error
    PartialFailure = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Main error type for msq operations.
///
/// Every variant carries a stable code (e.g. `MSQ-U001`), a category, and
/// a retryable flag consulted by the probe retry loop.
#[derive(Error, Debug)]
pub enum MsqError {
    // --- Authentication ---
    /// No API key was provided through any configuration layer.
    #[error("no API key provided (use --api-key, MSQ_API_KEY, or the config file)")]
    CredentialMissing,

    // --- Network ---
    /// Request timed out after the configured per-attempt bound.
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Generic transport failure (connection refused, DNS, reset).
    #[error("network error: {0}")]
    Network(String),

    // --- Configuration ---
    /// Error parsing the configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid { key: String, message: String },

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // --- Validation ---
    /// Batch submitted with no model identifiers.
    #[error("model list must not be empty")]
    EmptyModelList,

    /// Batch contains a blank model identifier.
    #[error("model names must not be blank")]
    BlankModelName,

    /// Batch submitted with a blank credential.
    #[error("api_key must not be blank")]
    BlankCredential,

    // --- Upstream ---
    /// Upstream answered HTTP 429.
    #[error("upstream rate limited (HTTP 429)")]
    RateLimited,

    /// Upstream answered a terminal non-2xx status.
    #[error("upstream returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    /// Some probes in the batch failed after retries.
    #[error("partial failure: {failed} probe(s) failed")]
    PartialFailure { failed: usize },

    // --- Internal ---
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MsqError {
    /// Map error to a process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::CredentialMissing
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_)
            | Self::EmptyModelList
            | Self::BlankModelName
            | Self::BlankCredential => ExitCode::UsageError,

            Self::PartialFailure { .. } => ExitCode::PartialFailure,

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Network(_)
            | Self::RateLimited
            | Self::UpstreamStatus { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::CredentialMissing => ErrorCategory::Authentication,

            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::ConfigParse { .. } | Self::ConfigInvalid { .. } | Self::Config(_) => {
                ErrorCategory::Configuration
            }

            Self::EmptyModelList | Self::BlankModelName | Self::BlankCredential => {
                ErrorCategory::Validation
            }

            Self::RateLimited | Self::UpstreamStatus { .. } | Self::PartialFailure { .. } => {
                ErrorCategory::Upstream
            }

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `MSQ-{category}{number}` where category is:
    /// - A: Authentication
    /// - N: Network
    /// - C: Configuration
    /// - V: Validation
    /// - U: Upstream
    /// - X: Internal
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            // Authentication errors (A001-A099)
            Self::CredentialMissing => "MSQ-A001",

            // Network errors (N001-N099)
            Self::Timeout(_) => "MSQ-N001",
            Self::Network(_) => "MSQ-N099",

            // Configuration errors (C001-C099)
            Self::ConfigParse { .. } => "MSQ-C001",
            Self::ConfigInvalid { .. } => "MSQ-C002",
            Self::Config(_) => "MSQ-C004",

            // Validation errors (V001-V099)
            Self::EmptyModelList => "MSQ-V001",
            Self::BlankModelName => "MSQ-V002",
            Self::BlankCredential => "MSQ-V003",

            // Upstream errors (U001-U099)
            Self::RateLimited => "MSQ-U001",
            Self::UpstreamStatus { .. } => "MSQ-U002",
            Self::PartialFailure { .. } => "MSQ-U030",

            // Internal errors (X001-X099)
            Self::Io(_) => "MSQ-X001",
            Self::Json(_) => "MSQ-X002",
            Self::Other(_) => "MSQ-X099",
        }
    }

    /// Returns whether the error is potentially recoverable by retrying.
    ///
    /// The probe loop retries under exactly two conditions: upstream rate
    /// limiting (HTTP 429) and transport failures. Every other status is
    /// terminal, and unclassified errors are terminal as well.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_) | Self::RateLimited)
    }

    /// Renders the per-model `error` field for a failed probe.
    ///
    /// Three disjoint categories, distinguishable by callers: status errors
    /// carry the numeric status, request errors carry the transport cause,
    /// and anything else is surfaced as unknown.
    #[must_use]
    pub fn probe_message(&self) -> String {
        match self {
            Self::RateLimited => "HTTP error: 429".to_string(),
            Self::UpstreamStatus { status } => format!("HTTP error: {status}"),
            Self::Timeout(_) | Self::Network(_) => format!("request error: {self}"),
            other => format!("unknown error: {other}"),
        }
    }

    /// Returns a short actionable hint for the CLI, when one exists.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CredentialMissing | Self::BlankCredential => {
                Some("set MSQ_API_KEY or pass --api-key <key>")
            }
            Self::EmptyModelList | Self::BlankModelName => {
                Some("pass at least one model with --models <id>[,<id>...]")
            }
            Self::ConfigParse { .. } | Self::ConfigInvalid { .. } | Self::Config(_) => {
                Some("check ~/.config/msq/config.toml or the path given with --config")
            }
            Self::Timeout(_) | Self::Network(_) => {
                Some("check your network connection and the endpoint setting")
            }
            _ => None,
        }
    }
}

/// Result type alias for msq operations.
pub type Result<T> = std::result::Result<T, MsqError>;

// =============================================================================
// Tests
// =============================================================================
