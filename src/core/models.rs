//! Core data models for quota probes.
//!
//! These types mirror the wire format of the balance API: snake_case field
//! names, optional quota fields omitted when the upstream header was absent,
//! and a `{status, data, msg}` envelope around the batch.

use serde::{Deserialize, Serialize};

use crate::error::{MsqError, Result};

// =============================================================================
// Quota Value
// =============================================================================

/// A single rate-limit reading from an upstream response header.
///
/// The upstream does not contractually guarantee integer values, so a header
/// that fails integer parsing is carried through as its raw string rather
/// than failing the probe. Untagged serde keeps integers as JSON numbers and
/// raw values as JSON strings on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuotaValue {
    Count(i64),
    Raw(String),
}

impl QuotaValue {
    /// Parse a header value leniently: integer when possible, raw otherwise.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map_or_else(|_| Self::Raw(raw.to_string()), Self::Count)
    }

    /// The integer reading, if this value parsed as one.
    #[must_use]
    pub const fn as_count(&self) -> Option<i64> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Raw(_) => None,
        }
    }
}

impl std::fmt::Display for QuotaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Raw(s) => write!(f, "{s}"),
        }
    }
}

// =============================================================================
// Per-Model Quota
// =============================================================================

/// Outcome of one probe: the rate-limit readings for a single model, or the
/// error that ended the probe after retries.
///
/// Exactly one of the two shapes appears on the wire: a success carries any
/// subset of the four quota fields (the upstream may omit headers) and never
/// `error`; a failure carries `error` and none of the quota fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelQuota {
    /// Model identifier, echoed from the batch input.
    pub model: String,

    /// Account-scope request limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<QuotaValue>,

    /// Account-scope requests remaining.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_remaining: Option<QuotaValue>,

    /// Model-scope request limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_request_limit: Option<QuotaValue>,

    /// Model-scope requests remaining.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_request_remaining: Option<QuotaValue>,

    /// Why the probe failed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelQuota {
    /// An empty (all fields absent) success for the given model.
    #[must_use]
    pub const fn empty(model: String) -> Self {
        Self {
            model,
            request_limit: None,
            request_remaining: None,
            model_request_limit: None,
            model_request_remaining: None,
            error: None,
        }
    }

    /// A failed probe carrying only the error message.
    #[must_use]
    pub fn failure(model: String, error: &MsqError) -> Self {
        let mut quota = Self::empty(model);
        quota.error = Some(error.probe_message());
        quota
    }

    /// A failed probe carrying a preformatted message.
    #[must_use]
    pub fn failure_message(model: String, message: String) -> Self {
        let mut quota = Self::empty(model);
        quota.error = Some(message);
        quota
    }

    /// Whether the probe reached the upstream and returned 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Whether any quota reading is present.
    #[must_use]
    pub const fn has_readings(&self) -> bool {
        self.request_limit.is_some()
            || self.request_remaining.is_some()
            || self.model_request_limit.is_some()
            || self.model_request_remaining.is_some()
    }
}

// =============================================================================
// Batch Report
// =============================================================================

/// Envelope around one batch invocation.
///
/// `status` is 0 whenever the batch itself ran, including the case where
/// every probe failed; `msg` reports the count of probes executed, not the
/// count of successes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub status: i64,
    pub data: Vec<ModelQuota>,
    pub msg: String,
}

impl BatchReport {
    /// Wrap a completed batch in the wire envelope.
    #[must_use]
    pub fn new(data: Vec<ModelQuota>) -> Self {
        let msg = format!("queried quota for {} models", data.len());
        Self {
            status: 0,
            data,
            msg,
        }
    }

    /// Count of probes that ended in an error.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.data.iter().filter(|q| !q.is_success()).count()
    }
}

/// Envelope for requests rejected before the batch ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub status: i64,
    pub msg: String,
}

impl ErrorReport {
    #[must_use]
    pub const fn new(msg: String) -> Self {
        Self { status: 1, msg }
    }
}

// =============================================================================
// Balance Request
// =============================================================================

/// Inbound batch request: the model list and the credential to probe with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRequest {
    pub models: Vec<String>,
    pub api_key: String,
}

impl BalanceRequest {
    /// Reject empty lists, blank model names, and blank credentials.
    ///
    /// Runs in the caller (HTTP handler or CLI) before any probe dispatches;
    /// the orchestrator assumes validated input.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a validation error.
    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(MsqError::EmptyModelList);
        }
        if self.models.iter().any(|m| m.trim().is_empty()) {
            return Err(MsqError::BlankModelName);
        }
        if self.api_key.trim().is_empty() {
            return Err(MsqError::BlankCredential);
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
