//! Single-model probe with bounded retry.
//!
//! One probe issues a deliberately cheap chat-completions request and reads
//! the rate-limit headers off the response; the reply content is thrown away.
//! Transient failures (HTTP 429 and transport errors) are retried on a linear
//! backoff schedule; everything else ends the probe immediately. A probe
//! never returns an error to its caller: every failure mode is folded into
//! the `error` field of the returned [`ModelQuota`].

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};

use crate::core::http;
use crate::core::models::{ModelQuota, QuotaValue};
use crate::error::MsqError;

/// Chat-completions endpoint probed by default.
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.modelscope.cn/v1/chat/completions";

/// Fixed minimal prompt: ask for a single character back.
pub const PROBE_PROMPT: &str = "回复一个字'好'";

/// Additional attempts after the first (3 total attempts by default).
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Multiplicand of the linear backoff schedule (2s, 4s, ...).
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(2);

/// Surfaced when the retry loop runs out without reaching any decision.
pub const FALLBACK_ERROR: &str = "request failed, check that the API key and model name are correct";

const HEADER_REQUEST_LIMIT: &str = "modelscope-ratelimit-requests-limit";
const HEADER_REQUEST_REMAINING: &str = "modelscope-ratelimit-requests-remaining";
const HEADER_MODEL_REQUEST_LIMIT: &str = "modelscope-ratelimit-model-requests-limit";
const HEADER_MODEL_REQUEST_REMAINING: &str = "modelscope-ratelimit-model-requests-remaining";

// =============================================================================
// Attempt Decisions
// =============================================================================

/// What one attempt decided about the probe.
///
/// `Retry` only ever carries rate limiting or a transport failure; any other
/// status is `Terminal`, as are unclassified failures (the upstream service
/// this mirrors catches its broad error class without retrying it).
#[derive(Debug)]
pub enum AttemptDecision {
    /// 2xx response; quota readings extracted from the headers.
    Success(ModelQuota),
    /// Transient failure, worth another attempt while budget remains.
    Retry(MsqError),
    /// Failure no retry can fix.
    Terminal(MsqError),
}

impl AttemptDecision {
    fn from_error(err: MsqError) -> Self {
        if err.is_retryable() {
            Self::Retry(err)
        } else {
            Self::Terminal(err)
        }
    }
}

/// Delay before re-running attempt `attempt` (0-indexed): `(attempt + 1)`
/// backoff units, giving the 2s, 4s, ... schedule at the default unit.
#[must_use]
pub const fn backoff_delay(attempt: u32, unit: Duration) -> Duration {
    let step = attempt as u64 + 1;
    Duration::from_millis(unit.as_millis() as u64 * step)
}

/// Classify a completed HTTP exchange.
fn decide_response(model: &str, status: StatusCode, headers: &HeaderMap) -> AttemptDecision {
    if status.is_success() {
        return AttemptDecision::Success(extract_quota(model, headers));
    }

    let err = if status == StatusCode::TOO_MANY_REQUESTS {
        MsqError::RateLimited
    } else {
        MsqError::UpstreamStatus {
            status: status.as_u16(),
        }
    };
    AttemptDecision::from_error(err)
}

/// Classify a send-side failure.
///
/// Builder errors (e.g. a credential that cannot form a header value) are not
/// transport failures and land in the unknown category.
fn classify_send_error(err: reqwest::Error, timeout: Duration) -> MsqError {
    if err.is_builder() {
        return MsqError::Other(anyhow::Error::new(err));
    }
    http::map_send_error(&err, timeout)
}

/// Read the four quota headers off a 2xx response.
///
/// Absent and empty headers leave the field unset; other values parse
/// leniently via [`QuotaValue::parse`]. The response body is never read.
fn extract_quota(model: &str, headers: &HeaderMap) -> ModelQuota {
    let get = |name: &str| -> Option<QuotaValue> {
        let value = headers.get(name)?.to_str().ok()?;
        if value.is_empty() {
            return None;
        }
        Some(QuotaValue::parse(value))
    };

    let mut quota = ModelQuota::empty(model.to_string());
    quota.request_limit = get(HEADER_REQUEST_LIMIT);
    quota.request_remaining = get(HEADER_REQUEST_REMAINING);
    quota.model_request_limit = get(HEADER_MODEL_REQUEST_LIMIT);
    quota.model_request_remaining = get(HEADER_MODEL_REQUEST_REMAINING);
    quota
}

/// The minimal-cost request body for one model.
fn probe_body(model: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [{"role": "user", "content": PROBE_PROMPT}],
        "temperature": 0.1,
        "max_tokens": 100,
        "enable_thinking": false,
    })
}

// =============================================================================
// Probe Settings
// =============================================================================

/// Knobs shared by every probe in a batch.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Endpoint URL; the compile-time default outside of test harnesses.
    pub endpoint: String,
    /// Per-attempt bound on the whole exchange.
    pub timeout: Duration,
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Linear backoff multiplicand.
    pub backoff_unit: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: http::DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

// =============================================================================
// Prober
// =============================================================================

/// Probe machinery for one batch: the shared client, the credential, and the
/// retry knobs. Constructed per batch invocation and dropped with it.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    api_key: String,
    settings: ProbeSettings,
}

impl Prober {
    #[must_use]
    pub const fn new(client: Client, api_key: String, settings: ProbeSettings) -> Self {
        Self {
            client,
            api_key,
            settings,
        }
    }

    /// Probe one model, retrying transient failures on the linear schedule.
    ///
    /// Infallible by contract: the returned [`ModelQuota`] carries either the
    /// extracted readings or the final error message.
    pub async fn probe(&self, model: &str) -> ModelQuota {
        let max_retries = self.settings.max_retries;

        for attempt in 0..=max_retries {
            match self.attempt(model).await {
                AttemptDecision::Success(quota) => {
                    tracing::debug!(model = %model, attempt, "probe succeeded");
                    return quota;
                }
                AttemptDecision::Retry(cause) if attempt < max_retries => {
                    let delay = backoff_delay(attempt, self.settings.backoff_unit);
                    tracing::warn!(
                        model = %model,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        cause = %cause,
                        "transient probe failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                AttemptDecision::Retry(cause) => {
                    tracing::error!(
                        model = %model,
                        attempts = attempt + 1,
                        code = cause.error_code(),
                        "probe failed after retries"
                    );
                    return ModelQuota::failure(model.to_string(), &cause);
                }
                AttemptDecision::Terminal(cause) => {
                    tracing::error!(
                        model = %model,
                        attempt,
                        code = cause.error_code(),
                        "probe failed"
                    );
                    return ModelQuota::failure(model.to_string(), &cause);
                }
            }
        }

        // Every loop iteration returns or sleeps-and-continues, so this is
        // only reachable if the attempt budget arithmetic ever changes.
        ModelQuota::failure_message(model.to_string(), FALLBACK_ERROR.to_string())
    }

    /// Run one attempt and classify what happened.
    async fn attempt(&self, model: &str) -> AttemptDecision {
        let response = self
            .client
            .post(&self.settings.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&probe_body(model))
            .send()
            .await;

        match response {
            Ok(resp) => decide_response(model, resp.status(), resp.headers()),
            Err(e) => {
                AttemptDecision::from_error(classify_send_error(e, self.settings.timeout))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
