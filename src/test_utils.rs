//! Shared test data factories, exposed to the integration suites through
//! the `test-utils` feature.

use crate::core::models::{BatchReport, ModelQuota, QuotaValue};

/// A successful quota with account-scope readings.
#[must_use]
pub fn make_test_quota(model: &str, remaining: i64, limit: i64) -> ModelQuota {
    let mut quota = ModelQuota::empty(model.to_string());
    quota.request_remaining = Some(QuotaValue::Count(remaining));
    quota.request_limit = Some(QuotaValue::Count(limit));
    quota
}

/// A successful quota with all four readings populated.
#[must_use]
pub fn make_test_quota_full(model: &str) -> ModelQuota {
    let mut quota = make_test_quota(model, 499, 500);
    quota.model_request_remaining = Some(QuotaValue::Count(99));
    quota.model_request_limit = Some(QuotaValue::Count(100));
    quota
}

/// A successful quota with no readings, as from an upstream that omits
/// every rate-limit header.
#[must_use]
pub fn make_test_quota_bare(model: &str) -> ModelQuota {
    ModelQuota::empty(model.to_string())
}

/// A failed quota carrying the given error message.
#[must_use]
pub fn make_test_quota_failed(model: &str, error: &str) -> ModelQuota {
    ModelQuota::failure_message(model.to_string(), error.to_string())
}

/// Wrap quotas in the report envelope.
#[must_use]
pub fn make_test_report(data: Vec<ModelQuota>) -> BatchReport {
    BatchReport::new(data)
}
