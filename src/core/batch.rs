//! Batch orchestration: concurrent fan-out over the model list.
//!
//! One batch builds one shared client, probes every model concurrently, and
//! joins all probes before assembling the report. Probe futures are
//! infallible by type, so the join cannot observe a task failure; the only
//! fallible step is client construction, which happens before any probe
//! dispatches.

use std::time::Instant;

use futures::future::join_all;

use crate::core::credential;
use crate::core::http::build_client;
use crate::core::models::{BatchReport, ModelQuota};
use crate::core::probe::{ProbeSettings, Prober};
use crate::error::Result;

/// Run one batch: one probe per model over a shared client.
///
/// Results come back in input order regardless of completion order, one per
/// model, each carrying either quota readings or that probe's error. The
/// report's status is 0 even when every probe failed.
///
/// Assumes validated input (non-empty list, non-blank names and credential);
/// callers run [`BalanceRequest::validate`] first.
///
/// # Errors
///
/// Returns error only if the shared client cannot be constructed.
///
/// [`BalanceRequest::validate`]: crate::core::models::BalanceRequest::validate
pub async fn run_batch(
    models: &[String],
    api_key: &str,
    settings: ProbeSettings,
) -> Result<BatchReport> {
    let client = build_client(settings.timeout)?;
    let prober = Prober::new(client, api_key.to_string(), settings);

    let start = Instant::now();
    tracing::info!(
        models = models.len(),
        key = %credential::fingerprint(api_key),
        "starting probe batch"
    );

    let futures: Vec<_> = models.iter().map(|model| prober.probe(model)).collect();
    let data: Vec<ModelQuota> = join_all(futures).await;

    let report = BatchReport::new(data);
    tracing::info!(
        models = report.data.len(),
        failed = report.failed_count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "probe batch complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unroutable_settings() -> ProbeSettings {
        ProbeSettings {
            // Discard port on loopback: connection refused, immediately.
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout: Duration::from_secs(2),
            max_retries: 1,
            backoff_unit: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn batch_survives_total_transport_failure() {
        let models = vec!["alpha".to_string(), "beta".to_string()];
        let report = run_batch(&models, "ms-test-key", unroutable_settings())
            .await
            .expect("client construction should succeed");

        assert_eq!(report.status, 0);
        assert_eq!(report.data.len(), 2);
        assert_eq!(report.failed_count(), 2);
        for (quota, model) in report.data.iter().zip(&models) {
            assert_eq!(&quota.model, model);
            let error = quota.error.as_deref().expect("probe should have failed");
            assert!(error.starts_with("request error: "), "got: {}", error);
        }
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let models: Vec<String> = (0..5).map(|i| format!("model-{i}")).collect();
        let report = run_batch(&models, "ms-test-key", unroutable_settings())
            .await
            .expect("client construction should succeed");

        let echoed: Vec<&str> = report.data.iter().map(|q| q.model.as_str()).collect();
        let expected: Vec<&str> = models.iter().map(String::as_str).collect();
        assert_eq!(echoed, expected);
    }

    #[tokio::test]
    async fn batch_message_counts_probes() {
        let models = vec!["only".to_string()];
        let report = run_batch(&models, "ms-test-key", unroutable_settings())
            .await
            .expect("client construction should succeed");

        assert_eq!(report.msg, "queried quota for 1 models");
    }
}
