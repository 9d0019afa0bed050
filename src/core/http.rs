//! HTTP client utilities.
//!
//! Provides the shared outbound client used by every probe in a batch.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::{MsqError, Result};

/// Default per-attempt timeout for probe requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a configured HTTP client.
///
/// One client is built per batch and shared by all of its probes; probes
/// never mutate it.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("msq/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| MsqError::Network(e.to_string()))
}

/// Map a send-side `reqwest` failure into the error taxonomy.
///
/// Timeouts are distinguished from other transport failures so the reported
/// cause names the configured bound; both map to retryable categories.
pub fn map_send_error(err: &reqwest::Error, timeout: Duration) -> MsqError {
    if err.is_timeout() {
        MsqError::Timeout(timeout.as_secs())
    } else {
        MsqError::Network(err.to_string())
    }
}
