//! Core probe orchestration and configuration.

pub mod batch;
pub mod config;
pub mod credential;
pub mod http;
pub mod logging;
pub mod models;
pub mod probe;

pub use batch::run_batch;
pub use config::{Config, ConfigSource, ResolvedConfig};
pub use models::{BalanceRequest, BatchReport, ErrorReport, ModelQuota, QuotaValue};
pub use probe::{ProbeSettings, Prober};
