//! Probe command implementation.

use crate::cli::args::{Cli, ProbeArgs};
use crate::core::batch::run_batch;
use crate::core::config::ResolvedConfig;
use crate::core::models::BalanceRequest;
use crate::error::{MsqError, Result};
use crate::render;

/// Execute the probe command.
///
/// Probes every requested model, renders the report in the resolved format,
/// and returns [`MsqError::PartialFailure`] when any probe failed so the
/// process exits nonzero while still printing the full report.
pub async fn execute(cli: &Cli, args: &ProbeArgs) -> Result<()> {
    let config = ResolvedConfig::resolve(cli, Some(args), None)?;
    let api_key = config.require_api_key()?;

    let request = BalanceRequest {
        models: args.models.clone(),
        api_key: api_key.to_string(),
    };
    request.validate()?;

    let report = run_batch(&request.models, &request.api_key, config.probe_settings()).await?;

    let output = render::render_report(&report, config.format, config.pretty, config.no_color)?;
    println!("{output}");

    let failed = report.failed_count();
    if failed > 0 {
        return Err(MsqError::PartialFailure { failed });
    }

    Ok(())
}
