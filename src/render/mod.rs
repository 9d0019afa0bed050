//! Output rendering for human and robot modes.

pub mod error;
pub mod human;
pub mod robot;

use crate::cli::args::OutputFormat;
use crate::core::models::BatchReport;
use crate::error::Result;

/// Render a batch report in the requested format.
pub fn render_report(
    report: &BatchReport,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => human::render_report(report, no_color),
        OutputFormat::Json => robot::render_report_json(report, pretty),
        OutputFormat::Md => robot::render_report_md(report),
    }
}
