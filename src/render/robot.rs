//! Robot-mode output (JSON and Markdown).
//!
//! Provides stable, token-efficient output for scripts and AI agents.

use crate::core::models::BatchReport;
use crate::error::Result;

/// Render any serializable value as JSON.
pub fn render_json<T: serde::Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string(output)?)
}

/// Render any serializable value as pretty JSON.
pub fn render_json_pretty<T: serde::Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Render a batch report as JSON.
pub fn render_report_json(report: &BatchReport, pretty: bool) -> Result<String> {
    if pretty {
        render_json_pretty(report)
    } else {
        render_json(report)
    }
}

/// Render a batch report as Markdown.
pub fn render_report_md(report: &BatchReport) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("# Quota Report\n\n{}\n\n", report.msg));

    for quota in &report.data {
        output.push_str(&format!("## {}\n", quota.model));

        if let Some(error) = &quota.error {
            output.push_str(&format!("- error: {error}\n"));
            output.push('\n');
            continue;
        }

        if let Some(limit) = &quota.request_limit {
            output.push_str(&format!("- request_limit: {limit}\n"));
        }
        if let Some(remaining) = &quota.request_remaining {
            output.push_str(&format!("- request_remaining: {remaining}\n"));
        }
        if let Some(limit) = &quota.model_request_limit {
            output.push_str(&format!("- model_request_limit: {limit}\n"));
        }
        if let Some(remaining) = &quota.model_request_remaining {
            output.push_str(&format!("- model_request_remaining: {remaining}\n"));
        }

        if !quota.has_readings() {
            output.push_str("- no rate-limit headers reported\n");
        }

        output.push('\n');
    }

    Ok(output)
}
