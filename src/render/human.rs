//! Terminal output built on rich_rust.
//!
//! Renders one styled panel per probed model, plus a batch summary line.

use crate::core::models::{BatchReport, ModelQuota, QuotaValue};
use crate::error::Result;
use rich_rust::prelude::*;
use rich_rust::{Color, ColorSystem, Segment, Style};

/// Flatten rendered segments into a string, styling only when color is on.
fn segments_to_string(segments: &[Segment], no_color: bool) -> String {
    let color_system = if no_color {
        ColorSystem::Standard // Will be ignored since styles won't render
    } else {
        ColorSystem::TrueColor
    };

    segments
        .iter()
        .map(|seg| {
            if no_color || seg.style.is_none() {
                seg.text.to_string()
            } else {
                seg.style.as_ref().unwrap().render(&seg.text, color_system)
            }
        })
        .collect()
}

/// Traffic-light color for a remaining-quota percentage.
fn percentage_color(percent: f64) -> Color {
    if percent >= 25.0 {
        Color::parse("green").unwrap()
    } else if percent >= 10.0 {
        Color::parse("yellow").unwrap()
    } else {
        Color::parse("red").unwrap()
    }
}

/// Render a batch report for human consumption.
pub fn render_report(report: &BatchReport, no_color: bool) -> Result<String> {
    let mut output = String::new();

    for quota in &report.data {
        output.push_str(&render_model_panel(quota, no_color));
        output.push('\n');
    }

    let failed = report.failed_count();
    if failed > 0 {
        output.push_str(&format!("{} ({} failed)\n", report.msg, failed));
    } else {
        output.push_str(&report.msg);
        output.push('\n');
    }

    Ok(output)
}

/// Render a single model's quota panel.
fn render_model_panel(quota: &ModelQuota, no_color: bool) -> String {
    let mut content_lines: Vec<Vec<Segment>> = Vec::new();

    if let Some(error) = &quota.error {
        let style = if no_color {
            Style::new()
        } else {
            Style::new().color(Color::parse("red").unwrap())
        };
        content_lines.push(vec![Segment::styled(format!("Error: {error}"), style)]);
    } else {
        push_quota_line(
            &mut content_lines,
            "Requests (account)",
            quota.request_remaining.as_ref(),
            quota.request_limit.as_ref(),
            no_color,
        );
        push_quota_line(
            &mut content_lines,
            "Requests (model)",
            quota.model_request_remaining.as_ref(),
            quota.model_request_limit.as_ref(),
            no_color,
        );

        if content_lines.is_empty() {
            let style = if no_color {
                Style::new()
            } else {
                Style::new().dim()
            };
            content_lines.push(vec![Segment::styled(
                "no rate-limit headers reported",
                style,
            )]);
        }
    }

    let title = if no_color {
        Text::new(&quota.model)
    } else {
        let style = Style::new().bold().color(Color::parse("cyan").unwrap());
        Text::styled(&quota.model, style)
    };

    let mut panel = Panel::new(content_lines).title(title).padding((0, 1));

    if !no_color {
        let border = if quota.is_success() { "blue" } else { "red" };
        panel = panel.border_style(Style::new().color(Color::parse(border).unwrap()));
    }

    let segments = panel.render(60);
    segments_to_string(&segments, no_color)
}

/// Push one "remaining / limit" line when either value is present.
fn push_quota_line(
    lines: &mut Vec<Vec<Segment>>,
    label: &str,
    remaining: Option<&QuotaValue>,
    limit: Option<&QuotaValue>,
    no_color: bool,
) {
    if remaining.is_none() && limit.is_none() {
        return;
    }

    let remaining_text = remaining.map_or_else(|| "?".to_string(), ToString::to_string);
    let limit_text = limit.map_or_else(|| "?".to_string(), ToString::to_string);

    let percent = remaining_percent(remaining, limit);
    let value_style = match (no_color, percent) {
        (false, Some(percent)) => Style::new().color(percentage_color(percent)),
        _ => Style::new(),
    };

    let value_text = percent.map_or_else(
        || format!("{remaining_text} / {limit_text}"),
        |p| {
            format!(
                "{remaining_text} / {limit_text} ({})",
                crate::util::format::format_percent(p)
            )
        },
    );

    lines.push(vec![
        Segment::plain(format!("{label}: ")),
        Segment::styled(value_text, value_style),
    ]);
}

/// Percentage remaining, when both readings parsed as nonzero counts.
fn remaining_percent(remaining: Option<&QuotaValue>, limit: Option<&QuotaValue>) -> Option<f64> {
    let remaining = remaining.and_then(QuotaValue::as_count)?;
    let limit = limit.and_then(QuotaValue::as_count)?;
    if limit <= 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    Some((remaining as f64 / limit as f64) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::BatchReport;

    fn quota_with_counts(model: &str, remaining: i64, limit: i64) -> ModelQuota {
        let mut quota = ModelQuota::empty(model.to_string());
        quota.request_remaining = Some(QuotaValue::Count(remaining));
        quota.request_limit = Some(QuotaValue::Count(limit));
        quota
    }

    #[test]
    fn panel_shows_remaining_over_limit() {
        let report = BatchReport::new(vec![quota_with_counts("qwen-max", 499, 500)]);
        let output = render_report(&report, true).unwrap();
        assert!(output.contains("qwen-max"));
        assert!(output.contains("499 / 500"));
        assert!(output.contains("queried quota for 1 models"));
    }

    #[test]
    fn panel_shows_error_for_failed_probe() {
        let report = BatchReport::new(vec![ModelQuota::failure_message(
            "qwen-plus".to_string(),
            "HTTP error: 401".to_string(),
        )]);
        let output = render_report(&report, true).unwrap();
        assert!(output.contains("Error: HTTP error: 401"));
        assert!(output.contains("(1 failed)"));
    }

    #[test]
    fn panel_notes_missing_headers() {
        let report = BatchReport::new(vec![ModelQuota::empty("bare".to_string())]);
        let output = render_report(&report, true).unwrap();
        assert!(output.contains("no rate-limit headers reported"));
    }

    #[test]
    fn no_color_output_has_no_ansi() {
        let report = BatchReport::new(vec![quota_with_counts("qwen-max", 10, 500)]);
        let output = render_report(&report, true).unwrap();
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn mixed_raw_values_render_as_text() {
        let mut quota = ModelQuota::empty("qwen-max".to_string());
        quota.request_remaining = Some(QuotaValue::Raw("unlimited".to_string()));
        let report = BatchReport::new(vec![quota]);
        let output = render_report(&report, true).unwrap();
        assert!(output.contains("unlimited / ?"));
    }

    #[test]
    fn remaining_percent_requires_counts() {
        assert_eq!(
            remaining_percent(
                Some(&QuotaValue::Count(50)),
                Some(&QuotaValue::Count(200))
            ),
            Some(25.0)
        );
        assert_eq!(
            remaining_percent(
                Some(&QuotaValue::Raw("n/a".to_string())),
                Some(&QuotaValue::Count(200))
            ),
            None
        );
        assert_eq!(
            remaining_percent(Some(&QuotaValue::Count(50)), Some(&QuotaValue::Count(0))),
            None
        );
    }
}
