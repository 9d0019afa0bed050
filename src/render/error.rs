//! Error rendering for the CLI.
//!
//! Human format writes a code-tagged line plus an optional hint, colored
//! only when stderr is an interactive terminal; JSON and Md formats emit a
//! structured object so scripted callers can branch on the code.

use colored::Colorize;

use crate::cli::args::OutputFormat;
use crate::error::MsqError;

/// Render an error with compact JSON in machine formats.
#[must_use]
pub fn render_error(error: &MsqError, format: OutputFormat, no_color: bool) -> String {
    render_error_full(error, format, no_color, false)
}

/// Render an error with full control over formatting.
#[must_use]
pub fn render_error_full(
    error: &MsqError,
    format: OutputFormat,
    no_color: bool,
    pretty: bool,
) -> String {
    match format {
        OutputFormat::Json => render_error_json(error, pretty),
        // Md output is for humans reading a pipe; always pretty-print.
        OutputFormat::Md => render_error_json(error, true),
        OutputFormat::Human => {
            let color = crate::util::env::should_use_color(no_color)
                && crate::util::env::stderr_is_tty();
            human_lines(error, color).join("\n")
        }
    }
}

/// Render an error as structured JSON.
#[must_use]
pub fn render_error_json(error: &MsqError, pretty: bool) -> String {
    let body = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&body)
    } else {
        serde_json::to_string(&body)
    };
    rendered.unwrap_or_else(|_| human_lines(error, false).join("\n"))
}

fn human_lines(error: &MsqError, color: bool) -> Vec<String> {
    let tag = format!("Error [{}]:", error.error_code());
    let mut lines = vec![if color {
        format!("{} {error}", tag.red().bold())
    } else {
        format!("{tag} {error}")
    }];

    if let Some(hint) = error.hint() {
        lines.push(if color {
            format!("{} {hint}", "Hint:".cyan())
        } else {
            format!("Hint: {hint}")
        });
    }

    lines
}

/// The machine-readable error shape.
#[derive(serde::Serialize)]
struct ErrorJson {
    error_code: String,
    category: String,
    message: String,
    is_retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
}

impl ErrorJson {
    fn from_error(error: &MsqError) -> Self {
        Self {
            error_code: error.error_code().to_string(),
            category: error.category().description().to_string(),
            message: error.to_string(),
            is_retryable: error.is_retryable(),
            hint: error.hint(),
        }
    }
}
