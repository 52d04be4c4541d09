//! Error rendering for stderr.

use colored::Colorize;

use crate::cli::args::OutputFormat;
use crate::error::OrgcostError;

/// Render an error for the given output format.
///
/// Robot formats get structured JSON; human output gets the error code,
/// message and, when available, a hint.
#[must_use]
pub fn render_error(
    error: &OrgcostError,
    format: OutputFormat,
    no_color: bool,
    pretty: bool,
) -> String {
    match format {
        OutputFormat::Json => render_error_json(error, pretty),
        OutputFormat::Md => render_error_json(error, true),
        OutputFormat::Human => render_simple(error, no_color),
    }
}

/// Render error as structured JSON for machine consumption.
#[must_use]
pub fn render_error_json(error: &OrgcostError, pretty: bool) -> String {
    let error_json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&error_json)
    } else {
        serde_json::to_string(&error_json)
    };
    rendered.unwrap_or_else(|_| render_simple(error, true))
}

fn render_simple(error: &OrgcostError, no_color: bool) -> String {
    let header = format!("Error [{}]:", error.error_code());
    let header = if no_color {
        header
    } else {
        header.red().bold().to_string()
    };

    let mut lines = vec![format!("{header} {error}")];
    if let Some(hint) = error.hint() {
        lines.push(format!("Hint: {hint}"));
    }
    lines.join("\n")
}

/// JSON representation of an error.
#[derive(serde::Serialize)]
struct ErrorJson {
    error_code: String,
    category: String,
    message: String,
    is_retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &OrgcostError) -> Self {
        Self {
            error_code: error.error_code().to_string(),
            category: error.category().to_string(),
            message: error.to_string(),
            is_retryable: error.is_retryable(),
            retry_after_seconds: error.retry_after().map(|d| d.as_secs()),
            hint: error.hint().map(str::to_string),
        }
    }
}
