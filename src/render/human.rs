//! Human-readable terminal output.

use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use crate::core::models::{CostsPayload, PricingPayload, ValidationPayload};
use crate::util::format::{format_cost, format_cost_precise, format_rate, format_tokens};

const LABEL_WIDTH: usize = 28;

/// Apply a style unless color is disabled.
fn paint(text: &str, no_color: bool, style: impl Fn(&str) -> ColoredString) -> String {
    if no_color {
        text.to_string()
    } else {
        style(text).to_string()
    }
}

fn heading(text: &str, no_color: bool) -> String {
    paint(text, no_color, |t| t.bold().cyan())
}

/// Render the `costs` report.
#[must_use]
pub fn render_costs(payload: &CostsPayload, no_color: bool) -> String {
    let usage = &payload.usage;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} to {}",
        heading("OpenAI organization costs", no_color),
        payload.start_date,
        payload.end_date
    );
    if payload.synthetic {
        let _ = writeln!(
            out,
            "{}",
            paint(
                "Synthetic data: the API could not be reached or rejected the request",
                no_color,
                |t| t.yellow().bold()
            )
        );
    }
    let _ = writeln!(
        out,
        "Total: {}",
        paint(&format_cost(usage.total_cost), no_color, |t| t.green().bold())
    );

    if usage.daily_usage.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            paint("No costs recorded in this range", no_color, |t| t.dimmed())
        );
        return out;
    }

    let _ = writeln!(out, "\n{}", heading("By model", no_color));
    for model in &usage.model_usage {
        let _ = writeln!(
            out,
            "  {:<LABEL_WIDTH$} {:>12}  {:>8} tokens",
            model.model,
            format_cost(model.total_cost),
            format_tokens(model.total_tokens)
        );
    }

    let _ = writeln!(out, "\n{}", heading("By project", no_color));
    for project in &usage.project_usage {
        let _ = writeln!(
            out,
            "  {:<LABEL_WIDTH$} {:>12}  {:>8} tokens",
            project.name,
            format_cost(project.total_cost),
            format_tokens(project.total_tokens)
        );
    }

    let _ = writeln!(out, "\n{}", heading("Daily", no_color));
    for (day, cost) in usage.cost_by_day() {
        let _ = writeln!(out, "  {day:<LABEL_WIDTH$} {:>12}", format_cost_precise(cost));
    }

    out
}

/// Render the `pricing` table.
#[must_use]
pub fn render_pricing(payload: &PricingPayload, no_color: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", heading("Models", no_color));
    let _ = writeln!(
        out,
        "  {:<LABEL_WIDTH$} {:>12} {:>12} {:>12}",
        "model", "input", "output", "blended"
    );
    for model in &payload.models {
        let _ = writeln!(
            out,
            "  {:<LABEL_WIDTH$} {:>12} {:>12} {:>12}",
            model.model,
            format_rate(model.input_per_million),
            format_rate(model.output_per_million),
            format_rate(model.blended_rate())
        );
    }
    let _ = writeln!(
        out,
        "  {}",
        paint(
            &format!(
                "Other models are estimated at {}",
                format_rate(payload.fallback_per_million)
            ),
            no_color,
            |t| t.dimmed()
        )
    );

    let _ = writeln!(out, "\n{}", heading("Tools", no_color));
    for tool in &payload.tools {
        let _ = writeln!(
            out,
            "  {:<LABEL_WIDTH$} {:>12} {}",
            tool.name,
            format_cost(tool.cost),
            tool.unit
        );
    }

    out
}

/// Render the `validate` result.
#[must_use]
pub fn render_validation(payload: &ValidationPayload, no_color: bool) -> String {
    if payload.valid {
        format!(
            "{} API key accepted by {}\n",
            paint("ok", no_color, |t| t.green().bold()),
            payload.base_url
        )
    } else {
        format!(
            "{} API key rejected by {}\n",
            paint("failed", no_color, |t| t.red().bold()),
            payload.base_url
        )
    }
}
