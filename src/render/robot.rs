//! Robot-mode output (JSON and Markdown).
//!
//! JSON output is always wrapped in the versioned [`RobotOutput`] envelope.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::models::{CostsPayload, PricingPayload, RobotOutput, ValidationPayload};
use crate::error::Result;

/// Serialize an envelope, compact or pretty.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn render_json<T: Serialize>(output: &RobotOutput<T>, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(output)?
    } else {
        serde_json::to_string(output)?
    };
    Ok(json)
}

/// Render the `costs` report as Markdown.
#[must_use]
pub fn render_costs_md(payload: &CostsPayload) -> String {
    let usage = &payload.usage;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "## OpenAI costs {} to {} ({})\n",
        payload.start_date, payload.end_date, payload.source
    );
    if payload.synthetic {
        let _ = writeln!(out, "> **Synthetic data.** Real costs could not be fetched.\n");
    }
    let _ = writeln!(out, "- total_cost_usd: {:.2}", usage.total_cost);
    let _ = writeln!(out, "- daily_points: {}\n", usage.daily_usage.len());

    let _ = writeln!(out, "### By model\n");
    let _ = writeln!(out, "| model | cost_usd | est_tokens |");
    let _ = writeln!(out, "|---|---:|---:|");
    for model in &usage.model_usage {
        let _ = writeln!(
            out,
            "| {} | {:.2} | {} |",
            model.model, model.total_cost, model.total_tokens
        );
    }

    let _ = writeln!(out, "\n### By project\n");
    let _ = writeln!(out, "| project | id | cost_usd | est_tokens |");
    let _ = writeln!(out, "|---|---|---:|---:|");
    for project in &usage.project_usage {
        let _ = writeln!(
            out,
            "| {} | {} | {:.2} | {} |",
            project.name,
            project.project_id.as_deref().unwrap_or("-"),
            project.total_cost,
            project.total_tokens
        );
    }

    let _ = writeln!(out, "\n### Daily\n");
    let _ = writeln!(out, "| date | cost_usd |");
    let _ = writeln!(out, "|---|---:|");
    for (day, cost) in usage.cost_by_day() {
        let _ = writeln!(out, "| {day} | {cost:.4} |");
    }

    out
}

/// Render the pricing table as Markdown.
#[must_use]
pub fn render_pricing_md(payload: &PricingPayload) -> String {
    let mut out = String::from("## Pricing (USD per 1M tokens)\n\n");
    let _ = writeln!(out, "| model | input | output | blended |");
    let _ = writeln!(out, "|---|---:|---:|---:|");
    for model in &payload.models {
        let _ = writeln!(
            out,
            "| {} | {:.2} | {:.2} | {:.2} |",
            model.model,
            model.input_per_million,
            model.output_per_million,
            model.blended_rate()
        );
    }
    let _ = writeln!(
        out,
        "\n- fallback_per_million: {:.2}\n",
        payload.fallback_per_million
    );

    let _ = writeln!(out, "### Tools\n");
    let _ = writeln!(out, "| tool | cost_usd | unit |");
    let _ = writeln!(out, "|---|---:|---|");
    for tool in &payload.tools {
        let _ = writeln!(out, "| {} | {:.2} | {} |", tool.name, tool.cost, tool.unit);
    }
    out
}

/// Render the validation result as Markdown.
#[must_use]
pub fn render_validation_md(payload: &ValidationPayload) -> String {
    format!(
        "## API key\n\n- valid: {}\n- base_url: {}\n",
        payload.valid, payload.base_url
    )
}
