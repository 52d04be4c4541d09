//! Output rendering for human and robot modes.

pub mod error;
pub mod human;
pub mod robot;

use crate::cli::args::OutputFormat;
use crate::core::models::{CostsPayload, PricingPayload, RobotOutput, ValidationPayload};
use crate::error::Result;

/// Render the `costs` report.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn render_costs(
    payload: CostsPayload,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_costs(&payload, no_color)),
        OutputFormat::Json => robot::render_json(&RobotOutput::new("costs", payload), pretty),
        OutputFormat::Md => Ok(robot::render_costs_md(&payload)),
    }
}

/// Render the pricing table.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn render_pricing(
    payload: PricingPayload,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_pricing(&payload, no_color)),
        OutputFormat::Json => robot::render_json(&RobotOutput::new("pricing", payload), pretty),
        OutputFormat::Md => Ok(robot::render_pricing_md(&payload)),
    }
}

/// Render a validation result.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn render_validation(
    payload: ValidationPayload,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_validation(&payload, no_color)),
        OutputFormat::Json => {
            robot::render_json(&RobotOutput::new("validate", payload), pretty)
        }
        OutputFormat::Md => Ok(robot::render_validation_md(&payload)),
    }
}
