//! `costs` command implementation.

use chrono::NaiveDate;

use crate::cli::args::CostsArgs;
use crate::core::backoff::Sleeper;
use crate::core::cost_fetcher::CostFilters;
use crate::core::models::CostsPayload;
use crate::core::pipeline::UsagePipeline;
use crate::core::validator::resolve_credential;
use crate::error::{OrgcostError, Result};
use crate::render;
use crate::storage::ResolvedConfig;
use crate::util::time::{DateRange, today_utc};

/// Execute the costs command.
///
/// # Errors
///
/// Returns error for invalid arguments or a rejected key. Fetch failures do
/// not error; they produce a synthetic report.
pub async fn execute(args: &CostsArgs, config: &ResolvedConfig, no_color: bool) -> Result<()> {
    let pipeline = UsagePipeline::new(config.client_settings())?;
    let payload = collect(&pipeline, args, config.lookback_days, today_utc()).await?;
    if payload.synthetic {
        tracing::warn!(source = %payload.source, "Reporting synthetic cost data");
    }

    let output = render::render_costs(payload, config.format, config.pretty, no_color)?;
    print!("{output}");
    Ok(())
}

/// Resolve the date range for the command.
///
/// `--days` wins; otherwise explicit dates, each defaulting relative to the
/// other (or to today) using the configured lookback.
///
/// # Errors
///
/// Returns [`OrgcostError::InvalidDateRange`] for malformed or reversed dates.
pub fn resolve_range(args: &CostsArgs, lookback_days: u32, today: NaiveDate) -> Result<DateRange> {
    if let Some(days) = args.days {
        return Ok(DateRange::last_days(today, days));
    }

    let range = match (&args.start, &args.end) {
        (None, None) => return Ok(DateRange::last_days(today, lookback_days)),
        (Some(start), Some(end)) => DateRange::parse(start, end)?,
        (Some(start), None) => {
            let parsed = DateRange::parse(start, start)?;
            DateRange::new(parsed.start, today)
        }
        (None, Some(end)) => {
            let parsed = DateRange::parse(end, end)?;
            DateRange::last_days(parsed.end, lookback_days)
        }
    };

    if range.start > range.end {
        return Err(OrgcostError::InvalidDateRange {
            start: range.start_str(),
            end: range.end_str(),
            reason: "start is after end".to_string(),
        });
    }
    Ok(range)
}

/// Validate (unless skipped), fetch and package the report.
///
/// # Errors
///
/// Returns error for an invalid range, a missing key, or a rejected key.
pub async fn collect<S: Sleeper + Clone>(
    pipeline: &UsagePipeline<S>,
    args: &CostsArgs,
    lookback_days: u32,
    today: NaiveDate,
) -> Result<CostsPayload> {
    let range = resolve_range(args, lookback_days, today)?;
    let explicit = args.api_key.as_deref().unwrap_or_default();

    if !args.skip_validate && !pipeline.validate(explicit).await {
        return Err(
            if resolve_credential(explicit, pipeline.default_credential()).is_none() {
                OrgcostError::AuthNotConfigured
            } else {
                OrgcostError::AuthInvalid {
                    reason: "the API did not accept the key".to_string(),
                }
            },
        );
    }

    let filters = CostFilters {
        project_ids: args.projects.clone(),
        models: args.models.clone(),
    };

    tracing::debug!(
        start = %range.start_str(),
        end = %range.end_str(),
        projects = filters.project_ids.len(),
        models = filters.models.len(),
        "Fetching costs"
    );

    let outcome = pipeline
        .fetch_usage_for_range(explicit, range, filters)
        .await;
    Ok(CostsPayload::from_outcome(
        &outcome,
        &range.start_str(),
        &range.end_str(),
    ))
}
