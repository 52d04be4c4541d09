//! Core data models.
//!
//! Two families live here: the wire types returned by the organization costs
//! endpoint (snake_case, exactly as the API sends them) and the aggregate
//! views produced by the pipeline (camelCase, the shape dashboards consume).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::pricing::{FALLBACK_RATE_PER_MILLION, ModelPricing, PricingTable, ToolPricing};

// =============================================================================
// Wire Types
// =============================================================================

/// A monetary amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostAmount {
    pub value: f64,
    pub currency: String,
}

/// One line item inside a cost bucket.
///
/// `amount.value` is expected to be non-negative but this is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostResult {
    #[serde(default = "default_result_object")]
    pub object: String,
    pub amount: CostAmount,
    #[serde(default)]
    pub line_item: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub organization_id: String,
}

fn default_result_object() -> String {
    "organization.costs.result".to_string()
}

/// A server-reported cost interval `[start_time, end_time)` in Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostBucket {
    #[serde(default = "default_bucket_object")]
    pub object: String,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub results: Vec<CostResult>,
}

fn default_bucket_object() -> String {
    "bucket".to_string()
}

/// One page of the organization costs endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostPage {
    #[serde(default = "default_page_object")]
    pub object: String,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(default)]
    pub data: Vec<CostBucket>,
}

fn default_page_object() -> String {
    "page".to_string()
}

impl CostPage {
    /// A final page carrying the given buckets.
    #[must_use]
    pub fn last(data: Vec<CostBucket>) -> Self {
        Self {
            object: default_page_object(),
            has_more: false,
            next_page: None,
            data,
        }
    }
}

// =============================================================================
// Aggregate Views
// =============================================================================

/// Cost and estimated tokens for one model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsage {
    pub model: String,
    pub total_cost: f64,
    pub total_tokens: i64,
}

/// Cost and estimated tokens for one project.
///
/// `project_id` is `None` for results the API did not attribute to a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUsage {
    #[serde(rename = "project_id")]
    pub project_id: Option<String>,
    pub name: String,
    pub total_cost: f64,
    pub total_tokens: i64,
}

/// A single daily cost point. Multiple points may share a day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageData {
    /// Calendar date, `YYYY-MM-DD`.
    pub timestamp: String,
    pub model: String,
    pub cost: f64,
    pub tokens: i64,
    pub project_id: Option<String>,
}

/// The pipeline's aggregate output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub total_cost: f64,
    pub model_usage: Vec<ModelUsage>,
    pub project_usage: Vec<ProjectUsage>,
    pub daily_usage: Vec<UsageData>,
}

impl UsageResponse {
    /// Sum of daily point costs grouped by date, in first-seen date order.
    #[must_use]
    pub fn cost_by_day(&self) -> Vec<(String, f64)> {
        let mut days: Vec<(String, f64)> = Vec::new();
        for point in &self.daily_usage {
            match days.iter_mut().find(|(day, _)| *day == point.timestamp) {
                Some((_, cost)) => *cost += point.cost,
                None => days.push((point.timestamp.clone(), point.cost)),
            }
        }
        days
    }
}

/// Whether a response came from the API or from the mock generator.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageOutcome {
    /// Every bucket came from the API.
    Real(UsageResponse),
    /// Some or all of the data was synthesized after a failure.
    Synthetic(UsageResponse),
}

impl UsageOutcome {
    /// Borrow the response regardless of origin.
    #[must_use]
    pub const fn response(&self) -> &UsageResponse {
        match self {
            Self::Real(response) | Self::Synthetic(response) => response,
        }
    }

    /// Take the response regardless of origin.
    #[must_use]
    pub fn into_response(self) -> UsageResponse {
        match self {
            Self::Real(response) | Self::Synthetic(response) => response,
        }
    }

    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }

    /// Source label for output.
    #[must_use]
    pub const fn source_label(&self) -> &'static str {
        match self {
            Self::Real(_) => "api",
            Self::Synthetic(_) => "mock",
        }
    }
}

// =============================================================================
// Robot Output
// =============================================================================

/// Payload of the `costs` command in robot mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostsPayload {
    pub source: String,
    pub synthetic: bool,
    pub start_date: String,
    pub end_date: String,
    pub usage: UsageResponse,
}

impl CostsPayload {
    /// Build a payload from a pipeline outcome.
    #[must_use]
    pub fn from_outcome(outcome: &UsageOutcome, start_date: &str, end_date: &str) -> Self {
        Self {
            source: outcome.source_label().to_string(),
            synthetic: outcome.is_synthetic(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            usage: outcome.response().clone(),
        }
    }
}

/// Payload of the `pricing` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPayload {
    pub models: Vec<ModelPricing>,
    pub tools: Vec<ToolPricing>,
    /// Rate applied to models missing from the table.
    pub fallback_per_million: f64,
}

impl PricingPayload {
    #[must_use]
    pub fn from_table(table: &PricingTable) -> Self {
        Self {
            models: table.models().cloned().collect(),
            tools: table.tools().to_vec(),
            fallback_per_million: FALLBACK_RATE_PER_MILLION,
        }
    }
}

/// Payload of the `validate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPayload {
    pub valid: bool,
    pub base_url: String,
}

/// Versioned JSON envelope for machine-readable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotOutput<T> {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub command: String,
    pub data: T,

    #[serde(default)]
    pub errors: Vec<String>,

    pub meta: RobotMeta,
}

/// Metadata for robot output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotMeta {
    pub format: String,
    pub runtime: String,
}

impl<T> RobotOutput<T> {
    /// Create a new robot output envelope.
    pub fn new(command: impl Into<String>, data: T) -> Self {
        Self::with_errors(command, data, Vec::new())
    }

    /// Create with errors.
    pub fn with_errors(command: impl Into<String>, data: T, errors: Vec<String>) -> Self {
        Self {
            schema_version: "orgcost.v1".to_string(),
            generated_at: Utc::now(),
            command: command.into(),
            data,
            errors,
            meta: RobotMeta {
                format: "json".to_string(),
                runtime: "cli".to_string(),
            },
        }
    }
}
