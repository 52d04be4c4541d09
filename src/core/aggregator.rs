//! Folds raw cost buckets into per-model, per-project and daily views.

use std::collections::HashMap;
use std::hash::Hash;

use crate::core::models::{CostBucket, ModelUsage, ProjectUsage, UsageData, UsageResponse};
use crate::core::pricing::PricingTable;
use crate::error::{OrgcostError, Result};
use crate::util::time::date_of_timestamp;

/// Model name assigned to every cost line (the costs endpoint has no model).
pub const PLACEHOLDER_MODEL: &str = "api-usage";

/// Display name for results without a project.
pub const DEFAULT_PROJECT_NAME: &str = "Default Project";

#[derive(Debug, Default)]
struct Totals {
    cost: f64,
    tokens: i64,
}

/// Accumulator that remembers first-seen key order.
#[derive(Debug)]
struct OrderedTotals<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, Totals)>,
}

impl<K> Default for OrderedTotals<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> OrderedTotals<K> {
    fn entry(&mut self, key: K) -> &mut Totals {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push((key, Totals::default()));
                slot
            }
        };
        &mut self.entries[slot].1
    }
}

/// Aggregate buckets into a [`UsageResponse`].
///
/// Every result becomes one daily point tagged with [`PLACEHOLDER_MODEL`].
/// Results without a project share one [`DEFAULT_PROJECT_NAME`] entry.
/// Projects are ordered by descending cost, ties keeping first-seen order.
/// Buckets without results are skipped before their date is read.
///
/// # Errors
///
/// Returns [`OrgcostError::ParseResponse`] if a non-empty bucket's
/// `start_time` is not a representable timestamp.
pub fn aggregate(buckets: &[CostBucket], pricing: &PricingTable) -> Result<UsageResponse> {
    let mut models = OrderedTotals::<&str>::default();
    let mut projects = OrderedTotals::<Option<&str>>::default();
    let mut daily_usage = Vec::new();

    for bucket in buckets.iter().filter(|b| !b.results.is_empty()) {
        let timestamp = date_of_timestamp(bucket.start_time).ok_or_else(|| {
            OrgcostError::ParseResponse(format!(
                "bucket start_time {} is out of range",
                bucket.start_time
            ))
        })?;

        for result in &bucket.results {
            let cost = result.amount.value;
            let tokens = pricing.estimate_tokens(cost, PLACEHOLDER_MODEL);
            models.entry(PLACEHOLDER_MODEL).cost += cost;

            let project = projects.entry(result.project_id.as_deref());
            project.cost += cost;
            project.tokens += tokens;

            daily_usage.push(UsageData {
                timestamp: timestamp.clone(),
                model: PLACEHOLDER_MODEL.to_string(),
                cost,
                tokens,
                project_id: result.project_id.clone(),
            });
        }
    }

    let model_usage: Vec<ModelUsage> = models
        .entries
        .into_iter()
        .map(|(model, totals)| ModelUsage {
            total_tokens: pricing.estimate_tokens(totals.cost, model),
            model: model.to_string(),
            total_cost: totals.cost,
        })
        .collect();

    let mut project_usage: Vec<ProjectUsage> = projects
        .entries
        .into_iter()
        .map(|(project_id, totals)| ProjectUsage {
            project_id: project_id.map(str::to_string),
            name: project_id.unwrap_or(DEFAULT_PROJECT_NAME).to_string(),
            total_cost: totals.cost,
            total_tokens: totals.tokens,
        })
        .collect();
    project_usage.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));

    let total_cost = model_usage.iter().map(|m| m.total_cost).sum();

    tracing::debug!(
        buckets = buckets.len(),
        points = daily_usage.len(),
        projects = project_usage.len(),
        total_cost,
        "Aggregated cost buckets"
    );

    Ok(UsageResponse {
        total_cost,
        model_usage,
        project_usage,
        daily_usage,
    })
}
