//! Synthetic cost data.
//!
//! Used whenever real data cannot be obtained, so callers always receive a
//! structurally valid result. Two shapes are produced: a raw [`CostPage`]
//! (substituted by the cost fetcher) and a complete [`UsageResponse`]
//! (substituted by the pipeline when aggregation fails).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::models::{
    CostAmount, CostBucket, CostPage, CostResult, ModelUsage, ProjectUsage, UsageData,
    UsageResponse,
};
use crate::util::time::{DATE_FORMAT, DateRange, SECONDS_PER_DAY, day_start_timestamp};

/// Probability that a given day (or project-day) has any cost.
pub const ACTIVE_DAY_PROBABILITY: f64 = 0.7;

/// Organization id stamped on synthetic results.
pub const MOCK_ORGANIZATION_ID: &str = "org-mock-123456";

/// Synthetic projects: id and display name.
pub const MOCK_PROJECTS: [(Option<&str>, &str); 3] = [
    (Some("proj_123456"), "Production API"),
    (Some("proj_789012"), "Development API"),
    (None, "Default Project"),
];

/// Synthetic model profile: name, max daily cost, max daily tokens.
struct MockModel {
    name: &'static str,
    max_cost: f64,
    max_tokens: i64,
}

const MOCK_MODELS: [MockModel; 2] = [
    MockModel {
        name: "gpt-4o",
        max_cost: 0.8,
        max_tokens: 8000,
    },
    MockModel {
        name: "gpt-3.5-turbo",
        max_cost: 0.3,
        max_tokens: 20_000,
    },
];

/// Generates synthetic cost data from a seedable RNG.
#[derive(Debug)]
pub struct MockDataGenerator {
    rng: StdRng,
}

impl Default for MockDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDataGenerator {
    /// Generator seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and reproducible demos.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One daily bucket per day in the range; about 70% carry a single result.
    pub fn cost_page(&mut self, range: &DateRange) -> CostPage {
        let mut data = Vec::new();

        for day in range.days() {
            let start_time = day_start_timestamp(day);
            let results = if self.rng.gen_bool(ACTIVE_DAY_PROBABILITY) {
                vec![CostResult {
                    object: "organization.costs.result".to_string(),
                    amount: CostAmount {
                        value: self.rng.gen_range(0.0..0.5),
                        currency: "usd".to_string(),
                    },
                    line_item: None,
                    project_id: None,
                    organization_id: MOCK_ORGANIZATION_ID.to_string(),
                }]
            } else {
                Vec::new()
            };

            data.push(CostBucket {
                object: "bucket".to_string(),
                start_time,
                end_time: start_time + SECONDS_PER_DAY,
                results,
            });
        }

        CostPage::last(data)
    }

    /// A complete response spread over three projects and two models.
    pub fn usage_response(&mut self, range: &DateRange) -> UsageResponse {
        let mut daily_usage = Vec::new();

        for day in range.days() {
            let timestamp = day.format(DATE_FORMAT).to_string();
            for (project_id, _) in MOCK_PROJECTS {
                if !self.rng.gen_bool(ACTIVE_DAY_PROBABILITY) {
                    continue;
                }
                let model = if self.rng.gen_bool(0.5) {
                    &MOCK_MODELS[0]
                } else {
                    &MOCK_MODELS[1]
                };
                daily_usage.push(UsageData {
                    timestamp: timestamp.clone(),
                    model: model.name.to_string(),
                    cost: self.rng.gen_range(0.0..model.max_cost),
                    tokens: self.rng.gen_range(0..model.max_tokens),
                    project_id: project_id.map(str::to_string),
                });
            }
        }

        let model_usage: Vec<ModelUsage> = MOCK_MODELS
            .iter()
            .map(|model| {
                let points = daily_usage.iter().filter(|p| p.model == model.name);
                let (total_cost, total_tokens) = points
                    .fold((0.0, 0), |(cost, tokens), p| (cost + p.cost, tokens + p.tokens));
                ModelUsage {
                    model: model.name.to_string(),
                    total_cost,
                    total_tokens,
                }
            })
            .collect();

        let mut project_usage: Vec<ProjectUsage> = MOCK_PROJECTS
            .iter()
            .map(|(project_id, name)| {
                let points = daily_usage
                    .iter()
                    .filter(|p| p.project_id.as_deref() == *project_id);
                let (total_cost, total_tokens) = points
                    .fold((0.0, 0), |(cost, tokens), p| (cost + p.cost, tokens + p.tokens));
                ProjectUsage {
                    project_id: project_id.map(str::to_string),
                    name: (*name).to_string(),
                    total_cost,
                    total_tokens,
                }
            })
            .filter(|project| project.total_cost > 0.0)
            .collect();
        project_usage.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));

        let total_cost = model_usage.iter().map(|m| m.total_cost).sum();

        UsageResponse {
            total_cost,
            model_usage,
            project_usage,
            daily_usage,
        }
    }
}
