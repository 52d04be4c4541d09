//! Published pricing and token estimation.
//!
//! The costs endpoint reports money, not tokens. Token counts shown by
//! orgcost are estimated from cost using the per-model prices below.

use std::collections::HashMap;

use serde::Serialize;

/// Rate used when a model is not in the table, in USD per million tokens.
pub const FALLBACK_RATE_PER_MILLION: f64 = 1.0;

/// Per-million token pricing for a specific model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPricing {
    /// Model identifier (e.g., "gpt-4o").
    pub model: String,
    /// Cost per million input tokens (USD).
    pub input_per_million: f64,
    /// Cost per million output tokens (USD).
    pub output_per_million: f64,
}

impl ModelPricing {
    fn from_static(model: &str, input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            model: model.to_string(),
            input_per_million,
            output_per_million,
        }
    }

    /// Mean of input and output price, used as the effective blended rate.
    #[must_use]
    pub fn blended_rate(&self) -> f64 {
        (self.input_per_million + self.output_per_million) / 2.0
    }
}

/// Flat pricing for a hosted tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolPricing {
    pub name: String,
    pub cost: f64,
    pub unit: String,
}

/// Static pricing reference data.
#[derive(Debug, Clone)]
pub struct PricingTable {
    /// Model name to pricing mapping (normalized lowercase).
    models: HashMap<String, ModelPricing>,
    /// Lowercase model keys in publication order.
    order: Vec<String>,
    tools: Vec<ToolPricing>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::current()
    }
}

impl PricingTable {
    /// Pricing as published on the OpenAI pricing page.
    #[must_use]
    pub fn current() -> Self {
        let mut table = Self {
            models: HashMap::new(),
            order: Vec::new(),
            tools: Vec::new(),
        };

        table.add_model("gpt-4o", 5.00, 15.00);
        table.add_model("gpt-4o-mini", 1.10, 4.40);
        table.add_model("gpt-3.5-turbo", 0.50, 1.50);

        table.add_tool("Code Interpreter", 0.03, "per session");
        table.add_tool("File Search Storage", 0.10, "per GB/day (1GB free)");
        table.add_tool("File Search Tool Call", 2.50, "per 1k calls");

        table
    }

    fn add_model(&mut self, model: &str, input: f64, output: f64) {
        let key = model.to_lowercase();
        if !self.models.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.models
            .insert(key, ModelPricing::from_static(model, input, output));
    }

    fn add_tool(&mut self, name: &str, cost: f64, unit: &str) {
        self.tools.push(ToolPricing {
            name: name.to_string(),
            cost,
            unit: unit.to_string(),
        });
    }

    /// Look up pricing for a model by name (case-insensitive exact match).
    #[must_use]
    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.models.get(&model.to_lowercase())
    }

    /// Models in publication order.
    pub fn models(&self) -> impl Iterator<Item = &ModelPricing> {
        self.order.iter().filter_map(|key| self.models.get(key))
    }

    /// Tool pricing in publication order.
    #[must_use]
    pub fn tools(&self) -> &[ToolPricing] {
        &self.tools
    }

    /// Estimate a token count from a cost.
    ///
    /// Uses the mean of the model's input and output price as the rate, or
    /// [`FALLBACK_RATE_PER_MILLION`] for unknown models, and floors the result.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn estimate_tokens(&self, cost: f64, model: &str) -> i64 {
        let rate = self
            .get(model)
            .map_or(FALLBACK_RATE_PER_MILLION, ModelPricing::blended_rate);
        ((cost / rate) * 1_000_000.0).floor() as i64
    }
}
