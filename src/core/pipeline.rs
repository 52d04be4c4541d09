//! Usage pipeline: validate, paginate, aggregate.
//!
//! The pipeline never fails outward. Anything that prevents real data from
//! being produced turns into [`UsageOutcome::Synthetic`].

use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use super::aggregator::aggregate;
use super::backoff::{BackoffPolicy, Sleeper, TokioSleeper};
use super::cost_fetcher::{CostFetcher, CostFilters, PageRequest};
use super::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, build_client};
use super::mock_data::MockDataGenerator;
use super::models::{UsageOutcome, UsageResponse};
use super::pagination::fetch_all;
use super::pricing::PricingTable;
use super::validator::{CredentialValidator, resolve_credential};
use crate::error::Result;
use crate::util::time::DateRange;

/// Connection settings, resolved once by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    /// Used whenever a call passes a blank credential.
    pub default_credential: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_credential: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Top-level entry point for cost queries.
#[derive(Debug)]
pub struct UsagePipeline<S = TokioSleeper> {
    validator: CredentialValidator,
    fetcher: CostFetcher<S>,
    sleeper: S,
    pricing: PricingTable,
    default_credential: Option<String>,
    mock: Mutex<MockDataGenerator>,
}

impl UsagePipeline<TokioSleeper> {
    /// Build a pipeline that sleeps on the tokio timer.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        Self::with_sleeper(settings, TokioSleeper)
    }
}

impl<S: Sleeper + Clone> UsagePipeline<S> {
    /// Build a pipeline with a custom sleeper.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn with_sleeper(settings: ClientSettings, sleeper: S) -> Result<Self> {
        let client = build_client(settings.timeout)?;
        let validator = CredentialValidator::new(
            client.clone(),
            settings.base_url.clone(),
            settings.default_credential.clone(),
        );
        let fetcher = CostFetcher::new(
            client,
            settings.base_url,
            settings.timeout,
            sleeper.clone(),
        );

        Ok(Self {
            validator,
            fetcher,
            sleeper,
            pricing: PricingTable::current(),
            default_credential: settings.default_credential,
            mock: Mutex::new(MockDataGenerator::new()),
        })
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.fetcher = self.fetcher.with_backoff(backoff);
        self
    }

    /// Seed both synthetic data sources.
    #[must_use]
    pub fn with_mock_seed(mut self, seed: u64) -> Self {
        self.fetcher = self.fetcher.with_mock(MockDataGenerator::with_seed(seed));
        self.mock = Mutex::new(MockDataGenerator::with_seed(seed.wrapping_add(1)));
        self
    }

    #[must_use]
    pub const fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Credential used when a call passes a blank one.
    #[must_use]
    pub fn default_credential(&self) -> Option<&str> {
        self.default_credential.as_deref()
    }

    /// Check a credential against the API.
    pub async fn validate(&self, credential: &str) -> bool {
        self.validator.validate(credential).await
    }

    /// Fetch and aggregate costs between two `YYYY-MM-DD` dates.
    pub async fn fetch_usage(&self, credential: &str, start: &str, end: &str) -> UsageOutcome {
        match DateRange::parse(start, end) {
            Ok(range) => {
                self.fetch_usage_for_range(credential, range, CostFilters::default())
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, start, end, "Invalid date range, returning empty synthetic data");
                UsageOutcome::Synthetic(UsageResponse::default())
            }
        }
    }

    /// Fetch and aggregate costs for `today - days ..= today`.
    pub async fn fetch_usage_for_last_days(
        &self,
        credential: &str,
        days: u32,
        today: NaiveDate,
    ) -> UsageOutcome {
        let range = DateRange::last_days(today, days);
        self.fetch_usage_for_range(credential, range, CostFilters::default())
            .await
    }

    /// Fetch and aggregate costs for a parsed range with optional filters.
    pub async fn fetch_usage_for_range(
        &self,
        credential: &str,
        range: DateRange,
        filters: CostFilters,
    ) -> UsageOutcome {
        let Some(credential) = resolve_credential(credential, self.default_credential.as_deref())
        else {
            tracing::warn!("No API credential available, returning synthetic data");
            return UsageOutcome::Synthetic(self.synthetic_response(&range));
        };

        let start = Instant::now();
        let request = PageRequest::new(credential, range).with_filters(filters);
        let paginated = fetch_all(&self.fetcher, &self.sleeper, request).await;

        let response = match aggregate(&paginated.buckets, &self.pricing) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Aggregation failed, returning synthetic data");
                return UsageOutcome::Synthetic(self.synthetic_response(&range));
            }
        };

        tracing::info!(
            start_date = %range.start_str(),
            end_date = %range.end_str(),
            pages = paginated.pages,
            buckets = paginated.buckets.len(),
            synthetic = paginated.synthetic,
            truncated = paginated.truncated,
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Cost query complete"
        );

        if paginated.synthetic {
            UsageOutcome::Synthetic(response)
        } else {
            UsageOutcome::Real(response)
        }
    }

    fn synthetic_response(&self, range: &DateRange) -> UsageResponse {
        match self.mock.lock() {
            Ok(mut mock) => mock.usage_response(range),
            Err(poisoned) => poisoned.into_inner().usage_response(range),
        }
    }
}
