//! Single-page fetches from the organization costs endpoint.
//!
//! A page request is retried on rate limits and transient failures with a
//! shared budget of [`MAX_RETRIES`]. Once the budget is spent, or the failure
//! is not worth retrying, the fetcher substitutes a synthetic page for the
//! whole requested range instead of surfacing the error.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::core::backoff::{BackoffPolicy, Sleeper, TokioSleeper};
use crate::core::http::{
    COSTS_PATH, authorized_get, endpoint, error_message, map_transport_error, retry_after,
};
use crate::core::mock_data::MockDataGenerator;
use crate::core::models::CostPage;
use crate::error::{OrgcostError, Result};
use crate::util::time::DateRange;

/// Retries allowed per page request (so at most `MAX_RETRIES + 1` requests).
pub const MAX_RETRIES: u32 = 3;

/// Optional server-side filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostFilters {
    pub project_ids: Vec<String>,
    pub models: Vec<String>,
}

/// Everything needed to request one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub credential: String,
    pub range: DateRange,
    pub filters: CostFilters,
    pub page_token: Option<String>,
}

impl PageRequest {
    #[must_use]
    pub fn new(credential: impl Into<String>, range: DateRange) -> Self {
        Self {
            credential: credential.into(),
            range,
            filters: CostFilters::default(),
            page_token: None,
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: CostFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Query parameters for this request, in the order the API documents them.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("start_time", self.range.start_timestamp().to_string()),
            ("end_time", self.range.end_timestamp().to_string()),
        ];
        if !self.filters.project_ids.is_empty() {
            params.push(("project_ids", self.filters.project_ids.join(",")));
        }
        if !self.filters.models.is_empty() {
            params.push(("models", self.filters.models.join(",")));
        }
        if let Some(token) = &self.page_token {
            params.push(("page", token.clone()));
        }
        params
    }
}

/// A page plus whether it was synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub page: CostPage,
    pub synthetic: bool,
}

impl FetchedPage {
    #[must_use]
    pub const fn real(page: CostPage) -> Self {
        Self {
            page,
            synthetic: false,
        }
    }

    #[must_use]
    pub const fn synthetic(page: CostPage) -> Self {
        Self {
            page,
            synthetic: true,
        }
    }
}

/// Anything that can produce cost pages.
pub trait CostPageSource: Send + Sync {
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<FetchedPage>> + Send;
}

/// Fetches cost pages over HTTP.
#[derive(Debug)]
pub struct CostFetcher<S = TokioSleeper> {
    client: Client,
    base_url: String,
    timeout: Duration,
    backoff: BackoffPolicy,
    sleeper: S,
    mock: Mutex<MockDataGenerator>,
}

impl<S: Sleeper> CostFetcher<S> {
    #[must_use]
    pub fn new(client: Client, base_url: String, timeout: Duration, sleeper: S) -> Self {
        Self {
            client,
            base_url,
            timeout,
            backoff: BackoffPolicy::default(),
            sleeper,
            mock: Mutex::new(MockDataGenerator::new()),
        }
    }

    #[must_use]
    pub const fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_mock(mut self, mock: MockDataGenerator) -> Self {
        self.mock = Mutex::new(mock);
        self
    }

    /// Issue one request with no retry handling.
    async fn request_once(&self, request: &PageRequest) -> Result<CostPage> {
        let url = endpoint(&self.base_url, COSTS_PATH);
        let response = authorized_get(&self.client, &url, &request.credential)
            .query(&request.query_params())
            .send()
            .await
            .map_err(|e| map_transport_error(&e, self.timeout))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(OrgcostError::RateLimited {
                retry_after: retry_after(&response),
                message: "Rate limit exceeded".to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(&e, self.timeout))?;

        if !status.is_success() {
            return Err(OrgcostError::ProviderApiError {
                status_code: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(|e| OrgcostError::ParseResponse(e.to_string()))
    }

    fn synthetic_page(&self, range: &DateRange) -> FetchedPage {
        let page = match self.mock.lock() {
            Ok(mut mock) => mock.cost_page(range),
            Err(poisoned) => poisoned.into_inner().cost_page(range),
        };
        FetchedPage::synthetic(page)
    }
}

impl<S: Sleeper> CostPageSource for CostFetcher<S> {
    /// Fetch one page, retrying and finally substituting synthetic data.
    ///
    /// Returns `Err` only when the request has no credential.
    async fn fetch_page(&self, request: &PageRequest) -> Result<FetchedPage> {
        if request.credential.trim().is_empty() {
            return Err(OrgcostError::AuthNotConfigured);
        }

        let mut retries = 0_u32;
        loop {
            match self.request_once(request).await {
                Ok(page) => {
                    tracing::debug!(
                        buckets = page.data.len(),
                        has_more = page.has_more,
                        retries,
                        "Fetched cost page"
                    );
                    return Ok(FetchedPage::real(page));
                }
                Err(e) if e.is_retryable() && retries < MAX_RETRIES => {
                    retries += 1;
                    let wait = e
                        .retry_after()
                        .unwrap_or_else(|| self.backoff.compute_delay(retries));
                    tracing::warn!(
                        error = %e,
                        attempt = retries,
                        max_retries = MAX_RETRIES,
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        "Cost request failed, retrying"
                    );
                    self.sleeper.sleep(wait).await;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        code = e.error_code(),
                        retries,
                        "Giving up on cost request, substituting synthetic data"
                    );
                    return Ok(self.synthetic_page(&request.range));
                }
            }
        }
    }
}
