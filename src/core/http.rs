//! HTTP client utilities.
//!
//! Provides the shared HTTP client and endpoint helpers for the OpenAI API.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::error::{OrgcostError, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the endpoint used to check that a key is accepted.
pub const MODELS_PATH: &str = "/v1/models";

/// Path of the organization costs endpoint.
pub const COSTS_PATH: &str = "/v1/organization/costs";

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("orgcost/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| OrgcostError::Network(e.to_string()))
}

/// Join a base URL and an absolute endpoint path.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Start an authenticated GET request.
pub fn authorized_get(client: &Client, url: &str, credential: &str) -> RequestBuilder {
    client.get(url).bearer_auth(credential)
}

/// Map a transport error to an orgcost error.
#[must_use]
pub fn map_transport_error(err: &reqwest::Error, timeout: Duration) -> OrgcostError {
    if err.is_timeout() {
        OrgcostError::Timeout(timeout.as_secs())
    } else {
        OrgcostError::Network(err.to_string())
    }
}

/// Parse a `Retry-After` header given in whole seconds.
#[must_use]
pub fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Extract a human-readable message from an error response body.
///
/// Understands both `{"error": {"message": ...}}` and `{"message": ...}`;
/// anything else yields a generic status-coded message.
#[must_use]
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .error
                .and_then(|detail| detail.message)
                .or(parsed.message)
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status: {}", status.as_u16()))
}
