//! Cost page fixtures and mock server helpers.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orgcost::core::backoff::BackoffPolicy;
use orgcost::core::cost_fetcher::CostFetcher;
use orgcost::core::http::{COSTS_PATH, MODELS_PATH, build_client};
use orgcost::core::pipeline::{ClientSettings, UsagePipeline};
use orgcost::util::time::DateRange;
use orgcost::RecordingSleeper;

pub const TEST_KEY: &str = "sk-test-key";

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Load and deserialize a fixture under `tests/fixtures/`.
///
/// # Panics
///
/// Panics if the file cannot be read or parsed.
pub fn load_fixture<T: DeserializeOwned>(relative: &str) -> T {
    let full_path = fixtures_dir().join(relative);
    let content = fs::read_to_string(&full_path)
        .unwrap_or_else(|e| panic!("read fixture {}: {e}", full_path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("parse fixture {}: {e}", full_path.display()))
}

/// Raw fixture JSON for mock server bodies.
pub fn fixture_json(relative: &str) -> serde_json::Value {
    load_fixture(relative)
}

/// November 1st through 3rd, 2024.
pub fn november_range() -> DateRange {
    DateRange::parse("2024-11-01", "2024-11-03").expect("valid range")
}

/// Deterministic backoff: no jitter, small base.
pub fn fixed_backoff() -> BackoffPolicy {
    BackoffPolicy {
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(10_000),
        max_jitter: Duration::ZERO,
    }
}

pub fn settings_for(server: &MockServer) -> ClientSettings {
    ClientSettings {
        base_url: server.uri(),
        default_credential: None,
        timeout: Duration::from_secs(5),
    }
}

/// Fetcher pointed at the mock server that records instead of sleeping.
pub fn recording_fetcher(server: &MockServer, sleeper: &RecordingSleeper) -> CostFetcher<RecordingSleeper> {
    let client = build_client(Duration::from_secs(5)).expect("client build");
    CostFetcher::new(client, server.uri(), Duration::from_secs(5), sleeper.clone())
        .with_backoff(fixed_backoff())
}

/// Pipeline pointed at the mock server that records instead of sleeping.
pub fn recording_pipeline(
    server: &MockServer,
    sleeper: &RecordingSleeper,
) -> UsagePipeline<RecordingSleeper> {
    UsagePipeline::with_sleeper(settings_for(server), sleeper.clone())
        .expect("pipeline build")
        .with_backoff(fixed_backoff())
        .with_mock_seed(7)
}

/// Serve one page body for every costs request.
pub async fn mount_costs(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .and(header("authorization", format!("Bearer {TEST_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer the models endpoint with the given status.
pub async fn mount_models(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(MODELS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "object": "list",
            "data": []
        })))
        .mount(server)
        .await;
}

/// Number of requests the server saw on a path.
pub async fn requests_to(server: &MockServer, target: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == target)
        .count()
}
