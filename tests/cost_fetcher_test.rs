//! Integration tests for single-page cost fetches against a mock API.
//!
//! Covers:
//! - Rate limit retries with exponential backoff and `Retry-After`
//! - Giving up on client errors and exhausted retries
//! - Connection failures and timeouts sharing the same retry budget
//! - Query parameters and bearer authentication

mod common;

use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orgcost::core::cost_fetcher::{
    CostFetcher, CostFilters, CostPageSource, MAX_RETRIES, PageRequest,
};
use orgcost::core::http::{COSTS_PATH, build_client};
use orgcost::core::models::CostPage;
use orgcost::error::OrgcostError;
use orgcost::RecordingSleeper;

use common::fixtures::{
    TEST_KEY, fixed_backoff, fixture_json, load_fixture, mount_costs, november_range, recording_fetcher,
    requests_to,
};
use common::logger::TestLogger;

fn request() -> PageRequest {
    PageRequest::new(TEST_KEY, november_range())
}

async fn mount_status(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "error": { "message": format!("status {status}") }
        })))
        .up_to_n_times(times)
        .with_priority(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn success_returns_real_page() {
    let log = TestLogger::new("success_returns_real_page");
    let server = MockServer::start().await;
    mount_costs(&server, fixture_json("costs/page_single.json")).await;
    let sleeper = RecordingSleeper::new();

    log.phase("execute");
    let fetched = recording_fetcher(&server, &sleeper)
        .fetch_page(&request())
        .await
        .expect("credential present");

    log.phase("verify");
    let expected: CostPage = load_fixture("costs/page_single.json");
    assert!(!fetched.synthetic);
    assert_eq!(fetched.page, expected);
    assert!(sleeper.delays().is_empty());
    log.finish_ok();
}

#[tokio::test]
async fn rate_limited_three_times_then_success() {
    let log = TestLogger::new("rate_limited_three_times_then_success");
    let server = MockServer::start().await;
    mount_status(&server, 429, 3).await;
    mount_costs(&server, fixture_json("costs/page_single.json")).await;
    let sleeper = RecordingSleeper::new();

    log.phase("execute");
    let fetched = recording_fetcher(&server, &sleeper)
        .fetch_page(&request())
        .await
        .unwrap();

    log.phase("verify");
    assert!(!fetched.synthetic);
    assert_eq!(fetched.page.data.len(), 1);
    assert_eq!(
        sleeper.delays(),
        vec![
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(800),
        ]
    );
    assert_eq!(requests_to(&server, COSTS_PATH).await, 4);
    log.finish_ok();
}

#[tokio::test]
async fn retry_after_header_is_honored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_costs(&server, fixture_json("costs/page_single.json")).await;
    let sleeper = RecordingSleeper::new();

    let fetched = recording_fetcher(&server, &sleeper)
        .fetch_page(&request())
        .await
        .unwrap();

    assert!(!fetched.synthetic);
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(7)]);
}

#[tokio::test]
async fn exhausted_rate_limits_fall_back_to_synthetic() {
    let server = MockServer::start().await;
    mount_status(&server, 429, 100).await;
    let sleeper = RecordingSleeper::new();

    let fetched = recording_fetcher(&server, &sleeper)
        .fetch_page(&request())
        .await
        .unwrap();

    assert!(fetched.synthetic);
    assert!(!fetched.page.has_more);
    assert_eq!(sleeper.delays().len(), MAX_RETRIES as usize);
    assert_eq!(
        requests_to(&server, COSTS_PATH).await,
        MAX_RETRIES as usize + 1
    );
}

#[tokio::test]
async fn server_errors_are_retried_until_exhausted() {
    let server = MockServer::start().await;
    mount_status(&server, 503, 100).await;
    let sleeper = RecordingSleeper::new();

    let fetched = recording_fetcher(&server, &sleeper)
        .fetch_page(&request())
        .await
        .unwrap();

    assert!(fetched.synthetic);
    assert_eq!(requests_to(&server, COSTS_PATH).await, 4);
    assert_eq!(sleeper.delays().len(), 3);
}

#[tokio::test]
async fn connection_refused_is_retried_then_synthetic() {
    let log = TestLogger::new("connection_refused_is_retried_then_synthetic");
    let sleeper = RecordingSleeper::new();
    let timeout = Duration::from_secs(2);
    let fetcher = CostFetcher::new(
        build_client(timeout).unwrap(),
        "http://127.0.0.1:9".to_string(),
        timeout,
        sleeper.clone(),
    )
    .with_backoff(fixed_backoff());

    log.phase("execute");
    let fetched = fetcher.fetch_page(&request()).await.unwrap();

    log.phase("verify");
    assert!(fetched.synthetic);
    assert!(!fetched.page.has_more);
    assert_eq!(
        sleeper.delays(),
        vec![
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(800),
        ]
    );
    log.finish_ok();
}

#[tokio::test]
async fn slow_responses_time_out_and_share_the_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixture_json("costs/page_single.json"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let sleeper = RecordingSleeper::new();
    let timeout = Duration::from_millis(200);
    let fetcher = CostFetcher::new(
        build_client(timeout).unwrap(),
        server.uri(),
        timeout,
        sleeper.clone(),
    )
    .with_backoff(fixed_backoff());

    let fetched = fetcher.fetch_page(&request()).await.unwrap();

    assert!(fetched.synthetic);
    assert_eq!(sleeper.delays().len(), MAX_RETRIES as usize);
    assert_eq!(
        requests_to(&server, COSTS_PATH).await,
        MAX_RETRIES as usize + 1
    );
}

#[tokio::test]
async fn client_error_gives_up_immediately() {
    let server = MockServer::start().await;
    mount_status(&server, 403, 100).await;
    let sleeper = RecordingSleeper::new();

    let fetched = recording_fetcher(&server, &sleeper)
        .fetch_page(&request())
        .await
        .unwrap();

    assert!(fetched.synthetic);
    assert_eq!(requests_to(&server, COSTS_PATH).await, 1);
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn malformed_body_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_costs(&server, fixture_json("costs/page_single.json")).await;
    let sleeper = RecordingSleeper::new();

    let fetched = recording_fetcher(&server, &sleeper)
        .fetch_page(&request())
        .await
        .unwrap();

    assert!(!fetched.synthetic);
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(200)]);
}

#[tokio::test]
async fn sends_range_filters_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(query_param("start_time", "1730419200"))
        .and(query_param("end_time", "1730592000"))
        .and(query_param("project_ids", "proj_a,proj_b"))
        .and(query_param("models", "gpt-4o"))
        .and(query_param("page", "cursor_9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixture_json("costs/page_single.json")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let sleeper = RecordingSleeper::new();

    let mut request = request().with_filters(CostFilters {
        project_ids: vec!["proj_a".to_string(), "proj_b".to_string()],
        models: vec!["gpt-4o".to_string()],
    });
    request.page_token = Some("cursor_9".to_string());

    let fetched = recording_fetcher(&server, &sleeper)
        .fetch_page(&request)
        .await
        .unwrap();

    assert!(!fetched.synthetic);
}

#[tokio::test]
async fn blank_credential_is_an_error_without_a_request() {
    let server = MockServer::start().await;
    let sleeper = RecordingSleeper::new();

    let result = recording_fetcher(&server, &sleeper)
        .fetch_page(&PageRequest::new("   ", november_range()))
        .await;

    assert!(matches!(result, Err(OrgcostError::AuthNotConfigured)));
    assert_eq!(requests_to(&server, COSTS_PATH).await, 0);
}
