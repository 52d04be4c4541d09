//! Integration tests for following cost page cursors over HTTP.

mod common;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orgcost::core::cost_fetcher::PageRequest;
use orgcost::core::http::COSTS_PATH;
use orgcost::core::pagination::{MAX_PAGES, PAGE_DELAY, fetch_all};
use orgcost::RecordingSleeper;

use common::fixtures::{TEST_KEY, fixture_json, november_range, recording_fetcher, requests_to};
use common::logger::TestLogger;

#[tokio::test]
async fn follows_next_page_cursor() {
    let log = TestLogger::new("follows_next_page_cursor");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .and(query_param("page", "page_2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixture_json("costs/page_second.json")),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixture_json("costs/page_first.json")),
        )
        .mount(&server)
        .await;
    let sleeper = RecordingSleeper::new();
    let fetcher = recording_fetcher(&server, &sleeper);

    log.phase("execute");
    let result = fetch_all(&fetcher, &sleeper, PageRequest::new(TEST_KEY, november_range())).await;

    log.phase("verify");
    assert_eq!(result.pages, 2);
    assert_eq!(result.buckets.len(), 3);
    assert_eq!(result.buckets[0].start_time, 1_730_419_200);
    assert_eq!(result.buckets[2].start_time, 1_730_592_000);
    assert!(!result.synthetic);
    assert!(!result.truncated);
    assert_eq!(sleeper.delays(), vec![PAGE_DELAY]);
    log.finish_ok();
}

#[tokio::test]
async fn endless_cursor_stops_at_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "page",
            "has_more": true,
            "next_page": "again",
            "data": [{ "start_time": 1730419200, "end_time": 1730505600, "results": [] }]
        })))
        .mount(&server)
        .await;
    let sleeper = RecordingSleeper::new();
    let fetcher = recording_fetcher(&server, &sleeper);

    let result = fetch_all(&fetcher, &sleeper, PageRequest::new(TEST_KEY, november_range())).await;

    assert_eq!(result.pages, MAX_PAGES);
    assert!(result.truncated);
    assert_eq!(requests_to(&server, COSTS_PATH).await, MAX_PAGES);
    assert_eq!(sleeper.delays().len(), MAX_PAGES - 1);
}

#[tokio::test]
async fn has_more_without_cursor_stops_with_warning() {
    let (log, capture) = TestLogger::with_capture("has_more_without_cursor_stops_with_warning");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "page",
            "has_more": true,
            "data": [{ "start_time": 1730419200, "end_time": 1730505600, "results": [] }]
        })))
        .mount(&server)
        .await;
    let sleeper = RecordingSleeper::new();
    let fetcher = recording_fetcher(&server, &sleeper);

    let result = fetch_all(&fetcher, &sleeper, PageRequest::new(TEST_KEY, november_range())).await;

    assert_eq!(result.pages, 1);
    assert!(!result.truncated);
    assert_eq!(requests_to(&server, COSTS_PATH).await, 1);
    capture.assert_logged_at_level(tracing::Level::WARN, "without a next page token");
    log.finish_ok();
}

#[tokio::test]
async fn blank_credential_yields_nothing() {
    let (_log, capture) = TestLogger::with_capture("blank_credential_yields_nothing");
    let server = MockServer::start().await;
    let sleeper = RecordingSleeper::new();
    let fetcher = recording_fetcher(&server, &sleeper);

    let result = fetch_all(&fetcher, &sleeper, PageRequest::new("", november_range())).await;

    assert_eq!(result.pages, 0);
    assert!(result.buckets.is_empty());
    assert_eq!(capture.count_at_level(tracing::Level::ERROR), 1);
}
