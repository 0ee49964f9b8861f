//! Integration tests for the fetcher against a stubbed ArcGIS layer.

use chrono::NaiveDate;
use permitscope::config::ServiceConfig;
use permitscope::error::FetchError;
use permitscope::fetch::PermitService;
use permitscope::record::FetchWindow;
use serde_json::{json, Value};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn feature(id: i64, issued_ms: i64) -> Value {
    json!({
        "attributes": {
            "OBJECTID": id,
            "ISSUE_DATE": issued_ms,
            "TYPE": "ELECTRICAL",
            "BLDB_ACTIVITY_1": "ALTERATION",
            "DESCRIPTION": format!("permit {id}"),
            "ADDRESS": "101 MAIN ST"
        },
        "geometry": { "x": -78.9, "y": 36.0 }
    })
}

fn page(features: Vec<Value>) -> String {
    json!({ "features": features }).to_string()
}

fn service(server: &MockServer, page_size: u32, max_pages: u32) -> PermitService {
    PermitService::new(ServiceConfig {
        endpoint: format!("{}/query", server.uri()),
        page_size,
        max_pages,
        timeout_ms: 5_000,
        ..ServiceConfig::default()
    })
}

fn window() -> FetchWindow {
    FetchWindow::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_sends_windowed_where_clause() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param(
            "where",
            "ISSUE_DATE >= TIMESTAMP '2024-01-01 00:00:00' \
             AND ISSUE_DATE <= TIMESTAMP '2024-03-31 23:59:59'",
        ))
        .and(query_param("f", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(vec![feature(1, 100)])))
        .expect(1)
        .mount(&server)
        .await;

    let records = service(&server, 2000, 100).fetch(&window()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 1);
}

#[tokio::test]
async fn test_fetch_pages_until_short_page_and_sorts_newest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("resultOffset", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(vec![feature(1, 100), feature(2, 300)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("resultOffset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(vec![feature(3, 200)])))
        .mount(&server)
        .await;

    let records = service(&server, 2, 100).fetch(&window()).await.unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[tokio::test]
async fn test_fetch_deduplicates_overlapping_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("resultOffset", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(vec![feature(1, 300), feature(2, 200)])),
        )
        .mount(&server)
        .await;
    // The layer shifted under the offset walk; record 2 repeats.
    Mock::given(method("GET"))
        .and(query_param("resultOffset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(vec![feature(2, 200)])))
        .mount(&server)
        .await;

    let records = service(&server, 2, 100).fetch(&window()).await.unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_empty_day_is_empty_batch_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(vec![])))
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let w = FetchWindow::new(day, day).unwrap();
    let records = service(&server, 2000, 100).fetch(&w).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_fetch_retries_through_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(vec![feature(1, 100)])))
        .mount(&server)
        .await;

    let records = service(&server, 2000, 100).fetch(&window()).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_fetch_retries_through_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(vec![feature(1, 100)])))
        .mount(&server)
        .await;

    let records = service(&server, 2000, 100).fetch(&window()).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_persistent_server_error_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = service(&server, 2000, 100)
        .fetch(&window())
        .await
        .unwrap_err();
    assert!(err.is_retryable(), "5xx after retries should be transient");
}

#[tokio::test]
async fn test_client_error_is_malformed_not_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid where clause"))
        .mount(&server)
        .await;

    let err = service(&server, 2000, 100)
        .fetch(&window())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = service(&server, 2000, 100)
        .fetch(&window())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_service_error_payload_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            json!({ "error": { "code": 500, "message": "Unable to complete operation." } })
                .to_string(),
        ))
        .mount(&server)
        .await;

    let err = service(&server, 2000, 100)
        .fetch(&window())
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_never_ending_pages_hit_the_page_limit() {
    let server = MockServer::start().await;

    // Every offset answers a full page; the walk can never finish.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(vec![feature(1, 100)])))
        .mount(&server)
        .await;

    let err = service(&server, 1, 3).fetch(&window()).await.unwrap_err();
    assert!(matches!(err, FetchError::PageLimitExceeded { pages: 3 }));
}

#[tokio::test]
async fn test_repeated_fetches_are_equivalent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(vec![feature(1, 100), feature(2, 200)])),
        )
        .mount(&server)
        .await;

    let svc = service(&server, 2000, 100);
    let first = svc.fetch(&window()).await.unwrap();
    let second = svc.fetch(&window()).await.unwrap();
    let ids = |batch: &[permitscope::record::PermitRecord]| {
        batch.iter().map(|r| r.id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}
