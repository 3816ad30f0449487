use std::time::Duration;

use krestate_api::{BreakerConfig, CircuitState, FetchConfig, FetchError, OpenDataClient, RetryPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client with millisecond-scale timeouts so retry paths finish quickly.
fn fast_client(max_attempts: u32, failure_threshold: u32) -> OpenDataClient {
    OpenDataClient::with_config(FetchConfig {
        connect_timeout: Duration::from_millis(500),
        read_timeout: Duration::from_millis(200),
        slow_response_threshold: Duration::from_secs(10),
        retry: RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(40),
        },
        breaker: BreakerConfig {
            failure_threshold,
            recovery_timeout: Duration::from_secs(30),
        },
    })
    .unwrap()
}

#[tokio::test]
async fn fetch_text_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<xml>A</xml>"))
        .mount(&server)
        .await;

    let client = fast_client(3, 5);
    let body = client
        .fetch_text(&format!("{}/data", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<xml>A</xml>");
    assert_eq!(client.breaker().state(), CircuitState::Closed);
}

#[tokio::test]
async fn http_status_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_client(3, 5);
    let err = client
        .fetch_text(&format!("{}/data", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::HttpStatus { status: 500 });
    assert_eq!(client.breaker().failure_count(), 1);
}

#[tokio::test]
async fn timeouts_retry_then_exhaust_with_attempt_count() {
    let server = MockServer::start().await;
    // Delay far past the 200ms read timeout so every attempt times out.
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = fast_client(2, 5);
    let err = client
        .fetch_text(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::RetriesExhausted { attempts: 2 });
    assert!(err.to_string().contains("2 attempts"));
    // The whole retry sequence counts as one breaker failure.
    assert_eq!(client.breaker().failure_count(), 1);
}

#[tokio::test]
async fn json_decode_error_does_not_charge_breaker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_client(3, 5);
    let err = client
        .fetch_json(&format!("{}/json", server.uri()), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
    assert_eq!(client.breaker().failure_count(), 0);
    assert_eq!(client.breaker().state(), CircuitState::Closed);
}

#[tokio::test]
async fn fetch_json_decodes_payload_and_sends_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .and(wiremock::matchers::header("authorization", "Infuser key-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"totalCount": 2, "data": []}"#),
        )
        .mount(&server)
        .await;

    let client = fast_client(3, 5);
    let headers = vec![("Authorization".to_string(), "Infuser key-1".to_string())];
    let value = client
        .fetch_json(&format!("{}/json", server.uri()), &headers)
        .await
        .unwrap();
    assert_eq!(value["totalCount"], 2);
}

#[tokio::test]
async fn breaker_opens_and_short_circuits_without_network() {
    let server = MockServer::start().await;
    // Exactly two requests reach the server; the third is rejected locally.
    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let client = fast_client(1, 2);
    let url = format!("{}/bad", server.uri());

    for _ in 0..2 {
        let err = client.fetch_text(&url).await.unwrap_err();
        assert_eq!(err, FetchError::HttpStatus { status: 503 });
    }
    assert_eq!(client.breaker().state(), CircuitState::Open);

    let err = client.fetch_text(&url).await.unwrap_err();
    assert_eq!(err, FetchError::CircuitOpen);
    assert_eq!(err.kind(), "circuit_breaker_open");
}

#[tokio::test]
async fn success_after_transient_failure_resets_breaker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .mount(&server)
        .await;

    let client = fast_client(3, 5);
    let _ = client
        .fetch_text(&format!("{}/flaky", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(client.breaker().failure_count(), 1);

    client
        .fetch_text(&format!("{}/ok", server.uri()))
        .await
        .unwrap();
    assert_eq!(client.breaker().failure_count(), 0);
    assert_eq!(client.breaker().state(), CircuitState::Closed);
}
