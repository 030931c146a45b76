//! HTTP tests for the outbound admission window

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use poopalooza_assistant::server::routes::configure_routes;
use serde_json::{Value, json};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer};

use crate::common::gemini::{answer, not_found, text_matcher};
use crate::common::{app_state, test_config};

const QUESTION: &str = "我家的貓一直軟便怎麼辦?";

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(configure_routes),
        )
        .await
    };
}

fn ask_request(question: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/assistant")
        .set_json(json!({"question": question}))
}

#[actix_web::test]
async fn test_requests_beyond_ceiling_are_rejected_without_upstream_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(answer("好的。"))
        .mount(&server)
        .await;

    let state = app_state(test_config(server.uri(), &["gemini-1.5-flash"], 2));
    let app = init_app!(state);

    for expected_count in 1..=2 {
        let response = test::call_service(&app, ask_request(QUESTION).to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["requestCount"], expected_count);
    }

    // Probe plus two forwards.
    let upstream_calls = server.received_requests().await.unwrap().len();
    assert_eq!(upstream_calls, 3);

    for _ in 0..3 {
        let response = test::call_service(&app, ask_request(QUESTION).to_request()).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["answer"], "請求太頻繁，請稍後再試。免費版本有使用限制。");
        assert_eq!(body["error"], "Rate limit exceeded");
        let retry_after = body["retryAfter"].as_u64().unwrap();
        assert!(
            (1..=60).contains(&retry_after),
            "retryAfter out of range: {retry_after}"
        );
    }

    // Rejected requests never reached the upstream.
    assert_eq!(server.received_requests().await.unwrap().len(), upstream_calls);
}

#[actix_web::test]
async fn test_window_reset_admits_and_restarts_the_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(answer("好的。"))
        .mount(&server)
        .await;

    let mut config = test_config(server.uri(), &["gemini-1.5-flash"], 1);
    config.rate_limit.window_secs = 1;
    let state = app_state(config);
    let app = init_app!(state);

    let response = test::call_service(&app, ask_request(QUESTION).to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test::call_service(&app, ask_request(QUESTION).to_request()).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let response = test::call_service(&app, ask_request(QUESTION).to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    // The counter restarted at 1 (this request itself).
    assert_eq!(body["requestCount"], 1);
}

#[actix_web::test]
async fn test_rejected_fallback_retry_yields_rate_limit_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(text_matcher(QUESTION))
        .respond_with(not_found("gemini-1.5-flash"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(answer("Hi!"))
        .mount(&server)
        .await;

    // Ceiling of 1: the first pass consumes the whole window, so the
    // automatic fallback retry is rejected by the limiter.
    let state = app_state(test_config(server.uri(), &["gemini-1.5-flash"], 1));
    let app = init_app!(state);

    let response = test::call_service(&app, ask_request(QUESTION).to_request()).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // The rate-limit shape wins over the upstream not-found failure.
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "Rate limit exceeded");
    assert!(body.get("status").is_none());
}
