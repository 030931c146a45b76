//! HTTP tests for `GET /api/models/free` and `GET /`

use actix_web::http::StatusCode;
use actix_web::{App, test};
use poopalooza_assistant::server::routes::configure_routes;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

use crate::common::gemini::{answer, model_path, not_found, text_matcher};
use crate::common::{app_state, test_config};

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

#[actix_web::test]
async fn test_listing_reports_mixed_availability_in_candidate_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(model_path("gemini-1.5-flash")))
        .respond_with(answer("Hi!"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(model_path("gemini-1.5-pro")))
        .respond_with(not_found("gemini-1.5-pro"))
        .mount(&server)
        .await;

    let state = app_state(test_config(
        server.uri(),
        &["gemini-1.5-flash", "gemini-1.5-pro"],
        10,
    ));
    let app = init_app!(state);

    let request = test::TestRequest::get().uri("/api/models/free").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["plan"], "free");
    assert_eq!(body["note"], "所有模型都是免費使用，但有使用限制");

    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 2);

    assert_eq!(models[0]["name"], "gemini-1.5-flash");
    assert_eq!(models[0]["status"], "✅ 免費可用");
    assert_eq!(models[0]["available"], true);
    assert_eq!(models[0]["limits"], "15 requests/min, 1,500/day");
    assert_eq!(models[0]["cost"], "FREE 🎉");

    assert_eq!(models[1]["name"], "gemini-1.5-pro");
    assert_eq!(models[1]["available"], false);
    assert_eq!(models[1]["limits"], "2 requests/min, 50/day");
    assert_eq!(models[1]["cost"], "FREE");
    let status = models[1]["status"].as_str().unwrap();
    assert!(status.starts_with("❌ 不可用:"), "unexpected status: {status}");
}

#[actix_web::test]
async fn test_listing_probes_fresh_on_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(answer("Hi!"))
        .mount(&server)
        .await;

    let state = app_state(test_config(
        server.uri(),
        &["gemini-1.5-flash", "gemini-1.5-pro"],
        10,
    ));
    let app = init_app!(state);

    for _ in 0..2 {
        let request = test::TestRequest::get().uri("/api/models/free").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Two candidates probed on each of the two calls, nothing cached.
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[actix_web::test]
async fn test_listing_does_not_interact_with_the_selection_cache() {
    const QUESTION: &str = "倉鼠多久大便一次?";

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(text_matcher(QUESTION))
        .respond_with(answer("大約每天數次。"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(answer("Hi!"))
        .mount(&server)
        .await;

    let state = app_state(test_config(server.uri(), &["gemini-1.5-flash"], 10));
    let app = init_app!(state);

    // First question: one probe plus one forward.
    let request = test::TestRequest::post()
        .uri("/api/assistant")
        .set_json(json!({"question": QUESTION}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    // The listing probes the candidate again rather than trusting the cache.
    let request = test::TestRequest::get().uri("/api/models/free").to_request();
    test::call_service(&app, request).await;
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    // And it did not evict the selection: the next question forwards
    // directly with no new probe.
    let request = test::TestRequest::post()
        .uri("/api/assistant")
        .set_json(json!({"question": QUESTION}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[actix_web::test]
async fn test_liveness_endpoint() {
    let server = MockServer::start().await;
    let state = app_state(test_config(server.uri(), &["gemini-1.5-flash"], 10));
    let app = init_app!(state);

    let request = test::TestRequest::get().uri("/").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Poopalooza AI Assistant API is running!");
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().is_some());
}
