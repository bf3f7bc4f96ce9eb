//! HTTP-level tests for `POST /api/feedback`.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{model_feedback, worked_example_body, TestAppBuilder, TOKEN};
use kolb_tracker::adapters::ai::MockAIProvider;
use kolb_tracker::domain::feedback::{UnparseablePolicy, SKILL_PLACEHOLDER};
use kolb_tracker::ports::{AIError, MessageRole, ResponseFormat};

#[tokio::test]
async fn worked_example_returns_model_object_unchanged() {
    let ai = MockAIProvider::new().with_response(model_feedback().to_string());
    let app = TestAppBuilder::new().ai(ai).build().await;

    let (status, body) = app
        .post("/api/feedback", Some(TOKEN), &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"], model_feedback());
    assert_eq!(app.ai.call_count(), 1);
}

#[tokio::test]
async fn model_call_uses_json_mode_and_embeds_inputs() {
    let ai = MockAIProvider::new().with_response(model_feedback().to_string());
    let app = TestAppBuilder::new().ai(ai).build().await;

    let mut body = worked_example_body();
    body["skill"] = json!({ "name": "Public speaking" });
    let (status, _) = app.post("/api/feedback", Some(TOKEN), &body).await;
    assert_eq!(status, StatusCode::OK);

    let calls = app.ai.get_calls();
    let request = &calls[0];
    assert_eq!(request.response_format, ResponseFormat::JsonObject);
    assert_eq!(request.temperature, Some(0.7));
    assert!(request.system_prompt.is_some());

    let prompt = request
        .messages
        .iter()
        .find(|m| m.role == MessageRole::User)
        .map(|m| m.content.clone())
        .unwrap();
    assert!(prompt.contains("Public speaking"));
    assert!(prompt.contains(&"a".repeat(10)));
    assert!(prompt.contains(&"d".repeat(10)));
}

#[tokio::test]
async fn missing_skill_uses_placeholder() {
    let ai = MockAIProvider::new().with_response(model_feedback().to_string());
    let app = TestAppBuilder::new().ai(ai).build().await;

    app.post("/api/feedback", Some(TOKEN), &worked_example_body())
        .await;

    let prompt = app.ai.get_calls()[0].messages[0].content.clone();
    assert!(prompt.contains(SKILL_PLACEHOLDER));
}

#[tokio::test]
async fn each_missing_field_is_400_without_model_call() {
    for field in [
        "title",
        "concreteExperience",
        "reflectiveObservation",
        "abstractConceptualization",
        "activeExperimentation",
    ] {
        let app = TestAppBuilder::new().build().await;
        let mut body = worked_example_body();
        body.as_object_mut().unwrap().remove(field);

        let (status, response) = app.post("/api/feedback", Some(TOKEN), &body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "field {}", field);
        assert_eq!(response["code"], "VALIDATION_FAILED");
        assert_eq!(app.ai.call_count(), 0, "field {}", field);
    }
}

#[tokio::test]
async fn empty_field_counts_as_missing() {
    let app = TestAppBuilder::new().build().await;
    let mut body = worked_example_body();
    body["title"] = json!("");

    let (status, _) = app.post("/api/feedback", Some(TOKEN), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.ai.call_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = TestAppBuilder::new().build().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/feedback")
        .header("Authorization", format!("Bearer {}", TOKEN))
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.ai.call_count(), 0);
}

#[tokio::test]
async fn unauthenticated_is_401_without_side_effects() {
    let app = TestAppBuilder::new().build().await;
    let users_before = app.store.user_count().await;

    let (status, body) = app
        .post("/api/feedback", None, &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
    assert_eq!(app.ai.call_count(), 0);
    assert_eq!(app.store.user_count().await, users_before);
    assert_eq!(app.store.cycle_count().await, 0);
}

#[tokio::test]
async fn invalid_token_is_401_without_model_call() {
    let app = TestAppBuilder::new().build().await;

    let (status, _) = app
        .post("/api/feedback", Some("forged"), &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.ai.call_count(), 0);
}

#[tokio::test]
async fn token_without_local_user_is_401() {
    let app = TestAppBuilder::new().without_local_users().build().await;

    let (status, _) = app
        .post("/api/feedback", Some(TOKEN), &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.ai.call_count(), 0);
    assert_eq!(app.store.user_count().await, 0);
}

#[tokio::test]
async fn upstream_failure_is_500_with_generic_message() {
    let ai = MockAIProvider::new().with_error(AIError::network("connection reset by peer"));
    let app = TestAppBuilder::new().ai(ai).build().await;

    let (status, body) = app
        .post("/api/feedback", Some(TOKEN), &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate feedback");
    assert!(!body.to_string().contains("connection reset"));
}

#[tokio::test]
async fn non_json_reply_fails_under_fail_policy() {
    let ai = MockAIProvider::new().with_response("Sorry, I cannot help with that.");
    let app = TestAppBuilder::new()
        .ai(ai)
        .policy(UnparseablePolicy::Fail)
        .build()
        .await;

    let (status, body) = app
        .post("/api/feedback", Some(TOKEN), &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate feedback");
}

#[tokio::test]
async fn non_json_reply_degrades_to_empty_object() {
    let ai = MockAIProvider::new().with_response("Sorry, I cannot help with that.");
    let app = TestAppBuilder::new()
        .ai(ai)
        .policy(UnparseablePolicy::Degrade)
        .build()
        .await;

    let (status, body) = app
        .post("/api/feedback", Some(TOKEN), &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "feedback": {} }));
}

#[tokio::test]
async fn null_reply_degrades_to_empty_object() {
    let ai = MockAIProvider::new().with_empty_response();
    let app = TestAppBuilder::new()
        .ai(ai)
        .policy(UnparseablePolicy::Degrade)
        .build()
        .await;

    let (status, body) = app
        .post("/api/feedback", Some(TOKEN), &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"], json!({}));
}

#[tokio::test]
async fn disabled_feature_is_503_without_model_call() {
    let app = TestAppBuilder::new().feedback_enabled(false).build().await;

    let (status, body) = app
        .post("/api/feedback", Some(TOKEN), &worked_example_body())
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "FEATURE_DISABLED");
    assert_eq!(app.ai.call_count(), 0);
}
