//! Shared harness for HTTP integration tests.
//!
//! Wires the full router over the in-memory store, the mock session
//! validator and the mock AI provider.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use kolb_tracker::adapters::ai::MockAIProvider;
use kolb_tracker::adapters::auth::MockSessionValidator;
use kolb_tracker::adapters::http::{api_router, ApiDependencies, ApiState};
use kolb_tracker::adapters::memory::InMemoryStore;
use kolb_tracker::adapters::webhook::SvixVerifier;
use kolb_tracker::application::handlers::GenerateFeedbackHandler;
use kolb_tracker::config::ServerConfig;
use kolb_tracker::domain::feedback::{FeedbackParameters, UnparseablePolicy};
use kolb_tracker::domain::foundation::UserId;
use kolb_tracker::domain::user::{IdentityProfile, UserProfile};
use kolb_tracker::ports::UserRepository;

pub const TOKEN: &str = "token-alice";
pub const USER_ID: &str = "user_alice";
pub const OTHER_TOKEN: &str = "token-bob";
pub const OTHER_USER_ID: &str = "user_bob";

/// Fixed model reply used across the feedback tests.
pub fn model_feedback() -> Value {
    serde_json::json!({
        "concreteExperience": { "rating": 8, "feedback": "Vivid and specific." },
        "reflectiveObservation": { "rating": 6, "feedback": "Consider other viewpoints." },
        "abstractConceptualization": { "rating": 7, "feedback": "Link to a named theory." },
        "activeExperimentation": { "rating": 9, "feedback": "Clear next steps." },
        "overallFeedback": "A well connected cycle."
    })
}

pub fn worked_example_body() -> Value {
    serde_json::json!({
        "title": "X",
        "concreteExperience": "a".repeat(10),
        "reflectiveObservation": "b".repeat(10),
        "abstractConceptualization": "c".repeat(10),
        "activeExperimentation": "d".repeat(10)
    })
}

pub struct TestApp {
    pub router: Router,
    pub ai: MockAIProvider,
    pub store: InMemoryStore,
}

pub struct TestAppBuilder {
    ai: MockAIProvider,
    policy: UnparseablePolicy,
    feedback_enabled: bool,
    webhook_verifier: Option<Arc<SvixVerifier>>,
    register_users: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            ai: MockAIProvider::new(),
            policy: UnparseablePolicy::Fail,
            feedback_enabled: true,
            webhook_verifier: None,
            register_users: true,
        }
    }

    pub fn ai(mut self, ai: MockAIProvider) -> Self {
        self.ai = ai;
        self
    }

    pub fn policy(mut self, policy: UnparseablePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn feedback_enabled(mut self, enabled: bool) -> Self {
        self.feedback_enabled = enabled;
        self
    }

    pub fn webhook_verifier(mut self, verifier: SvixVerifier) -> Self {
        self.webhook_verifier = Some(Arc::new(verifier));
        self
    }

    /// Skips creating local user records for the test tokens.
    pub fn without_local_users(mut self) -> Self {
        self.register_users = false;
        self
    }

    pub async fn build(self) -> TestApp {
        let store = InMemoryStore::new();
        if self.register_users {
            for id in [USER_ID, OTHER_USER_ID] {
                let profile = UserProfile::from_identity(IdentityProfile {
                    id: UserId::new(id).unwrap(),
                    email: format!("{}@example.com", id),
                    name: None,
                    image_url: None,
                });
                UserRepository::upsert(&store, &profile).await.unwrap();
            }
        }

        let validator = MockSessionValidator::new()
            .with_test_user(TOKEN, USER_ID)
            .with_test_user(OTHER_TOKEN, OTHER_USER_ID);

        let feedback = GenerateFeedbackHandler::new(
            Arc::new(self.ai.clone()),
            FeedbackParameters::new("gpt-3.5-turbo-0125").with_temperature(Some(0.7)),
            self.policy,
        )
        .with_enabled(self.feedback_enabled);

        let state = ApiState::new(ApiDependencies {
            users: Arc::new(store.clone()),
            skills: Arc::new(store.clone()),
            cycles: Arc::new(store.clone()),
            session_validator: Arc::new(validator),
            feedback: Arc::new(feedback),
            webhook_verifier: self.webhook_verifier,
        });

        TestApp {
            router: api_router(state, &ServerConfig::default()),
            ai: self.ai,
            store,
        }
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: &Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, token, Some(body))).await
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
