#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use candidate_service::config::CandidateConfig;
use candidate_service::services::{
    CredentialProvider, InMemoryCandidateStore, InstanceId, MongoCandidateStore,
    StaticCredentialProvider,
};
use candidate_service::startup::{build_router, AppState, Application};
use http_body_util::BodyExt;
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_INSTANCE_ID: &str = "10.0.0.42";

/// Router over an in-memory store, plus a handle to that store for failure
/// injection.
pub fn in_memory_app() -> (Router, Arc<InMemoryCandidateStore>) {
    let store = Arc::new(InMemoryCandidateStore::new());
    let state = AppState::new(store.clone(), InstanceId::new(TEST_INSTANCE_ID));
    (build_router(state), store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("body is not UTF-8")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("body is not JSON")
    }

    /// Candidate names from a JSON array body, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .json()
            .as_array()
            .expect("body is not a JSON array")
            .iter()
            .map(|c| c["CandidateName"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        names
    }
}

pub async fn send(app: &Router, method: Method, uri: &str) -> TestResponse {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };
    let content_type = header("content-type");
    let request_id = header("x-request-id");
    let body = response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec();

    TestResponse {
        status,
        content_type,
        request_id,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri).await
}

pub async fn post(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::POST, uri).await
}

/// Full application against a real MongoDB on localhost, one database per
/// test.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoCandidateStore,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(&StaticCredentialProvider::none()).await
    }

    pub async fn spawn_with(credentials: &dyn CredentialProvider) -> Self {
        let db_name = format!("candidate_test_{}", Uuid::new_v4());
        let vars = HashMap::from([
            ("COSMOS_ENDPOINT", "mongodb://localhost:27017".to_string()),
            ("COSMOS_DATABASE_NAME", db_name.clone()),
            ("COSMOS_SERVER_SELECTION_TIMEOUT_SECS", "5".to_string()),
            ("INSTANCE_ID", TEST_INSTANCE_ID.to_string()),
        ]);

        let mut config =
            CandidateConfig::from_lookup(CoreConfig::default(), |key| vars.get(key).cloned())
                .expect("Failed to build configuration");
        config.common.port = 0; // Random port for testing

        let credential = credentials
            .resolve()
            .await
            .expect("Failed to resolve credential");
        let db = MongoCandidateStore::connect(&config.store, credential)
            .await
            .expect("Failed to connect to MongoDB");

        let app = Application::build(config, credentials)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the liveness probe
        let client = reqwest::Client::new();
        let gtg_url = format!("http://127.0.0.1:{}/gtg", port);
        for _ in 0..50 {
            if client.get(&gtg_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            db,
            db_name,
        }
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
