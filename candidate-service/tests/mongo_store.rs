mod common;

use candidate_service::services::CandidateStore;
use common::{TestApp, TEST_INSTANCE_ID};
use reqwest::{Client, StatusCode};
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires MongoDB at localhost:27017"]
async fn candidate_lifecycle_against_mongodb() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    // Never upserted
    let response = client
        .get(format!("{}/candidate/Ada", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "Not Found");

    // Upsert twice
    for _ in 0..2 {
        let response = client
            .post(format!("{}/candidate/Ada", app.address))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["CandidateName"], "Ada");
    }

    let found = app.db.find_by_name("Ada").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].candidate_name, "Ada");

    let response = client
        .get(format!("{}/candidate/Ada", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!([{ "CandidateName": "Ada" }]));

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB at localhost:27017"]
async fn list_returns_all_names_from_mongodb() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    for name in ["a", "b", "c"] {
        client
            .post(format!("{}/candidate/{}", app.address, name))
            .send()
            .await
            .expect("Failed to execute request");
    }

    let response = client
        .get(format!("{}/candidates", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Vec<Value> = response.json().await.unwrap();
    let mut names: Vec<&str> = body
        .iter()
        .map(|c| c["CandidateName"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a", "b", "c"]);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB at localhost:27017"]
async fn gtg_reports_configured_instance_id() {
    let app = TestApp::spawn().await;

    let body: Value = Client::new()
        .get(format!("{}/gtg?details", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    assert_eq!(body["instance-id"], TEST_INSTANCE_ID);

    app.cleanup().await;
}
