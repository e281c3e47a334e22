//! tests/access/system.rs
//! Liveness, health, CORS and raw file serving.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_reports_the_lab_is_working() {
    let app: common::TestApp = common::spawn_app().await;

    let resp: reqwest::Response = reqwest::Client::new()
        .get(app.url("/"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "OK");
    assert_eq!(json["code"], 200);
    assert_eq!(json["messages"][0], "Lab is working");
}

#[tokio::test]
async fn health_reports_an_unreachable_database_as_503() {
    let app: common::TestApp = common::spawn_app().await;

    let resp: reqwest::Response = reqwest::Client::new()
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "SERVICE_UNAVAILABLE");
    assert_eq!(json["data"]["database"], "disconnected");
    assert!(json["data"]["error"].is_string());
    assert!(json["data"]["instance"].is_string());
    assert_eq!(json["messages"][0], "Database connection failed");
}

#[tokio::test]
async fn any_origin_is_allowed() {
    let app: common::TestApp = common::spawn_app().await;

    let resp: reqwest::Response = reqwest::Client::new()
        .get(app.url("/"))
        .header("Origin", "https://lab.example.org")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn stored_resumes_are_served_as_raw_files() {
    let app: common::TestApp = common::spawn_app().await;
    std::fs::write(app.uploads_dir.join("ada_resume_1700000000000.pdf"), b"%PDF-1.7").unwrap();

    let resp: reqwest::Response = reqwest::Client::new()
        .get(app.url("/uploads/ada_resume_1700000000000.pdf"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"%PDF-1.7");
}
