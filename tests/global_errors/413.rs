//! tests/global_errors/413.rs
//! Ensures that bodies over MAX_REQUEST_BODY_SIZE (64KB in tests) trigger 413.

#[path = "../mod.rs"]
mod common;

use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn returns_413_when_json_payload_exceeds_global_limit() {
    let app: common::TestApp = common::spawn_app().await;

    let oversized: String = "X".repeat(65_536 + 100);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(app.url("/jwt"))
        .json(&json!({ "email": "ada@lab.org", "padding": oversized }))
        .send()
        .await
        .expect("Failed to send large request.");

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "PAYLOAD_TOO_LARGE");
    assert_eq!(json["code"], 413);
}

#[tokio::test]
async fn returns_413_when_resume_exceeds_global_limit() {
    let app: common::TestApp = common::spawn_app().await;
    let token: String = app.token_for("ada@lab.org");

    let resume: multipart::Part = multipart::Part::bytes(vec![b'%'; 65_536 + 1_024])
        .file_name("Ada Resume.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let form: multipart::Form = multipart::Form::new()
        .text("email", "ada@lab.org")
        .part("resume", resume);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(app.url("/submitApplication"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send large upload.");

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    // Nothing was written for the rejected upload
    let stored: usize = std::fs::read_dir(&app.uploads_dir).unwrap().count();
    assert_eq!(stored, 0);
}
