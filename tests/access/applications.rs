//! tests/access/applications.rs
//! The application form is validated before the resume touches the disk.

#[path = "../mod.rs"]
mod common;

use reqwest::{multipart, StatusCode};
use serde_json::Value;

fn resume_part() -> multipart::Part {
    multipart::Part::bytes(b"%PDF-1.7".to_vec())
        .file_name("Ada Resume.pdf")
        .mime_str("application/pdf")
        .unwrap()
}

async fn submit(app: &common::TestApp, token: &str, form: multipart::Form) -> reqwest::Response {
    reqwest::Client::new()
        .post(app.url("/submitApplication"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.")
}

fn stored_files(app: &common::TestApp) -> usize {
    std::fs::read_dir(&app.uploads_dir).unwrap().count()
}

#[tokio::test]
async fn application_without_resume_is_rejected() {
    let app: common::TestApp = common::spawn_app().await;
    let token: String = app.token_for("ada@lab.org");

    let form: multipart::Form = multipart::Form::new()
        .text("email", "ada@lab.org")
        .text("position", "Research Assistant");

    let resp: reqwest::Response = submit(&app, &token, form).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["messages"][0], "No file uploaded");
}

#[tokio::test]
async fn application_for_another_email_is_forbidden_and_not_stored() {
    let app: common::TestApp = common::spawn_app().await;
    let token: String = app.token_for("ada@lab.org");

    let form: multipart::Form = multipart::Form::new()
        .text("email", "grace@lab.org")
        .part("resume", resume_part());

    let resp: reqwest::Response = submit(&app, &token, form).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["messages"][0], "Forbidden access");
    assert_eq!(stored_files(&app), 0);
}

#[tokio::test]
async fn text_field_named_resume_is_not_a_file() {
    let app: common::TestApp = common::spawn_app().await;
    let token: String = app.token_for("ada@lab.org");

    let form: multipart::Form = multipart::Form::new()
        .text("email", "ada@lab.org")
        .text("resume", "not a file");

    let resp: reqwest::Response = submit(&app, &token, form).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["messages"][0], "No file uploaded");
    assert_eq!(stored_files(&app), 0);
}

#[tokio::test]
async fn resume_is_discarded_when_the_insert_fails() {
    let app: common::TestApp = common::spawn_app().await;
    let token: String = app.token_for("ada@lab.org");

    let form: multipart::Form = multipart::Form::new()
        .text("email", "ada@lab.org")
        .part("resume", resume_part());

    let resp: reqwest::Response = submit(&app, &token, form).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(stored_files(&app), 0);
}

#[tokio::test]
async fn resume_is_discarded_when_the_request_times_out() {
    // The insert is still waiting on server selection when the 1s request
    // timeout drops the handler.
    let app: common::TestApp = common::spawn_app_with(&[
        ("DEFAULT_TIMEOUT_SECONDS", "1"),
        ("DB_SELECTION_TIMEOUT_SECONDS", "30"),
    ])
    .await;
    let token: String = app.token_for("ada@lab.org");

    let form: multipart::Form = multipart::Form::new()
        .text("email", "ada@lab.org")
        .part("resume", resume_part());

    let resp: reqwest::Response = submit(&app, &token, form).await;
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(stored_files(&app), 0);
}
