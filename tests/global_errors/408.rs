//! tests/global_errors/408.rs
//! Ensures that requests outliving the request timeout end in a 408.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn returns_408_when_the_database_outlives_the_request_timeout() {
    // Server selection outlasts the 1s request timeout, so the timeout fires first.
    let app: common::TestApp = common::spawn_app_with(&[
        ("DEFAULT_TIMEOUT_SECONDS", "1"),
        ("DB_SELECTION_TIMEOUT_SECONDS", "30"),
    ])
    .await;

    // The server timeout is 1s; the client waits longer so the server answers first.
    let resp_result: Result<Result<reqwest::Response, reqwest::Error>, tokio::time::error::Elapsed> = timeout(
        Duration::from_secs(10),
        async {
            reqwest::Client::new()
                .get(app.url("/labInfo"))
                .send()
                .await
        }
    )
    .await;

    assert!(resp_result.is_ok(), "Client timed out waiting for server.");

    let resp: reqwest::Response = resp_result.unwrap().expect("Request failed unexpectedly.");
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "REQUEST_TIMEOUT");
    assert_eq!(json["code"], 408);
    assert_eq!(json["messages"][0], "Request timeout");
}
