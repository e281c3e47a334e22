//! tests/access/gates.rs
//! Token, admin and role gates reject callers before any database work.

#[path = "../mod.rs"]
mod common;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

async fn send(app: &common::TestApp, method: Method, path: &str, token: Option<&str>) -> reqwest::Response {
    let mut request: reqwest::RequestBuilder = reqwest::Client::new()
        .request(method, app.url(path))
        .json(&json!({}));

    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    request.send().await.expect("Failed to execute request.")
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let app: common::TestApp = common::spawn_app().await;

    let protected: [(Method, &str); 12] = [
        (Method::GET, "/user?email=ada@lab.org"),
        (Method::GET, "/user/admin/ada@lab.org"),
        (Method::GET, "/user/role/ada@lab.org"),
        (Method::GET, "/userInfoInTeam?email=ada@lab.org"),
        (Method::POST, "/contacts"),
        (Method::POST, "/submitApplication"),
        (Method::POST, "/ResearchRequest"),
        // Admin routes check the token before the role
        (Method::GET, "/users"),
        (Method::GET, "/applications"),
        (Method::PATCH, "/basicInfo"),
        (Method::POST, "/news"),
        (Method::DELETE, "/ResearchRequest/64b7f0c2a1b2c3d4e5f60718"),
    ];

    for (method, path) in protected {
        let resp: reqwest::Response = send(&app, method.clone(), path, None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {path}");

        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["messages"][0], "unauthorized access", "{method} {path}");
    }
}

#[tokio::test]
async fn garbage_tokens_are_unauthorized() {
    let app: common::TestApp = common::spawn_app().await;

    let resp: reqwest::Response = send(&app, Method::POST, "/contacts", Some("not.a.jwt")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(app.url("/contacts"))
        .header("Authorization", "Basic YWRhOmxhYg==")
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn callers_cannot_ask_about_other_users() {
    let app: common::TestApp = common::spawn_app().await;
    let token: String = app.token_for("ada@lab.org");

    for path in ["/user/admin/grace@lab.org", "/user/role/grace@lab.org"] {
        let resp: reqwest::Response = send(&app, Method::GET, path, Some(&token)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{path}");

        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "FORBIDDEN");
        assert_eq!(json["messages"][0], "forbidden access");
    }
}

#[tokio::test]
async fn admin_and_role_gates_look_the_caller_up() {
    let app: common::TestApp = common::spawn_app().await;
    let token: String = app.token_for("ada@lab.org");

    // Past the token check the gates query MongoDB; with no database the
    // lookup fails as a server error rather than a 401.
    for (method, path) in [(Method::GET, "/users"), (Method::POST, "/ResearchRequest")] {
        let resp: reqwest::Response = send(&app, method.clone(), path, Some(&token)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {path}");

        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["messages"][0], "Internal server error", "{method} {path}");
    }
}
