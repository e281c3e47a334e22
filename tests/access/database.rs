//! tests/access/database.rs
//! Flows that need a live MongoDB. Set LAB_API_TEST_DB_URI to run them;
//! each test works in its own throwaway database.

#[path = "../mod.rs"]
mod common;

use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn insert(collection: mongodb::Collection<Document>, document: Document) -> ObjectId {
    collection
        .insert_one(document)
        .await
        .expect("Failed to seed document")
        .inserted_id
        .as_object_id()
        .expect("Seeded document has no ObjectId")
}

#[tokio::test]
async fn registering_the_same_user_twice_inserts_once() {
    let Some(app) = common::spawn_db_app().await else { return };
    let client: reqwest::Client = reqwest::Client::new();
    let user: Value = json!({ "email": "ada@lab.org", "name": "Ada" });

    let first: Value = client.post(app.url("/users")).json(&user).send().await.unwrap().json().await.unwrap();
    assert_eq!(first["code"], 200);
    assert!(first["data"]["insertedId"].is_string());

    let second: Value = client.post(app.url("/users")).json(&user).send().await.unwrap().json().await.unwrap();
    assert_eq!(second["code"], 200);
    assert_eq!(second["data"]["insertedId"], Value::Null);
    assert_eq!(second["messages"][0], "User already exists in the database");

    let count: u64 = app.database.users().count_documents(doc! { "email": "ada@lab.org" }).await.unwrap();
    assert_eq!(count, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn admin_routes_need_the_admin_role() {
    let Some(app) = common::spawn_db_app().await else { return };
    let client: reqwest::Client = reqwest::Client::new();

    insert(app.database.users(), doc! { "email": "ada@lab.org", "role": "researcher" }).await;
    insert(app.database.users(), doc! { "email": "bob@lab.org" }).await;
    insert(app.database.users(), doc! { "email": "root@lab.org", "role": "admin" }).await;

    let resp: reqwest::Response = client
        .get(app.url("/users"))
        .bearer_auth(app.token_for("ada@lab.org"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["messages"][0], "forbidden access");

    let resp: reqwest::Response = client
        .get(app.url("/users"))
        .bearer_auth(app.token_for("root@lab.org"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"].as_array().map(Vec::len), Some(3));

    // The role gate admits any role but not a user without one
    let resp: reqwest::Response = client
        .post(app.url("/ResearchRequest"))
        .bearer_auth(app.token_for("bob@lab.org"))
        .json(&json!({ "title": "Untitled", "authorEmail": "bob@lab.org" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp: reqwest::Response = client
        .post(app.url("/ResearchRequest"))
        .bearer_auth(app.token_for("ada@lab.org"))
        .json(&json!({ "title": "Sparse attention", "authorEmail": "ada@lab.org" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    app.cleanup().await;
}

#[tokio::test]
async fn application_is_promoted_to_team_member() {
    let Some(app) = common::spawn_db_app().await else { return };
    let client: reqwest::Client = reqwest::Client::new();
    let admin_token: String = app.token_for("root@lab.org");

    insert(app.database.users(), doc! { "email": "root@lab.org", "role": "admin" }).await;

    std::fs::write(app.uploads_dir.join("ada_cv_1700000000000.pdf"), b"%PDF-1.7").unwrap();
    let application_id: ObjectId = insert(
        app.database.applications(),
        doc! {
            "email": "ada@lab.org",
            "name": "Ada",
            "role": "researcher",
            "resume": { "filename": "ada_cv_1700000000000.pdf", "path": "uploads/ada_cv_1700000000000.pdf" },
            "createdAt": DateTime::from_millis(1_000),
        },
    )
    .await;

    let resp: reqwest::Response = client
        .post(app.url(&format!("/team/{}", application_id.to_hex())))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["success"], true);
    assert_eq!(json["messages"][0], "Member added to team successfully");

    let member: Document = app.database.team().find_one(doc! { "email": "ada@lab.org" }).await.unwrap().unwrap();
    assert!(!member.contains_key("resume"));
    assert_eq!(member.get_object_id("_id").unwrap(), application_id);

    let user: Document = app.database.users().find_one(doc! { "email": "ada@lab.org" }).await.unwrap().unwrap();
    assert_eq!(user.get_str("role").unwrap(), "researcher");
    assert_eq!(user.get("isTeamMember"), Some(&Bson::Boolean(true)));

    let remaining: u64 = app.database.applications().count_documents(doc! {}).await.unwrap();
    assert_eq!(remaining, 0);
    assert!(!app.uploads_dir.join("ada_cv_1700000000000.pdf").exists());

    // Promoting the same application again finds nothing
    let resp: reqwest::Response = client
        .post(app.url(&format!("/team/{}", application_id.to_hex())))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A second application for an existing member is refused
    let duplicate_id: ObjectId = insert(
        app.database.applications(),
        doc! { "email": "ada@lab.org", "role": "researcher" },
    )
    .await;
    let resp: reqwest::Response = client
        .post(app.url(&format!("/team/{}", duplicate_id.to_hex())))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["success"], false);
    assert_eq!(json["data"]["email"], "ada@lab.org");
    assert_eq!(json["messages"][0], "Member with this email already exists in the team");

    app.cleanup().await;
}

#[tokio::test]
async fn more_papers_needs_another_paper_by_the_author() {
    let Some(app) = common::spawn_db_app().await else { return };
    let client: reqwest::Client = reqwest::Client::new();

    let first: ObjectId = insert(
        app.database.research_papers(),
        doc! { "title": "Graph kernels", "authorEmail": "ada@lab.org", "createdAt": DateTime::from_millis(1_000) },
    )
    .await;

    let resp: reqwest::Response = client
        .get(app.url(&format!("/morePaper/{}", first.to_hex())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["messages"][0], "No other research papers found for this user");

    insert(
        app.database.research_papers(),
        doc! { "title": "Sparse attention", "authorEmail": "ada@lab.org", "createdAt": DateTime::from_millis(2_000) },
    )
    .await;

    let resp: reqwest::Response = client
        .get(app.url(&format!("/morePaper/{}", first.to_hex())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"][0]["title"], "Sparse attention");

    let resp: reqwest::Response = client
        .get(app.url(&format!("/morePaper/{}", ObjectId::new().to_hex())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["messages"][0], "Paper not found");

    app.cleanup().await;
}
