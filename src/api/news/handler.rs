// News post handlers

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    results::InsertOneResult,
    Cursor,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::api::research::handler::ensure_author_exists;
use crate::config::state::AppState;
use crate::database::documents::{
    collect_documents, document_to_json, documents_to_json, inserted_id_json, json_to_bson,
    parse_object_id,
};
use crate::services::Claims;
use crate::utils::{ApiError, ApiResult, HandlerResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsDraft {
    pub title: Option<Value>,
    pub summary: Option<Value>,
    pub details: Option<Value>,
    pub author_email: Option<Value>,
    pub image: Option<Value>,
}

impl NewsDraft {
    pub fn author_email(&self) -> Option<&str> {
        self.author_email.as_ref().and_then(Value::as_str)
    }

    pub fn into_document(self, author_email: &str, now: DateTime) -> ApiResult<Document> {
        Ok(doc! {
            "title": json_to_bson(self.title)?,
            "summary": json_to_bson(self.summary)?,
            "details": json_to_bson(self.details)?,
            "authorEmail": author_email,
            "image": json_to_bson(self.image)?,
            "createdAt": now,
        })
    }
}

#[instrument(skip(state))]
pub async fn list_news(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let cursor: Cursor<Document> = state
        .database
        .news()
        .find(doc! {})
        .sort(doc! { "createdAt": -1 })
        .await?;
    let news: Vec<Document> = collect_documents(cursor).await?;
    Ok(HandlerResponse::ok(documents_to_json(news)))
}

#[instrument(skip(state))]
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid news ID format")?;

    let news: Document = state
        .database
        .news()
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| ApiError::NotFound("News not found".to_string()))?;

    Ok(HandlerResponse::ok(document_to_json(news)))
}

/// Publishes a news post authored by the calling admin
#[instrument(skip_all)]
pub async fn create_news(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<NewsDraft>,
) -> ApiResult<HandlerResponse> {
    ensure_author_exists(&state, draft.author_email()).await?;

    let news: Document = draft.into_document(&claims.email, DateTime::now())?;
    let result: InsertOneResult = state.database.news().insert_one(news).await?;

    info!("News posted by {}", claims.email);
    Ok(HandlerResponse::ok(inserted_id_json(result)))
}
