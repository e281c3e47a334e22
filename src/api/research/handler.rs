// Research paper handlers: published papers and the submission queue

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime, Document},
    results::{DeleteResult, InsertOneResult},
    Cursor,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::config::state::AppState;
use crate::database::documents::{
    bson_to_json, collect_documents, document_to_json, documents_to_json, inserted_id_json,
    json_to_bson, parse_object_id,
};
use crate::services::Claims;
use crate::utils::{ApiError, ApiResult, HandlerResponse};

pub const RECENT_PAPERS_LIMIT: i64 = 6;

/// A paper submitted for review. Fields are stored as sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperSubmission {
    pub title: Option<Value>,
    pub details: Option<Value>,
    pub category: Option<Value>,
    pub author_email: Option<Value>,
    pub image: Option<Value>,
}

impl PaperSubmission {
    pub fn author_email(&self) -> Option<&str> {
        self.author_email.as_ref().and_then(Value::as_str)
    }

    /// The stored author is always the caller, whatever the body claims.
    pub fn into_document(self, author_email: &str, now: DateTime) -> ApiResult<Document> {
        Ok(doc! {
            "title": json_to_bson(self.title)?,
            "details": json_to_bson(self.details)?,
            "category": json_to_bson(self.category)?,
            "authorEmail": author_email,
            "image": json_to_bson(self.image)?,
            "createdAt": now,
        })
    }
}

fn newest_first() -> Document {
    doc! { "createdAt": -1 }
}

#[instrument(skip(state))]
pub async fn list_papers(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let cursor: Cursor<Document> = state.database.research_papers().find(doc! {}).sort(newest_first()).await?;
    let papers: Vec<Document> = collect_documents(cursor).await?;
    Ok(HandlerResponse::ok(documents_to_json(papers)))
}

#[instrument(skip(state))]
pub async fn recent_papers(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let cursor: Cursor<Document> = state
        .database
        .research_papers()
        .find(doc! {})
        .sort(newest_first())
        .limit(RECENT_PAPERS_LIMIT)
        .await?;
    let papers: Vec<Document> = collect_documents(cursor).await?;
    Ok(HandlerResponse::ok(documents_to_json(papers)))
}

#[instrument(skip(state))]
pub async fn get_paper(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid researchPaper ID format")?;

    let paper: Document = state
        .database
        .research_papers()
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| ApiError::NotFound("researchPaper not found".to_string()))?;

    Ok(HandlerResponse::ok(document_to_json(paper)))
}

/// Other papers by the same author, newest first
#[instrument(skip(state))]
pub async fn more_papers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid researchPaper ID format")?;

    let current: Document = state
        .database
        .research_papers()
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| ApiError::NotFound("Paper not found".to_string()))?;

    let author: Bson = current.get("authorEmail").cloned().unwrap_or(Bson::Null);
    let cursor: Cursor<Document> = state
        .database
        .research_papers()
        .find(doc! { "authorEmail": author, "_id": { "$ne": id } })
        .sort(newest_first())
        .await?;
    let papers: Vec<Document> = collect_documents(cursor).await?;

    if papers.is_empty() {
        return Err(ApiError::NotFound(
            "No other research papers found for this user".to_string(),
        ));
    }

    Ok(HandlerResponse::ok(documents_to_json(papers)))
}

/// Publishes a pending request: copy it to the papers, then drop the request
#[instrument(skip(state))]
pub async fn publish_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid research request ID format")?;
    let query: Document = doc! { "_id": id };

    let paper: Document = state
        .database
        .research_paper_requests()
        .find_one(query.clone())
        .await?
        .ok_or_else(|| ApiError::NotFound("Research paper not found".to_string()))?;

    let inserted: InsertOneResult = state.database.research_papers().insert_one(paper).await?;
    let deleted: DeleteResult = state.database.research_paper_requests().delete_one(query).await?;

    info!("Research request {} published", id);
    Ok(HandlerResponse::ok(json!({
        "insertedId": bson_to_json(inserted.inserted_id),
        "deletedCount": deleted.deleted_count,
    }))
    .message("Paper published and removed from request list"))
}

#[instrument(skip(state))]
pub async fn list_requests(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let cursor: Cursor<Document> = state.database.research_paper_requests().find(doc! {}).await?;
    let requests: Vec<Document> = collect_documents(cursor).await?;
    Ok(HandlerResponse::ok(documents_to_json(requests)))
}

#[instrument(skip(state))]
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid research request ID format")?;

    let result: DeleteResult = state
        .database
        .research_paper_requests()
        .delete_one(doc! { "_id": id })
        .await?;

    Ok(HandlerResponse::ok(json!({ "deletedCount": result.deleted_count })))
}

/// Queues a paper for admin review
#[instrument(skip_all)]
pub async fn create_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(submission): Json<PaperSubmission>,
) -> ApiResult<HandlerResponse> {
    ensure_author_exists(&state, submission.author_email()).await?;

    let request: Document = submission.into_document(&claims.email, DateTime::now())?;
    let result: InsertOneResult = state.database.research_paper_requests().insert_one(request).await?;

    info!("Research request submitted by {}", claims.email);
    Ok(HandlerResponse::ok(inserted_id_json(result)))
}

/// 404 unless the named author has a user record
pub async fn ensure_author_exists(state: &AppState, author_email: Option<&str>) -> ApiResult<()> {
    let Some(email) = author_email else {
        return Err(ApiError::NotFound("Author not found".to_string()));
    };

    match state.database.find_user_by_email(email).await? {
        Some(_) => Ok(()),
        None => {
            warn!("Author {} not found", email);
            Err(ApiError::NotFound("Author not found".to_string()))
        }
    }
}
