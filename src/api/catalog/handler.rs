// Contact messages, open positions and research areas

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    results::InsertOneResult,
    Cursor,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::config::state::AppState;
use crate::database::documents::{
    collect_documents, document_to_json, documents_to_json, inserted_id_json, json_to_document,
    parse_object_id,
};
use crate::services::Claims;
use crate::utils::{ApiError, ApiResult, HandlerResponse};

/// The caller's email first, then the submitted fields (which may
/// override it).
pub fn contact_document(caller_email: &str, body: Document) -> Document {
    let mut contact: Document = doc! { "email": caller_email };
    for (key, value) in body {
        contact.insert(key, value);
    }
    contact
}

#[instrument(skip_all)]
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<Value>,
) -> ApiResult<HandlerResponse> {
    let contact: Document = contact_document(&claims.email, json_to_document(body)?);
    let result: InsertOneResult = state.database.contacts().insert_one(contact).await?;

    info!("Contact message received from {}", claims.email);
    Ok(HandlerResponse::ok(inserted_id_json(result)))
}

#[instrument(skip(state))]
pub async fn list_open_positions(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let cursor: Cursor<Document> = state.database.open_positions().find(doc! {}).await?;
    let positions: Vec<Document> = collect_documents(cursor).await?;
    Ok(HandlerResponse::ok(documents_to_json(positions)))
}

#[instrument(skip(state))]
pub async fn list_research_areas(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let cursor: Cursor<Document> = state.database.research_areas().find(doc! {}).await?;
    let areas: Vec<Document> = collect_documents(cursor).await?;
    Ok(HandlerResponse::ok(documents_to_json(areas)))
}

#[instrument(skip(state))]
pub async fn get_research_area(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid research area ID format")?;

    let area: Document = state
        .database
        .research_areas()
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| ApiError::NotFound("Research Area not found".to_string()))?;

    Ok(HandlerResponse::ok(document_to_json(area)))
}
