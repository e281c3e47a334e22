// Lab metadata handlers: the single labInfo document

use axum::{extract::State, Json};
use mongodb::{
    bson::{doc, Document},
    results::UpdateResult,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::config::state::AppState;
use crate::database::documents::{json_to_bson, json_to_document, optional_document_to_json};
use crate::utils::{ApiResult, HandlerResponse};

#[derive(Debug, Deserialize)]
pub struct BasicInfo {
    pub name: Option<Value>,
    pub phone: Option<Value>,
    pub email: Option<Value>,
    pub location: Option<Value>,
}

impl BasicInfo {
    /// Every field is written; missing ones are stored as null.
    pub fn to_set(self) -> ApiResult<Document> {
        Ok(doc! {
            "name": json_to_bson(self.name)?,
            "phone": json_to_bson(self.phone)?,
            "email": json_to_bson(self.email)?,
            "location": json_to_bson(self.location)?,
        })
    }
}

/// Returns the lab document, `null` before it has been created
#[instrument(skip(state))]
pub async fn get_lab_info(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let info: Option<Document> = state.database.lab_info().find_one(doc! {}).await?;
    Ok(HandlerResponse::ok(optional_document_to_json(info)))
}

#[instrument(skip_all)]
pub async fn update_basic_info(
    State(state): State<AppState>,
    Json(info): Json<BasicInfo>,
) -> ApiResult<HandlerResponse> {
    state
        .database
        .lab_info()
        .update_one(doc! {}, doc! { "$set": info.to_set()? })
        .upsert(true)
        .await?;

    info!("Lab basic info updated");
    Ok(HandlerResponse::ok(json!({ "success": true })))
}

/// Replaces the `socialMedia` sub-document with the request body
#[instrument(skip_all)]
pub async fn update_social_media(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<HandlerResponse> {
    let social_media: Document = json_to_document(body)?;

    let result: UpdateResult = state
        .database
        .lab_info()
        .update_one(doc! {}, doc! { "$set": { "socialMedia": social_media } })
        .upsert(true)
        .await?;

    info!("Lab social media updated");
    Ok(HandlerResponse::ok(json!({
        "success": true,
        "modifiedCount": result.modified_count,
    })))
}
