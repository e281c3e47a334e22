// User management handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    results::{InsertOneResult, UpdateResult},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::api::middleware::auth::ADMIN_ROLE;
use crate::config::state::AppState;
use crate::database::documents::{
    bson_to_json, collect_documents, documents_to_json, inserted_id_json, json_to_bson,
    json_to_document, optional_document_to_json, parse_object_id,
};
use crate::utils::{ApiError, ApiResult, HandlerResponse};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
}

/// Profile fields editable by the member themselves. Values are stored as
/// sent, whatever their JSON type.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<Value>,
    pub name: Option<Value>,
    pub photo_url: Option<Value>,
    pub phone: Option<Value>,
    pub university: Option<Value>,
    pub details: Option<Value>,
    pub social_media: Option<Value>,
}

fn set_if_sent(changes: &mut Document, key: &str, value: &Option<Value>) -> ApiResult<()> {
    if value.is_some() {
        changes.insert(key, json_to_bson(value.clone())?);
    }
    Ok(())
}

impl ProfileUpdate {
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_ref()
            .and_then(Value::as_str)
            .filter(|email: &&str| !email.is_empty())
    }

    /// `$set` for the users collection: only the fields that were sent.
    pub fn user_changes(&self) -> ApiResult<Document> {
        let mut changes: Document = Document::new();
        set_if_sent(&mut changes, "name", &self.name)?;
        set_if_sent(&mut changes, "photoUrl", &self.photo_url)?;
        Ok(changes)
    }

    /// `$set` for the team collection. `socialMedia` always resets to `{}`
    /// when omitted.
    pub fn team_changes(&self) -> ApiResult<Document> {
        let mut changes: Document = Document::new();
        set_if_sent(&mut changes, "name", &self.name)?;
        set_if_sent(&mut changes, "phone", &self.phone)?;
        set_if_sent(&mut changes, "university", &self.university)?;
        set_if_sent(&mut changes, "image", &self.photo_url)?;
        set_if_sent(&mut changes, "details", &self.details)?;

        let social_media: Document = match &self.social_media {
            Some(value @ Value::Object(_)) => json_to_document(value.clone())?,
            Some(Value::Null) | None => Document::new(),
            Some(_) => return Err(ApiError::BadRequest("socialMedia must be an object".to_string())),
        };
        changes.insert("socialMedia", social_media);

        Ok(changes)
    }
}

pub fn update_result_json(result: UpdateResult) -> Value {
    json!({
        "matchedCount": result.matched_count,
        "modifiedCount": result.modified_count,
        "upsertedId": result.upserted_id.map(bson_to_json),
    })
}

/// Lists every user
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let users: Vec<Document> = collect_documents(state.database.users().find(doc! {}).await?).await?;
    info!("Retrieved {} users", users.len());
    Ok(HandlerResponse::ok(documents_to_json(users)))
}

/// Fetches one user by `?email=`, `null` when there is none
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<HandlerResponse> {
    let Some(email) = query.email else {
        return Ok(HandlerResponse::ok(Value::Null));
    };

    let user: Option<Document> = state.database.find_user_by_email(&email).await?;
    Ok(HandlerResponse::ok(optional_document_to_json(user)))
}

/// Registers a user record unless one with the same email exists
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<HandlerResponse> {
    let user: Document = json_to_document(body)?;

    if let Some(email) = user.get("email") {
        let existing: Option<Document> = state.database.users().find_one(doc! { "email": email.clone() }).await?;
        if existing.is_some() {
            info!("User {} already registered", email);
            return Ok(HandlerResponse::ok(json!({ "insertedId": null }))
                .message("User already exists in the database"));
        }
    }

    let result: InsertOneResult = state.database.users().insert_one(user).await?;
    Ok(HandlerResponse::ok(inserted_id_json(result)))
}

/// Updates the profile on both the user and the matching team member
#[instrument(skip_all)]
pub async fn update_user_and_team(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<HandlerResponse> {
    let Some(email) = update.email() else {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    };
    let query: Document = doc! { "email": email };

    let user_changes: Document = update.user_changes()?;
    let team_changes: Document = update.team_changes()?;

    let user_modified: u64 = if user_changes.is_empty() {
        0
    } else {
        state
            .database
            .users()
            .update_one(query.clone(), doc! { "$set": user_changes })
            .await?
            .modified_count
    };

    let team_modified: u64 = state
        .database
        .team()
        .update_one(query, doc! { "$set": team_changes })
        .await?
        .modified_count;

    let message: &str = if user_modified > 0 || team_modified > 0 {
        "Profile updated successfully"
    } else {
        "No changes were made"
    };

    Ok(HandlerResponse::ok(json!({
        "userModified": user_modified,
        "teamModified": team_modified,
    }))
    .message(message))
}

/// Grants the admin role to the user with the given id
#[instrument(skip(state))]
pub async fn make_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid user ID format")?;

    let result: UpdateResult = state
        .database
        .users()
        .update_one(doc! { "_id": id }, doc! { "$set": { "role": ADMIN_ROLE } })
        .upsert(true)
        .await?;

    info!("Granted admin role to {}", id);
    Ok(HandlerResponse::ok(update_result_json(result)))
}

/// Public author card: name and photo only
#[instrument(skip(state))]
pub async fn author_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<HandlerResponse> {
    let author: Option<Document> = state
        .database
        .users()
        .find_one(doc! { "email": email.as_str() })
        .projection(doc! { "name": 1, "photoUrl": 1 })
        .await?;

    match author {
        Some(author) => Ok(HandlerResponse::ok(bson_to_json(Bson::Document(author)))),
        None => {
            warn!("Author {} not found", email);
            Err(ApiError::NotFound("Author not found".to_string()))
        }
    }
}
