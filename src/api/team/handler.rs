// Team member handlers, including promotion of an application to the team

use axum::extract::{Extension, Path, State};
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime, Document},
    results::InsertOneResult,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::state::AppState;
use crate::database::documents::{
    bson_to_json, collect_documents, documents_to_json, optional_document_to_json, parse_object_id,
};
use crate::services::Claims;
use crate::utils::{ApiError, ApiResult, HandlerResponse};

/// A team member built from an accepted application.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    pub member: Document,
    pub email: Bson,
    pub role: Bson,
    pub resume_path: Option<String>,
}

/// Drops the resume metadata and stamps a fresh `createdAt`; every other
/// application field, `_id` included, carries over.
pub fn promote(mut application: Document, now: DateTime) -> Promotion {
    let resume_path: Option<String> = match application.remove("resume") {
        Some(Bson::Document(resume)) => resume.get_str("path").ok().map(String::from),
        _ => None,
    };

    let email: Bson = application.get("email").cloned().unwrap_or(Bson::Null);
    let role: Bson = application.get("role").cloned().unwrap_or(Bson::Null);
    application.insert("createdAt", now);

    Promotion {
        member: application,
        email,
        role,
        resume_path,
    }
}

#[instrument(skip(state))]
pub async fn list_team(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let members: Vec<Document> = collect_documents(state.database.team().find(doc! {}).await?).await?;
    Ok(HandlerResponse::ok(documents_to_json(members)))
}

/// The caller's own team record, `null` if they are not on the team
#[instrument(skip_all)]
pub async fn my_team_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<HandlerResponse> {
    let member: Option<Document> = state
        .database
        .team()
        .find_one(doc! { "email": claims.email.as_str() })
        .await?;

    Ok(HandlerResponse::ok(optional_document_to_json(member)))
}

/// Moves an application into the team and marks the user as a member
#[instrument(skip(state))]
pub async fn add_member_from_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid ID format")?;

    let application: Document = state
        .database
        .applications()
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    let promotion: Promotion = promote(application, DateTime::now());

    let existing: Option<Document> = state
        .database
        .team()
        .find_one(doc! { "email": promotion.email.clone() })
        .await?;

    if existing.is_some() {
        warn!("Team member {} already exists", promotion.email);
        return Err(ApiError::Conflict {
            message: "Member with this email already exists in the team".to_string(),
            data: json!({ "success": false, "email": bson_to_json(promotion.email) }),
        });
    }

    let result: InsertOneResult = state.database.team().insert_one(promotion.member).await?;

    state
        .database
        .users()
        .update_one(
            doc! { "email": promotion.email.clone() },
            doc! {
                "$set": {
                    "role": promotion.role.clone(),
                    "isTeamMember": true,
                    "teamJoinDate": DateTime::now(),
                }
            },
        )
        .upsert(true)
        .await?;

    if let Some(path) = &promotion.resume_path {
        state.uploads.remove(path).await;
    }

    state.database.applications().delete_one(doc! { "_id": id }).await?;

    info!("Application {} promoted to team member", id);
    Ok(HandlerResponse::ok(json!({
        "success": true,
        "insertedId": bson_to_json(result.inserted_id),
        "role": bson_to_json(promotion.role),
    }))
    .message("Member added to team successfully"))
}
