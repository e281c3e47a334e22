use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::bson::Document;
use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::api::middleware::auth::is_admin;
use crate::config::state::AppState;
use crate::database::documents::bson_to_json;
use crate::services::Claims;
use crate::utils::{ApiError, ApiResult, HandlerResponse};

/// Signs the posted payload into a bearer token valid for the configured TTL
#[instrument(skip_all)]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> ApiResult<HandlerResponse> {
    let token: String = state.tokens.issue(payload)?;
    Ok(HandlerResponse::ok(json!({ "token": token })))
}

/// Tells the caller whether they are an admin
#[instrument(skip(state, claims))]
pub async fn check_admin(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(email): Path<String>,
) -> ApiResult<HandlerResponse> {
    ensure_own_email(&claims, &email)?;

    let user: Option<Document> = state.database.find_user_by_email(&email).await?;
    let admin: bool = user.as_ref().is_some_and(is_admin);

    Ok(HandlerResponse::ok(json!({ "admin": admin })))
}

/// Returns the caller's stored role, or `false` when they have no user record
#[instrument(skip(state, claims))]
pub async fn check_role(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(email): Path<String>,
) -> ApiResult<HandlerResponse> {
    ensure_own_email(&claims, &email)?;

    let user: Option<Document> = state.database.find_user_by_email(&email).await?;
    let role: Value = match user {
        Some(mut user) => user.remove("role").map(bson_to_json).unwrap_or(Value::Null),
        None => Value::Bool(false),
    };

    Ok(HandlerResponse::ok(json!({ "role": role })))
}

/// Callers may only ask about themselves.
pub fn ensure_own_email(claims: &Claims, email: &str) -> ApiResult<()> {
    if claims.email == email {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}
