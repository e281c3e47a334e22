// Bearer token verification and role gates

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use mongodb::bson::{Bson, Document};

use crate::config::state::AppState;
use crate::services::{bearer_token, Claims};
use crate::utils::ApiError;

pub const ADMIN_ROLE: &str = "admin";

/// Middleware that requires a valid bearer token and stores its `Claims`
/// in the request extensions.
pub async fn verify_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token: &str = bearer_token(request.headers().get(AUTHORIZATION))
        .ok_or_else(ApiError::unauthorized)?;

    let claims: Claims = state.tokens.verify(token)?;
    tracing::debug!("Authenticated request for {}", claims.email);

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Must run after `verify_token`. Admits only users whose role is `admin`.
pub async fn verify_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let email: String = caller_email(&request)?;
    let user: Option<Document> = state.database.find_user_by_email(&email).await?;

    if !user.as_ref().is_some_and(is_admin) {
        return Err(ApiError::forbidden());
    }

    Ok(next.run(request).await)
}

/// Must run after `verify_token`. Admits any user that has a role.
pub async fn verify_role(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let email: String = caller_email(&request)?;
    let user: Option<Document> = state.database.find_user_by_email(&email).await?;

    if !user.as_ref().is_some_and(has_role) {
        return Err(ApiError::forbidden());
    }

    Ok(next.run(request).await)
}

/// Email of the caller authenticated by `verify_token`. Owned so that no
/// borrow of the request is held across the user lookup.
fn caller_email(request: &Request) -> Result<String, ApiError> {
    request
        .extensions()
        .get::<Claims>()
        .map(|claims: &Claims| claims.email.clone())
        .ok_or_else(ApiError::unauthorized)
}

pub fn is_admin(user: &Document) -> bool {
    matches!(user.get("role"), Some(Bson::String(role)) if role == ADMIN_ROLE)
}

pub fn has_role(user: &Document) -> bool {
    user.get("role").is_some_and(is_truthy)
}

/// Loose truthiness for schemaless fields: empty strings, zero, false and
/// null do not count.
pub fn is_truthy(value: &Bson) -> bool {
    match value {
        Bson::Null | Bson::Undefined => false,
        Bson::Boolean(flag) => *flag,
        Bson::String(text) => !text.is_empty(),
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => *n != 0.0 && !n.is_nan(),
        _ => true,
    }
}
