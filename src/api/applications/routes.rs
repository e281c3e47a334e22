// Application route definitions

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::{admin_only, authenticated};
use crate::config::state::AppState;
use super::handler;

pub fn application_routes(state: &AppState) -> Router<AppState> {
    let token: Router<AppState> = Router::new()
        .route("/submitApplication", post(handler::submit_application));

    let admin: Router<AppState> = Router::new()
        .route("/applications", get(handler::list_applications))
        .route("/application/{id}", delete(handler::delete_application));

    authenticated(token, state).merge(admin_only(admin, state))
}
