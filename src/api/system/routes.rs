// Liveness and health route definitions

use axum::{routing::get, Router};

use crate::config::state::AppState;
use super::handler;

pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::root_handler))
        .route("/health", get(handler::health_check))
}
