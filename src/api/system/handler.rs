// Liveness and database health endpoints

use axum::{extract::State, http::StatusCode};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::state::AppState;
use crate::utils::HandlerResponse;

#[instrument]
pub async fn root_handler() -> HandlerResponse {
    HandlerResponse::new(StatusCode::OK).message("Lab is working")
}

/// Health check endpoint that verifies database connectivity
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> HandlerResponse {
    info!("Database health check called");
    let instance: String = get_instance_identifier();

    match state.database.ping().await {
        Ok(()) => HandlerResponse::new(StatusCode::OK)
            .data(json!({
                "database": "connected",
                "name": state.database.name(),
                "instance": instance,
            }))
            .message("Database connection healthy"),
        Err(e) => {
            warn!("Database health check failed: {:#}", e);
            HandlerResponse::new(StatusCode::SERVICE_UNAVAILABLE)
                .data(json!({
                    "database": "disconnected",
                    "error": format!("{e:#}"),
                    "instance": instance,
                }))
                .message("Database connection failed")
        }
    }
}

/// Generate a unique identifier for this application instance
pub fn get_instance_identifier() -> String {
    // Try to get container ID first (for Docker environments)
    if let Ok(hostname) = std::env::var("HOSTNAME") {
        if hostname.len() >= 12 && hostname.chars().all(|c: char| c.is_ascii_hexdigit() || c == '-') {
            return format!("container_{}", &hostname[..12]);
        }
        return format!("host_{}", hostname);
    }

    // Fallback to hostname
    if let Ok(hostname) = hostname::get() {
        if let Some(hostname_str) = hostname.to_str() {
            return format!("host_{}", hostname_str);
        }
    }

    // Last resort: a process-unique ID
    format!("process_{}", std::process::id())
}
