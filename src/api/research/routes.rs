// Research paper route definitions

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::{admin_only, role_only};
use crate::config::state::AppState;
use super::handler;

pub fn research_routes(state: &AppState) -> Router<AppState> {
    let public: Router<AppState> = Router::new()
        .route("/researchPapers", get(handler::list_papers))
        .route("/resentResearchPapers", get(handler::recent_papers))
        .route("/researchPaper/{id}", get(handler::get_paper))
        .route("/morePaper/{id}", get(handler::more_papers));

    let role: Router<AppState> = Router::new()
        .route("/ResearchRequest", post(handler::create_request));

    let admin: Router<AppState> = Router::new()
        .route("/researchPaper/{id}", post(handler::publish_request))
        .route("/ResearchRequest", get(handler::list_requests))
        .route("/ResearchRequest/{id}", delete(handler::delete_request));

    public
        .merge(role_only(role, state))
        .merge(admin_only(admin, state))
}
