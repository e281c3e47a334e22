// Contact, open position and research area route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::authenticated;
use crate::config::state::AppState;
use super::handler;

pub fn catalog_routes(state: &AppState) -> Router<AppState> {
    let public: Router<AppState> = Router::new()
        .route("/openPositions", get(handler::list_open_positions))
        .route("/researchArea", get(handler::list_research_areas))
        .route("/researchArea/{id}", get(handler::get_research_area));

    let token: Router<AppState> = Router::new()
        .route("/contacts", post(handler::create_contact));

    public.merge(authenticated(token, state))
}
