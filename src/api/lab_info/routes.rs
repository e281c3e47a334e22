// Lab metadata route definitions

use axum::{
    routing::{get, patch},
    Router,
};

use crate::api::admin_only;
use crate::config::state::AppState;
use super::handler;

pub fn lab_info_routes(state: &AppState) -> Router<AppState> {
    let public: Router<AppState> = Router::new()
        .route("/labInfo", get(handler::get_lab_info));

    let admin: Router<AppState> = Router::new()
        .route("/basicInfo", patch(handler::update_basic_info))
        .route("/socialMedia", patch(handler::update_social_media));

    public.merge(admin_only(admin, state))
}
