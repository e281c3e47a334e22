// News route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::admin_only;
use crate::config::state::AppState;
use super::handler;

pub fn news_routes(state: &AppState) -> Router<AppState> {
    let public: Router<AppState> = Router::new()
        .route("/news", get(handler::list_news))
        .route("/news/{id}", get(handler::get_news));

    let admin: Router<AppState> = Router::new()
        .route("/news", post(handler::create_news));

    public.merge(admin_only(admin, state))
}
