// Team route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{admin_only, authenticated};
use crate::config::state::AppState;
use super::handler;

pub fn team_routes(state: &AppState) -> Router<AppState> {
    let public: Router<AppState> = Router::new()
        .route("/team", get(handler::list_team));

    let token: Router<AppState> = Router::new()
        .route("/userInfoInTeam", get(handler::my_team_profile));

    let admin: Router<AppState> = Router::new()
        .route("/team/{id}", post(handler::add_member_from_application));

    public
        .merge(authenticated(token, state))
        .merge(admin_only(admin, state))
}
