// User management route definitions

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::api::{admin_only, authenticated};
use crate::config::state::AppState;
use super::handler;

pub fn user_routes(state: &AppState) -> Router<AppState> {
    let public: Router<AppState> = Router::new()
        .route("/users", post(handler::create_user))
        .route("/updateUserAndTeam", patch(handler::update_user_and_team))
        .route("/post/{email}", get(handler::author_profile));

    let token: Router<AppState> = Router::new()
        .route("/user", get(handler::get_user));

    let admin: Router<AppState> = Router::new()
        .route("/users", get(handler::list_users))
        .route("/users/admin/{id}", patch(handler::make_admin));

    public
        .merge(authenticated(token, state))
        .merge(admin_only(admin, state))
}
