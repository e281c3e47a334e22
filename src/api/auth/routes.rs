use axum::{routing::{get, post}, Router};
use crate::api::authenticated;
use crate::config::state::AppState;
use super::handler;

pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let public: Router<AppState> = Router::new()
        .route("/jwt", post(handler::issue_token));

    let token: Router<AppState> = Router::new()
        .route("/user/admin/{email}", get(handler::check_admin))
        .route("/user/role/{email}", get(handler::check_role));

    public.merge(authenticated(token, state))
}
