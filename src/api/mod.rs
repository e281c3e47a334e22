/*
* HTTP API: one module per resource, each with its handlers and routes.
*/

use axum::{middleware::from_fn_with_state, Router};

use crate::config::state::AppState;

pub mod applications;
pub mod auth;
pub mod catalog;
pub mod lab_info;
pub mod middleware;
pub mod news;
pub mod research;
pub mod system;
pub mod team;
pub mod users;

/// Routes that need a valid bearer token.
pub fn authenticated(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(from_fn_with_state(state.clone(), middleware::verify_token))
}

/// Routes that need a token whose user has the admin role.
/// The last layer added runs first, so the token is checked before the role.
pub fn admin_only(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(from_fn_with_state(state.clone(), middleware::verify_admin))
        .route_layer(from_fn_with_state(state.clone(), middleware::verify_token))
}

/// Routes that need a token whose user has any role.
pub fn role_only(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(from_fn_with_state(state.clone(), middleware::verify_role))
        .route_layer(from_fn_with_state(state.clone(), middleware::verify_token))
}

/// All JSON endpoints.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(system::routes::system_routes())
        .merge(auth::routes::auth_routes(state))
        .merge(users::routes::user_routes(state))
        .merge(lab_info::routes::lab_info_routes(state))
        .merge(team::routes::team_routes(state))
        .merge(research::routes::research_routes(state))
        .merge(news::routes::news_routes(state))
        .merge(applications::routes::application_routes(state))
        .merge(catalog::routes::catalog_routes(state))
}
