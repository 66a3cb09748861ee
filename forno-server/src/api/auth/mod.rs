//! Account API: registration, login, profile

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::state::AppState;

/// Unauthenticated customer routes (rate limited per IP)
pub fn customer_public_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/auth/register",
            post(handler::register).layer(middleware::from_fn_with_state(
                state.clone(),
                register_rate_limit,
            )),
        )
        .route(
            "/auth/login",
            post(handler::login).layer(middleware::from_fn_with_state(
                state.clone(),
                login_rate_limit,
            )),
        )
}

/// Authenticated customer routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(handler::get_profile).put(handler::update_profile),
    )
}

pub fn admin_public_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/auth/login",
        post(handler::admin_login).layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        )),
    )
}
