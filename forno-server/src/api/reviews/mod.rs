//! Reviews API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/reviews", get(handler::list))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/reviews", get(handler::list))
}
