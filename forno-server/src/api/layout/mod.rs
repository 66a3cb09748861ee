//! Layout API (storefront branding)

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/layout", get(handler::get))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/layout", get(handler::get).put(handler::update))
}
