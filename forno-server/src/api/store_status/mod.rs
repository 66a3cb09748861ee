//! Store Status API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/store-status", get(handler::effective))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/store-status", get(handler::get).put(handler::update))
        .route("/store-status/toggle", post(handler::toggle))
}
