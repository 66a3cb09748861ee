//! Dashboard API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(handler::stats))
}
