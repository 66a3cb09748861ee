//! Payment processor webhook

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/webhooks/payment", post(handler::payment))
}
