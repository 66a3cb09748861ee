//! Health check and clock sync

use axum::{Json, Router, extract::State, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use shared::error::ApiResponse;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "forno-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    /// Unix millis
    pub now: i64,
    pub iso: String,
    pub timezone: String,
}

/// GET /api/public/time - server clock for client-side drift correction
pub async fn server_time(State(state): State<AppState>) -> ApiResponse<ServerTime> {
    let now = Utc::now();
    ApiResponse::success(ServerTime {
        now: now.timestamp_millis(),
        iso: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        timezone: state.config.store_timezone.name().to_string(),
    })
}
