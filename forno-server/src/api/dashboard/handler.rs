//! Dashboard API Handlers

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::error::{ApiResponse, AppResult};
use shared::models::DashboardStats;
use shared::util::now_millis;

use crate::db::dashboard;
use crate::state::AppState;

const DEFAULT_DAYS: u32 = 7;
const MAX_DAYS: u32 = 365;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub days: Option<u32>,
}

/// GET /api/admin/dashboard?days=N
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<ApiResponse<DashboardStats>> {
    let days = query.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS);
    let stats =
        dashboard::stats(&state.pool, state.config.store_timezone, days, now_millis()).await?;
    Ok(ApiResponse::success(stats))
}
