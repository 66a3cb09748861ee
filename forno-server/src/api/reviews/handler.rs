//! Reviews API Handlers

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::error::{ApiResponse, AppResult};
use shared::models::ReviewSummary;

use crate::db::reviews;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub limit: Option<i64>,
}

/// Latest reviews with the all-time average
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<ApiResponse<ReviewSummary>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let (average, count) = reviews::aggregate(&state.pool, None).await?;
    let reviews = reviews::list_recent(&state.pool, limit).await?;
    Ok(ApiResponse::success(ReviewSummary {
        average,
        count,
        reviews,
    }))
}
