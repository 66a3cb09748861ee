//! Store Status API Handlers

use axum::{Json, extract::State};
use serde::Serialize;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{ManualToggle, StoreStatus, StoreStatusUpdate};
use shared::store_hours::EffectiveStatus;
use shared::util::now_millis;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::db::store_status;
use crate::error::{validate, validation_error};
use crate::services::store;
use crate::state::AppState;

/// Admin view: what is stored plus what it resolves to right now
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatusView {
    pub status: StoreStatus,
    pub effective: EffectiveStatus,
}

async fn view(state: &AppState, status: StoreStatus) -> AppResult<StoreStatusView> {
    let effective = store::effective_status(&state.pool, state.config.store_timezone).await?;
    Ok(StoreStatusView { status, effective })
}

fn check_reopen_at(reopen_at: Option<i64>) -> AppResult<()> {
    if let Some(at) = reopen_at
        && at <= now_millis()
    {
        return Err(AppError::validation("reopenAt deve estar no futuro")
            .with_detail("reopenAt", vec!["past"]));
    }
    Ok(())
}

/// GET /api/public/store-status
pub async fn effective(State(state): State<AppState>) -> AppResult<ApiResponse<EffectiveStatus>> {
    let status = store::effective_status(&state.pool, state.config.store_timezone).await?;
    Ok(ApiResponse::success(status))
}

/// GET /api/admin/store-status
pub async fn get(State(state): State<AppState>) -> AppResult<ApiResponse<StoreStatusView>> {
    let status = store_status::get(&state.pool).await?;
    Ok(ApiResponse::success(view(&state, status).await?))
}

/// PUT /api/admin/store-status - absent fields keep their stored value
pub async fn update(
    State(state): State<AppState>,
    admin: CurrentUser,
    Json(payload): Json<StoreStatusUpdate>,
) -> AppResult<ApiResponse<StoreStatusView>> {
    payload.validate().map_err(|errors| {
        let err = validation_error(errors);
        let hours_invalid = err.details.as_ref().is_some_and(|d| d.contains_key("hours"));
        if hours_invalid {
            AppError {
                code: ErrorCode::InvalidStoreHours,
                message: ErrorCode::InvalidStoreHours.message().to_string(),
                details: err.details,
            }
        } else {
            err
        }
    })?;
    check_reopen_at(payload.reopen_at)?;

    let mut status = store_status::get(&state.pool).await?;
    payload.apply_to(&mut status, now_millis());
    let saved = store_status::save(&state.pool, &status).await?;

    tracing::info!(
        admin_id = admin.id,
        manual = saved.is_manual_mode,
        closed = saved.closed_now,
        "Store status updated"
    );
    Ok(ApiResponse::success(view(&state, saved).await?))
}

/// POST /api/admin/store-status/toggle - manual open/close
pub async fn toggle(
    State(state): State<AppState>,
    admin: CurrentUser,
    Json(payload): Json<ManualToggle>,
) -> AppResult<ApiResponse<StoreStatusView>> {
    validate(&payload)?;
    if payload.closed {
        check_reopen_at(payload.reopen_at)?;
    }

    let mut status = store_status::get(&state.pool).await?;
    status.is_manual_mode = true;
    status.closed_now = payload.closed;
    if payload.closed {
        status.reason = payload.reason.filter(|r| !r.trim().is_empty());
        status.reopen_at = payload.reopen_at;
    } else {
        status.reason = None;
        status.reopen_at = None;
    }
    let saved = store_status::save(&state.pool, &status).await?;

    tracing::info!(
        admin_id = admin.id,
        closed = saved.closed_now,
        reason = saved.reason.as_deref().unwrap_or(""),
        reopen_at = ?saved.reopen_at,
        "Store manually toggled"
    );
    Ok(ApiResponse::success(view(&state, saved).await?))
}
