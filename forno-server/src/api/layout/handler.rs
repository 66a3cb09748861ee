//! Layout API Handlers

use axum::{Json, extract::State};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{LayoutSettings, LayoutUpdate, normalize_instagram};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::db::layout;
use crate::error::validation_error;
use crate::state::AppState;

fn invalid_layout(err: AppError) -> AppError {
    AppError {
        code: ErrorCode::InvalidLayout,
        message: ErrorCode::InvalidLayout.message().to_string(),
        details: err.details,
    }
}

/// Empty string clears the field
fn merge_url(current: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming {
        let value = value.trim();
        *current = (!value.is_empty()).then(|| value.to_string());
    }
}

/// GET /api/public/layout, GET /api/admin/layout
pub async fn get(State(state): State<AppState>) -> AppResult<ApiResponse<LayoutSettings>> {
    Ok(ApiResponse::success(layout::get(&state.pool).await?))
}

/// PUT /api/admin/layout
pub async fn update(
    State(state): State<AppState>,
    admin: CurrentUser,
    Json(payload): Json<LayoutUpdate>,
) -> AppResult<ApiResponse<LayoutSettings>> {
    payload
        .validate()
        .map_err(|e| invalid_layout(validation_error(e)))?;

    let mut settings = layout::get(&state.pool).await?;
    merge_url(&mut settings.logo_url, payload.logo_url);
    merge_url(&mut settings.background_url, payload.background_url);
    if let Some(slides) = payload.slides {
        settings.slides = slides;
    }
    if let Some(raw) = payload.instagram.as_deref() {
        settings.instagram = normalize_instagram(raw).map_err(|_| {
            AppError::new(ErrorCode::InvalidLayout).with_detail("instagram", vec!["instagram"])
        })?;
    }

    let saved = layout::save(&state.pool, &settings).await?;
    tracing::info!(admin_id = admin.id, slides = saved.slides.len(), "Layout updated");
    Ok(ApiResponse::success(saved))
}
