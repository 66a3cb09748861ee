//! Effective store status at request time

use chrono::Utc;
use shared::error::AppError;
use shared::store_hours::{EffectiveStatus, resolve};
use sqlx::SqlitePool;

use crate::db::store_status;

/// Combine the stored status with the clock, in the store timezone
pub async fn effective_status(
    pool: &SqlitePool,
    tz: chrono_tz::Tz,
) -> Result<EffectiveStatus, AppError> {
    let status = store_status::get(pool).await?;
    Ok(resolve(&status, Utc::now().with_timezone(&tz)))
}

/// `STORE_CLOSED` (403) unless the store is effectively open right now
pub async fn ensure_open(pool: &SqlitePool, tz: chrono_tz::Tz) -> Result<(), AppError> {
    let status = effective_status(pool, tz).await?;
    if status.effective_closed {
        tracing::info!(
            source = ?status.source,
            reason = status.reason.as_deref().unwrap_or(""),
            "Order rejected: store closed"
        );
        return Err(AppError::store_closed(
            status.reason.as_deref(),
            status.reopen_at,
        ));
    }
    Ok(())
}
