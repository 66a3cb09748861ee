//! Store Status Repository (singleton row)

use std::collections::BTreeMap;

use shared::models::{DayHours, StoreStatus, Weekday};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::RepoResult;

#[derive(sqlx::FromRow)]
struct StatusRow {
    closed_now: bool,
    reason: Option<String>,
    reopen_at: Option<i64>,
    is_manual_mode: bool,
    hours: String,
    updated_at: Option<i64>,
}

pub async fn get(pool: &SqlitePool) -> RepoResult<StoreStatus> {
    let row: Option<StatusRow> = sqlx::query_as(
        "SELECT closed_now, reason, reopen_at, is_manual_mode, hours, updated_at
         FROM store_status WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Ok(StoreStatus::default());
    };
    let hours: BTreeMap<Weekday, DayHours> = serde_json::from_str(&row.hours)?;
    Ok(StoreStatus {
        closed_now: row.closed_now,
        reason: row.reason,
        reopen_at: row.reopen_at,
        is_manual_mode: row.is_manual_mode,
        hours,
        updated_at: row.updated_at,
    })
}

/// Replace the whole row
pub async fn save(pool: &SqlitePool, status: &StoreStatus) -> RepoResult<StoreStatus> {
    let hours = serde_json::to_string(&status.hours)?;
    sqlx::query(
        "INSERT INTO store_status (id, closed_now, reason, reopen_at, is_manual_mode, hours, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (id) DO UPDATE SET
            closed_now = ?1, reason = ?2, reopen_at = ?3, is_manual_mode = ?4,
            hours = ?5, updated_at = ?6",
    )
    .bind(status.closed_now)
    .bind(&status.reason)
    .bind(status.reopen_at)
    .bind(status.is_manual_mode)
    .bind(hours)
    .bind(now_millis())
    .execute(pool)
    .await?;
    get(pool).await
}
