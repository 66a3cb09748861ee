//! Processed webhook ledger (idempotency on processor txid)

use shared::util::now_millis;
use sqlx::SqliteConnection;

use super::RepoResult;

/// Record `txid`. Returns `false` when it was already processed.
///
/// INSERT first and check rows_affected, so two concurrent deliveries cannot
/// both pass a read-then-write check.
pub async fn record(
    conn: &mut SqliteConnection,
    txid: &str,
    intent_id: &str,
    status: &str,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "INSERT INTO processed_webhooks (txid, intent_id, status, processed_at)
         VALUES (?, ?, ?, ?) ON CONFLICT (txid) DO NOTHING",
    )
    .bind(txid)
    .bind(intent_id)
    .bind(status)
    .bind(now_millis())
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}
