//! Review Repository

use shared::models::Review;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    user_id: i64,
    order_id: i64,
    rating: i64,
    comment: Option<String>,
    user_name: Option<String>,
    created_at: i64,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            user_id: row.user_id,
            order_id: row.order_id,
            rating: row.rating.clamp(1, 5) as u8,
            comment: row.comment,
            user_name: row.user_name,
            created_at: row.created_at,
        }
    }
}

const SELECT: &str = "SELECT r.id, r.user_id, r.order_id, r.rating, r.comment, \
    u.name AS user_name, r.created_at FROM reviews r LEFT JOIN users u ON u.id = r.user_id";

/// Insert; a second review for the same order is `RepoError::Duplicate`
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    order_id: i64,
    rating: u8,
    comment: Option<&str>,
) -> RepoResult<Review> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO reviews (id, user_id, order_id, rating, comment, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(order_id)
    .bind(rating as i64)
    .bind(comment.map(str::trim).filter(|c| !c.is_empty()))
    .bind(now_millis())
    .execute(pool)
    .await?;

    let row: Option<ReviewRow> = sqlx::query_as(&format!("{SELECT} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(Review::from)
        .ok_or_else(|| RepoError::Database("Failed to create review".into()))
}

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Review>> {
    let row: Option<ReviewRow> = sqlx::query_as(&format!("{SELECT} WHERE r.order_id = ?"))
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Review::from))
}

pub async fn list_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<Review>> {
    let rows: Vec<ReviewRow> =
        sqlx::query_as(&format!("{SELECT} ORDER BY r.created_at DESC, r.id DESC LIMIT ?"))
            .bind(limit)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(Review::from).collect())
}

/// (average rating, count) over all reviews, or since `since` ms when given
pub async fn aggregate(pool: &SqlitePool, since: Option<i64>) -> RepoResult<(Option<f64>, i64)> {
    let row: (Option<f64>, i64) = sqlx::query_as(
        "SELECT AVG(CAST(rating AS REAL)), COUNT(*) FROM reviews WHERE created_at >= COALESCE(?, 0)",
    )
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
