//! Layout Settings Repository (singleton row)

use shared::models::{CarouselSlide, LayoutSettings};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::RepoResult;

#[derive(sqlx::FromRow)]
struct LayoutRow {
    logo_url: Option<String>,
    background_url: Option<String>,
    slides: String,
    instagram: Option<String>,
    updated_at: Option<i64>,
}

pub async fn get(pool: &SqlitePool) -> RepoResult<LayoutSettings> {
    let row: Option<LayoutRow> = sqlx::query_as(
        "SELECT logo_url, background_url, slides, instagram, updated_at FROM layout_settings WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Ok(LayoutSettings::default());
    };
    let slides: Vec<CarouselSlide> = serde_json::from_str(&row.slides)?;
    Ok(LayoutSettings {
        logo_url: row.logo_url,
        background_url: row.background_url,
        slides,
        instagram: row.instagram,
        updated_at: row.updated_at,
    })
}

/// Replace the whole row
pub async fn save(pool: &SqlitePool, layout: &LayoutSettings) -> RepoResult<LayoutSettings> {
    let slides = serde_json::to_string(&layout.slides)?;
    sqlx::query(
        "INSERT INTO layout_settings (id, logo_url, background_url, slides, instagram, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (id) DO UPDATE SET
            logo_url = ?1, background_url = ?2, slides = ?3, instagram = ?4, updated_at = ?5",
    )
    .bind(&layout.logo_url)
    .bind(&layout.background_url)
    .bind(slides)
    .bind(&layout.instagram)
    .bind(now_millis())
    .execute(pool)
    .await?;
    get(pool).await
}
