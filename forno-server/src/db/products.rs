//! Product Repository

use std::collections::HashMap;

use shared::models::{Product, ProductCreate, ProductStatus, ProductUpdate, SizePrice};
use shared::pricing::{from_cents, to_cents};
use shared::util::{now_millis, snowflake_id};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{RepoError, RepoResult, decode_enum};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    category: String,
    image_url: Option<String>,
    status: String,
    created_at: i64,
    updated_at: i64,
}

#[derive(sqlx::FromRow)]
struct SizeRow {
    product_id: i64,
    size: String,
    price_cents: i64,
}

const COLUMNS: &str =
    "id, name, description, category, image_url, status, created_at, updated_at";

impl ProductRow {
    fn into_product(self, sizes: Vec<SizePrice>) -> RepoResult<Product> {
        Ok(Product {
            status: decode_enum(&self.status, "product status", ProductStatus::parse)?,
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            sizes,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Load sizes for the given rows (one query) and assemble products
async fn assemble(pool: &SqlitePool, rows: Vec<ProductRow>) -> RepoResult<Vec<Product>> {
    if rows.is_empty() {
        return Ok(vec![]);
    }
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT product_id, size, price_cents FROM product_sizes WHERE product_id IN (",
    );
    let mut ids = qb.separated(", ");
    for row in &rows {
        ids.push_bind(row.id);
    }
    qb.push(") ORDER BY product_id, position");
    let size_rows: Vec<SizeRow> = qb.build_query_as().fetch_all(pool).await?;

    let mut by_product: HashMap<i64, Vec<SizePrice>> = HashMap::new();
    for s in size_rows {
        by_product.entry(s.product_id).or_default().push(SizePrice {
            size: s.size,
            price: from_cents(s.price_cents),
        });
    }
    rows.into_iter()
        .map(|row| {
            let sizes = by_product.remove(&row.id).unwrap_or_default();
            row.into_product(sizes)
        })
        .collect()
}

/// List products, optionally only active ones and/or a single category
pub async fn find_all(
    pool: &SqlitePool,
    only_active: bool,
    category: Option<&str>,
) -> RepoResult<Vec<Product>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM products WHERE 1 = 1"));
    if only_active {
        qb.push(" AND status = 'ativo'");
    }
    if let Some(category) = category {
        qb.push(" AND category = ").push_bind(category.to_string());
        qb.push(" COLLATE NOCASE");
    }
    qb.push(" ORDER BY category, name");
    let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(pool).await?;
    assemble(pool, rows).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row: Option<ProductRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM products WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    match row {
        Some(row) => Ok(assemble(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Products referenced by a cart (any status; pricing decides availability)
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM products WHERE id IN ("));
    let mut sep = qb.separated(", ");
    for id in ids {
        sep.push_bind(*id);
    }
    qb.push(")");
    let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(pool).await?;
    assemble(pool, rows).await
}

async fn replace_sizes(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    product_id: i64,
    sizes: &[SizePrice],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM product_sizes WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    for (position, entry) in sizes.iter().enumerate() {
        sqlx::query(
            "INSERT INTO product_sizes (product_id, position, size, price_cents) VALUES (?, ?, ?, ?)",
        )
        .bind(product_id)
        .bind(position as i64)
        .bind(entry.size.trim())
        .bind(to_cents(entry.price))
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let id = snowflake_id();
    let now = now_millis();
    let status = data.status.unwrap_or_default();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO products (id, name, description, category, image_url, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.category.trim())
    .bind(&data.image_url)
    .bind(status.as_str())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    replace_sizes(&mut tx, id, &data.sizes).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE products SET
            name = COALESCE(?1, name),
            description = COALESCE(?2, description),
            category = COALESCE(?3, category),
            image_url = COALESCE(?4, image_url),
            status = COALESCE(?5, status),
            updated_at = ?6
         WHERE id = ?7",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.category.as_deref().map(str::trim))
    .bind(&data.image_url)
    .bind(data.status.map(|s| s.as_str()))
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    if let Some(sizes) = &data.sizes {
        replace_sizes(&mut tx, id, sizes).await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: ProductStatus) -> RepoResult<Product> {
    let rows = sqlx::query("UPDATE products SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete; past orders keep their item snapshots
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Distinct categories of active products
pub async fn categories(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT category FROM products WHERE status = 'ativo' ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}
