//! Order Repository

use std::collections::HashMap;

use shared::models::{
    CustomerSnapshot, Fulfillment, Order, OrderItem, OrderStatus, PaymentMethod,
};
use shared::pricing::{PricedCart, from_cents, to_cents};
use shared::util::{now_millis, order_number, snowflake_id};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, decode_enum};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    customer_name: String,
    customer_phone: Option<String>,
    customer_address: Option<String>,
    fulfillment: String,
    subtotal_cents: i64,
    delivery_fee_cents: i64,
    total_cents: i64,
    payment_method: String,
    payment_txid: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: i64,
    updated_at: i64,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    order_id: i64,
    product_id: i64,
    product_name: String,
    size: String,
    unit_price_cents: i64,
    quantity: i64,
    line_total_cents: i64,
    notes: Option<String>,
}

const COLUMNS: &str = "id, customer_id, customer_name, customer_phone, customer_address, \
    fulfillment, subtotal_cents, delivery_fee_cents, total_cents, payment_method, \
    payment_txid, status, notes, created_at, updated_at";

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> RepoResult<Order> {
        Ok(Order {
            number: order_number(self.id),
            fulfillment: decode_enum(&self.fulfillment, "fulfillment", Fulfillment::parse)?,
            payment_method: decode_enum(
                &self.payment_method,
                "payment method",
                PaymentMethod::parse,
            )?,
            status: decode_enum(&self.status, "order status", OrderStatus::parse)?,
            id: self.id,
            customer_id: self.customer_id,
            customer: CustomerSnapshot {
                name: self.customer_name,
                phone: self.customer_phone,
                address: self.customer_address,
            },
            items,
            subtotal: from_cents(self.subtotal_cents),
            delivery_fee: from_cents(self.delivery_fee_cents),
            total: from_cents(self.total_cents),
            payment_txid: self.payment_txid,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<ItemRow> for OrderItem {
    fn from(row: ItemRow) -> Self {
        OrderItem {
            product_id: row.product_id,
            product_name: row.product_name,
            size: row.size,
            unit_price: from_cents(row.unit_price_cents),
            quantity: row.quantity.clamp(0, u32::MAX as i64) as u32,
            line_total: from_cents(row.line_total_cents),
            notes: row.notes,
        }
    }
}

async fn assemble(pool: &SqlitePool, rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    if rows.is_empty() {
        return Ok(vec![]);
    }
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT order_id, product_id, product_name, size, unit_price_cents, quantity, \
         line_total_cents, notes FROM order_items WHERE order_id IN (",
    );
    let mut ids = qb.separated(", ");
    for row in &rows {
        ids.push_bind(row.id);
    }
    qb.push(") ORDER BY order_id, position");
    let items: Vec<ItemRow> = qb.build_query_as().fetch_all(pool).await?;

    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item.into());
    }
    rows.into_iter()
        .map(|row| {
            let items = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(items)
        })
        .collect()
}

/// Everything needed to persist an order
pub struct NewOrder<'a> {
    pub customer_id: i64,
    pub customer: &'a CustomerSnapshot,
    pub cart: &'a PricedCart,
    pub fulfillment: Fulfillment,
    pub payment_method: PaymentMethod,
    pub payment_txid: Option<&'a str>,
    pub intent_id: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Insert order + items on an open connection/transaction; returns the new id
///
/// `created_at` is stamped by the INSERT itself, under the SQLite write lock,
/// one past the newest existing order at minimum. It therefore grows strictly
/// in commit order and works as a polling cursor.
pub async fn insert(conn: &mut SqliteConnection, order: &NewOrder<'_>) -> RepoResult<i64> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO orders (id, customer_id, customer_name, customer_phone, customer_address,
            fulfillment, subtotal_cents, delivery_fee_cents, total_cents, payment_method,
            payment_txid, intent_id, status, notes, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pendente', ?,
            MAX(?, COALESCE((SELECT MAX(created_at) FROM orders), 0) + 1), ?)",
    )
    .bind(id)
    .bind(order.customer_id)
    .bind(&order.customer.name)
    .bind(&order.customer.phone)
    .bind(&order.customer.address)
    .bind(order.fulfillment.as_str())
    .bind(to_cents(order.cart.subtotal))
    .bind(to_cents(order.cart.delivery_fee))
    .bind(to_cents(order.cart.total))
    .bind(order.payment_method.as_str())
    .bind(order.payment_txid)
    .bind(order.intent_id)
    .bind(order.notes)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    for (position, item) in order.cart.items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_items (order_id, position, product_id, product_name, size,
                unit_price_cents, quantity, line_total_cents, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(position as i64)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(&item.size)
        .bind(to_cents(item.unit_price))
        .bind(item.quantity as i64)
        .bind(to_cents(item.line_total))
        .bind(&item.notes)
        .execute(&mut *conn)
        .await?;
    }
    Ok(id)
}

pub async fn create(pool: &SqlitePool, order: &NewOrder<'_>) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;
    let id = insert(&mut *tx, order).await?;
    tx.commit().await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row: Option<OrderRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    match row {
        Some(row) => Ok(assemble(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Order owned by `customer_id`; someone else's order reads as absent
pub async fn find_for_customer(
    pool: &SqlitePool,
    id: i64,
    customer_id: i64,
) -> RepoResult<Option<Order>> {
    Ok(find_by_id(pool, id)
        .await?
        .filter(|o| o.customer_id == customer_id))
}

pub async fn list_for_customer(
    pool: &SqlitePool,
    customer_id: i64,
    limit: i64,
) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders WHERE customer_id = ? ORDER BY created_at DESC, id DESC LIMIT ?"
    ))
    .bind(customer_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    assemble(pool, rows).await
}

/// Admin listing, newest first
pub async fn list(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    limit: i64,
) -> RepoResult<Vec<Order>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM orders"));
    if let Some(status) = status {
        qb.push(" WHERE status = ").push_bind(status.as_str());
    }
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit);
    let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(pool).await?;
    assemble(pool, rows).await
}

/// Newest `created_at`, 0 on an empty table
pub async fn latest_created_at(pool: &SqlitePool) -> RepoResult<i64> {
    let (latest,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(created_at), 0) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(latest)
}

/// Orders created strictly after `since` (ms), oldest first
pub async fn list_since(pool: &SqlitePool, since: i64, limit: i64) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders WHERE created_at > ? ORDER BY created_at ASC, id ASC LIMIT ?"
    ))
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    assemble(pool, rows).await
}

/// Compare-and-set status change. `Ok(false)` when the order moved meanwhile.
pub async fn transition(
    pool: &SqlitePool,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
        .bind(to.as_str())
        .bind(now_millis())
        .bind(id)
        .bind(from.as_str())
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() == 1)
}
