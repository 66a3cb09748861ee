//! Order Intent Repository
//!
//! The priced cart is frozen into a JSON column (amounts in cents) at intent
//! creation so the webhook materializes exactly what the customer was quoted.

use serde::{Deserialize, Serialize};
use shared::models::{CustomerSnapshot, Fulfillment, IntentState, OrderIntent, OrderItem};
use shared::pricing::{PricedCart, from_cents, to_cents};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult, decode_enum};

#[derive(Serialize, Deserialize)]
struct StoredItem {
    product_id: i64,
    product_name: String,
    size: String,
    unit_price_cents: i64,
    quantity: u32,
    line_total_cents: i64,
    notes: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct StoredCart {
    items: Vec<StoredItem>,
    subtotal_cents: i64,
    delivery_fee_cents: i64,
    total_cents: i64,
}

impl From<&PricedCart> for StoredCart {
    fn from(cart: &PricedCart) -> Self {
        StoredCart {
            items: cart
                .items
                .iter()
                .map(|i| StoredItem {
                    product_id: i.product_id,
                    product_name: i.product_name.clone(),
                    size: i.size.clone(),
                    unit_price_cents: to_cents(i.unit_price),
                    quantity: i.quantity,
                    line_total_cents: to_cents(i.line_total),
                    notes: i.notes.clone(),
                })
                .collect(),
            subtotal_cents: to_cents(cart.subtotal),
            delivery_fee_cents: to_cents(cart.delivery_fee),
            total_cents: to_cents(cart.total),
        }
    }
}

impl From<StoredCart> for PricedCart {
    fn from(cart: StoredCart) -> Self {
        PricedCart {
            items: cart
                .items
                .into_iter()
                .map(|i| OrderItem {
                    product_id: i.product_id,
                    product_name: i.product_name,
                    size: i.size,
                    unit_price: from_cents(i.unit_price_cents),
                    quantity: i.quantity,
                    line_total: from_cents(i.line_total_cents),
                    notes: i.notes,
                })
                .collect(),
            subtotal: from_cents(cart.subtotal_cents),
            delivery_fee: from_cents(cart.delivery_fee_cents),
            total: from_cents(cart.total_cents),
        }
    }
}

#[derive(sqlx::FromRow)]
struct IntentRow {
    id: String,
    customer_id: i64,
    customer_name: String,
    customer_phone: Option<String>,
    customer_address: Option<String>,
    fulfillment: String,
    notes: Option<String>,
    cart: String,
    amount_cents: i64,
    state: String,
    order_id: Option<i64>,
    created_at: i64,
    expires_at: i64,
}

const COLUMNS: &str = "id, customer_id, customer_name, customer_phone, customer_address, \
    fulfillment, notes, cart, amount_cents, state, order_id, created_at, expires_at";

impl IntentRow {
    fn into_intent(self) -> RepoResult<OrderIntent> {
        let cart: StoredCart = serde_json::from_str(&self.cart)?;
        Ok(OrderIntent {
            fulfillment: decode_enum(&self.fulfillment, "fulfillment", Fulfillment::parse)?,
            state: decode_enum(&self.state, "intent state", IntentState::parse)?,
            cart: cart.into(),
            id: self.id,
            customer_id: self.customer_id,
            customer: CustomerSnapshot {
                name: self.customer_name,
                phone: self.customer_phone,
                address: self.customer_address,
            },
            notes: self.notes,
            amount_cents: self.amount_cents,
            order_id: self.order_id,
            created_at: self.created_at,
            expires_at: self.expires_at,
        })
    }
}

pub struct NewIntent<'a> {
    pub customer_id: i64,
    pub customer: &'a CustomerSnapshot,
    pub cart: &'a PricedCart,
    pub fulfillment: Fulfillment,
    pub notes: Option<&'a str>,
    pub ttl_minutes: i64,
}

pub async fn create(pool: &SqlitePool, intent: NewIntent<'_>) -> RepoResult<OrderIntent> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = now_millis();
    let expires_at = now + intent.ttl_minutes.max(1) * 60_000;
    let cart = serde_json::to_string(&StoredCart::from(intent.cart))?;

    sqlx::query(
        "INSERT INTO order_intents (id, customer_id, customer_name, customer_phone,
            customer_address, fulfillment, notes, cart, amount_cents, state,
            created_at, expires_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'aguardando', ?, ?, ?)",
    )
    .bind(&id)
    .bind(intent.customer_id)
    .bind(&intent.customer.name)
    .bind(&intent.customer.phone)
    .bind(&intent.customer.address)
    .bind(intent.fulfillment.as_str())
    .bind(intent.notes)
    .bind(cart)
    .bind(to_cents(intent.cart.total))
    .bind(now)
    .bind(expires_at)
    .bind(now)
    .execute(pool)
    .await?;

    let mut conn = pool.acquire().await?;
    find_by_id(&mut conn, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order intent".into()))
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> RepoResult<Option<OrderIntent>> {
    let row: Option<IntentRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM order_intents WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    row.map(IntentRow::into_intent).transpose()
}

/// Intent owned by `customer_id`; someone else's reads as absent
pub async fn find_for_customer(
    pool: &SqlitePool,
    id: &str,
    customer_id: i64,
) -> RepoResult<Option<OrderIntent>> {
    let mut conn = pool.acquire().await?;
    Ok(find_by_id(&mut conn, id)
        .await?
        .filter(|i| i.customer_id == customer_id))
}

/// Compare-and-set state change. `Ok(false)` when the intent was not in `from`.
pub async fn set_state(
    conn: &mut SqliteConnection,
    id: &str,
    from: IntentState,
    to: IntentState,
    order_id: Option<i64>,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE order_intents SET state = ?, order_id = COALESCE(?, order_id), updated_at = ?
         WHERE id = ? AND state = ?",
    )
    .bind(to.as_str())
    .bind(order_id)
    .bind(now_millis())
    .bind(id)
    .bind(from.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Mark waiting intents past their TTL as expired; returns how many changed
pub async fn expire_stale(pool: &SqlitePool, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE order_intents SET state = 'expirado', updated_at = ?
         WHERE state = 'aguardando' AND expires_at <= ?",
    )
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
