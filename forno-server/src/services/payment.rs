//! Payment webhook processing
//!
//! One transaction per delivery: record the txid, load the intent, apply the
//! outcome. Any error rolls the whole delivery back, txid included, so the
//! processor can retry it. Only settling outcomes consume the txid; a
//! `pending` event may be followed by the final status under the same txid.

use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{IntentState, OrderIntent, PaymentMethod};
use shared::payment::{PaymentOutcome, WebhookPayload};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::orders::{self, NewOrder};
use crate::db::{RepoError, intents, webhooks};

/// Acknowledgement returned to the processor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub intent_id: String,
    pub state: IntentState,
    pub order_id: Option<i64>,
    /// `true` when this txid had already been processed
    pub duplicate: bool,
}

impl WebhookAck {
    fn of(intent: &OrderIntent, state: IntentState, order_id: Option<i64>) -> Self {
        Self {
            intent_id: intent.id.clone(),
            state,
            order_id,
            duplicate: false,
        }
    }
}

/// Apply a verified webhook event. `now` is Unix millis.
pub async fn process(
    pool: &SqlitePool,
    payload: &WebhookPayload,
    now: i64,
) -> Result<WebhookAck, AppError> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let first_delivery = match payload.outcome() {
        PaymentOutcome::Pending => true,
        PaymentOutcome::Approved | PaymentOutcome::Failed => {
            webhooks::record(&mut *tx, &payload.txid, &payload.order, &payload.status).await?
        }
    };

    let intent = intents::find_by_id(&mut *tx, &payload.order)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::IntentNotFound).with_detail("intentId", payload.order.clone())
        })?;

    if !first_delivery {
        tracing::info!(txid = %payload.txid, intent_id = %intent.id, "Duplicate webhook delivery");
        return Ok(WebhookAck {
            duplicate: true,
            ..WebhookAck::of(&intent, intent.state_at(now), intent.order_id)
        });
    }

    let ack = apply(&mut *tx, payload, &intent, now).await?;
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        txid = %payload.txid,
        intent_id = %intent.id,
        status = %payload.status,
        state = ack.state.as_str(),
        order_id = ?ack.order_id,
        "Payment webhook processed"
    );
    Ok(ack)
}

async fn apply(
    conn: &mut SqliteConnection,
    payload: &WebhookPayload,
    intent: &OrderIntent,
    now: i64,
) -> Result<WebhookAck, AppError> {
    let state = intent.state_at(now);

    match payload.outcome() {
        PaymentOutcome::Approved => match state {
            IntentState::Aguardando => {
                if payload.amount != intent.amount_cents {
                    tracing::warn!(
                        intent_id = %intent.id,
                        expected = intent.amount_cents,
                        received = payload.amount,
                        "Payment amount mismatch"
                    );
                    return Err(AppError::new(ErrorCode::PaymentAmountMismatch)
                        .with_detail("expected", intent.amount_cents)
                        .with_detail("received", payload.amount));
                }
                let order_id = materialize(conn, payload, intent).await?;
                Ok(WebhookAck::of(intent, IntentState::Pago, Some(order_id)))
            }
            // Already paid under another txid
            IntentState::Pago => Ok(WebhookAck::of(intent, IntentState::Pago, intent.order_id)),
            IntentState::Expirado => Err(AppError::new(ErrorCode::IntentExpired)
                .with_detail("expiresAt", intent.expires_at)),
            IntentState::Falhou => Err(AppError::new(ErrorCode::IntentAlreadySettled)
                .with_detail("state", IntentState::Falhou.as_str())),
        },
        PaymentOutcome::Failed => match state {
            IntentState::Aguardando => {
                if !intents::set_state(
                    conn,
                    &intent.id,
                    IntentState::Aguardando,
                    IntentState::Falhou,
                    None,
                )
                .await?
                {
                    return Err(AppError::new(ErrorCode::IntentAlreadySettled));
                }
                Ok(WebhookAck::of(intent, IntentState::Falhou, None))
            }
            IntentState::Pago => Err(AppError::new(ErrorCode::IntentAlreadySettled)
                .with_detail("state", IntentState::Pago.as_str())),
            other => Ok(WebhookAck::of(intent, other, intent.order_id)),
        },
        PaymentOutcome::Pending => Ok(WebhookAck::of(intent, state, intent.order_id)),
    }
}

/// Persist the order and flip the intent to `pago` in the same transaction
async fn materialize(
    conn: &mut SqliteConnection,
    payload: &WebhookPayload,
    intent: &OrderIntent,
) -> Result<i64, AppError> {
    let order_id = orders::insert(
        &mut *conn,
        &NewOrder {
            customer_id: intent.customer_id,
            customer: &intent.customer,
            cart: &intent.cart,
            fulfillment: intent.fulfillment,
            payment_method: PaymentMethod::Online,
            payment_txid: Some(&payload.txid),
            intent_id: Some(&intent.id),
            notes: intent.notes.as_deref(),
        },
    )
    .await?;

    let settled = intents::set_state(
        &mut *conn,
        &intent.id,
        IntentState::Aguardando,
        IntentState::Pago,
        Some(order_id),
    )
    .await?;
    if !settled {
        return Err(AppError::new(ErrorCode::IntentAlreadySettled));
    }

    tracing::info!(intent_id = %intent.id, order_id, "Intent materialized into order");
    Ok(order_id)
}
