//! Customer Order Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{
    CheckoutRequest, IntentState, Order, OrderIntent, OrderStatus, PaymentMethod, Review,
    ReviewCreate,
};
use shared::pricing::{PricedCart, from_cents};
use shared::util::now_millis;

use super::pdf_response;
use crate::auth::CurrentUser;
use crate::db::{RepoError, intents, orders, reviews};
use crate::error::validate;
use crate::receipt::OrderReceiptRenderer;
use crate::services::{checkout, store};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

pub(super) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub(super) fn order_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::OrderNotFound).with_detail("orderId", id)
}

async fn own_order(state: &AppState, user: &CurrentUser, id: i64) -> AppResult<Order> {
    orders::find_for_customer(&state.pool, id, user.id)
        .await?
        .ok_or_else(|| order_not_found(id))
}

/// Intent as shown to the customer, state evaluated at read time
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentView {
    pub id: String,
    pub state: IntentState,
    pub amount_cents: i64,
    pub total: Decimal,
    pub cart: PricedCart,
    pub expires_at: i64,
    pub order_id: Option<i64>,
}

impl IntentView {
    fn new(intent: OrderIntent, now: i64) -> Self {
        Self {
            state: intent.state_at(now),
            total: from_cents(intent.amount_cents),
            id: intent.id,
            amount_cents: intent.amount_cents,
            cart: intent.cart,
            expires_at: intent.expires_at,
            order_id: intent.order_id,
        }
    }
}

/// POST /api/customer/cart/quote - prices only, works while the store is closed
pub async fn quote(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<ApiResponse<PricedCart>> {
    let cart = checkout::quote(&state.pool, &state.config, &req).await?;
    Ok(ApiResponse::success(cart))
}

/// POST /api/customer/orders - offline payment (cash or card on delivery)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<ApiResponse<Order>> {
    store::ensure_open(&state.pool, state.config.store_timezone).await?;

    let payment_method = match req.payment_method {
        Some(PaymentMethod::Online) => {
            return Err(AppError::with_message(
                ErrorCode::PaymentInvalidMethod,
                "Pagamento online deve usar /orders/intent",
            ));
        }
        Some(method) => method,
        None => {
            return Err(AppError::validation("Forma de pagamento obrigatória")
                .with_detail("payment_method", vec!["required"]));
        }
    };

    let prepared = checkout::prepare(&state.pool, &state.config, &user, &req).await?;
    let order = orders::create(
        &state.pool,
        &orders::NewOrder {
            customer_id: user.id,
            customer: &prepared.customer,
            cart: &prepared.cart,
            fulfillment: req.fulfillment,
            payment_method,
            payment_txid: None,
            intent_id: None,
            notes: req.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()),
        },
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        customer_id = user.id,
        total = %order.total,
        payment = payment_method.as_str(),
        "Order created"
    );
    Ok(ApiResponse::success(order))
}

/// POST /api/customer/orders/intent - online payment; the webhook creates the order
pub async fn create_intent(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<ApiResponse<IntentView>> {
    store::ensure_open(&state.pool, state.config.store_timezone).await?;

    let prepared = checkout::prepare(&state.pool, &state.config, &user, &req).await?;
    let intent = intents::create(
        &state.pool,
        intents::NewIntent {
            customer_id: user.id,
            customer: &prepared.customer,
            cart: &prepared.cart,
            fulfillment: req.fulfillment,
            notes: req.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()),
            ttl_minutes: state.config.intent_ttl_minutes,
        },
    )
    .await?;

    tracing::info!(
        intent_id = %intent.id,
        customer_id = user.id,
        amount_cents = intent.amount_cents,
        "Order intent created"
    );
    Ok(ApiResponse::success(IntentView::new(intent, now_millis())))
}

/// GET /api/customer/orders/intent/{id}
pub async fn get_intent(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<IntentView>> {
    let intent = intents::find_for_customer(&state.pool, &id, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::IntentNotFound).with_detail("intentId", id))?;
    Ok(ApiResponse::success(IntentView::new(intent, now_millis())))
}

/// GET /api/customer/orders
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = orders::list_for_customer(&state.pool, user.id, clamp_limit(query.limit)).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/customer/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Order>> {
    Ok(ApiResponse::success(own_order(&state, &user, id).await?))
}

/// POST /api/customer/orders/{id}/cancel - only while still `pendente`
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Order>> {
    let order = own_order(&state, &user, id).await?;
    let not_cancellable = || {
        AppError::new(ErrorCode::OrderNotCancellable).with_detail("status", order.status.as_str())
    };
    if order.status != OrderStatus::Pendente {
        return Err(not_cancellable());
    }
    if !orders::transition(&state.pool, id, OrderStatus::Pendente, OrderStatus::Cancelado).await? {
        // Kitchen picked it up meanwhile
        return Err(not_cancellable());
    }
    tracing::info!(order_id = id, customer_id = user.id, "Order cancelled by customer");
    Ok(ApiResponse::success(own_order(&state, &user, id).await?))
}

/// GET /api/customer/orders/{id}/receipt
pub async fn receipt(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let order = own_order(&state, &user, id).await?;
    let pdf = OrderReceiptRenderer::new(&order, &state.config.store_name, state.config.store_timezone)
        .render_pdf()?;
    Ok(pdf_response(&order, pdf))
}

/// POST /api/customer/orders/{id}/review - delivered orders only, one per order
pub async fn review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<ReviewCreate>,
) -> AppResult<ApiResponse<Review>> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::new(ErrorCode::InvalidRating));
    }
    validate(&req)?;

    let order = own_order(&state, &user, id).await?;
    if order.status != OrderStatus::Entregue {
        return Err(AppError::new(ErrorCode::ReviewNotAllowed)
            .with_detail("status", order.status.as_str()));
    }

    let review = reviews::create(&state.pool, user.id, id, req.rating, req.comment.as_deref())
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::ReviewAlreadyExists),
            other => other.into(),
        })?;
    tracing::info!(order_id = id, rating = req.rating, "Review submitted");
    Ok(ApiResponse::success(review))
}
