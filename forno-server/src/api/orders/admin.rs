//! Admin Order Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus, OrderStatusUpdate};
use shared::util::now_millis;

use super::handler::{clamp_limit, order_not_found};
use super::pdf_response;
use crate::auth::CurrentUser;
use crate::db::orders;
use crate::receipt::OrderReceiptRenderer;
use crate::state::AppState;

const NOTIFICATION_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    /// Unix millis of the previous poll
    pub since: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    pub orders: Vec<Order>,
    /// Pass back as `since` on the next poll
    pub cursor: i64,
    pub server_time: i64,
}

async fn load(state: &AppState, id: i64) -> AppResult<Order> {
    orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))
}

/// GET /api/admin/orders?status=&limit=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(OrderStatus::parse(raw).ok_or_else(|| {
            AppError::invalid_request(format!("Status desconhecido: {raw}"))
                .with_detail("status", raw)
        })?),
        None => None,
    };
    let orders = orders::list(&state.pool, status, clamp_limit(query.limit)).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/admin/orders/notifications?since=
///
/// Without `since` no orders are returned, so the first poll just
/// establishes the cursor. The cursor is the newest `created_at` handed out,
/// never the clock: an order still committing when the poll runs is stamped
/// above it and shows up on the next poll.
pub async fn notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> AppResult<ApiResponse<Notifications>> {
    let server_time = now_millis();
    let (orders, cursor) = match query.since {
        Some(since) => {
            let orders = orders::list_since(&state.pool, since, NOTIFICATION_LIMIT).await?;
            let cursor = orders.last().map_or(since, |o| o.created_at);
            (orders, cursor)
        }
        None => (Vec::new(), orders::latest_created_at(&state.pool).await?),
    };
    Ok(ApiResponse::success(Notifications {
        orders,
        cursor,
        server_time,
    }))
}

/// GET /api/admin/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Order>> {
    Ok(ApiResponse::success(load(&state, id).await?))
}

/// PATCH /api/admin/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<ApiResponse<Order>> {
    let order = load(&state, id).await?;
    let rejected = |from: OrderStatus| {
        AppError::new(ErrorCode::InvalidStatusTransition)
            .with_detail("from", from.as_str())
            .with_detail("to", payload.status.as_str())
    };

    if !order.status.can_transition_to(payload.status) {
        return Err(rejected(order.status));
    }
    if !orders::transition(&state.pool, id, order.status, payload.status).await? {
        let current = load(&state, id).await?;
        return Err(rejected(current.status));
    }

    tracing::info!(
        order_id = id,
        admin_id = admin.id,
        from = order.status.as_str(),
        to = payload.status.as_str(),
        "Order status changed"
    );
    Ok(ApiResponse::success(load(&state, id).await?))
}

/// GET /api/admin/orders/{id}/receipt
pub async fn receipt(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let order = load(&state, id).await?;
    let pdf = OrderReceiptRenderer::new(&order, &state.config.store_name, state.config.store_timezone)
        .render_pdf()?;
    Ok(pdf_response(&order, pdf))
}
