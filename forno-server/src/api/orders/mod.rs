//! Order API: checkout, order intents, history, admin workflow

mod admin;
mod handler;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use http::header;
use shared::models::Order;

use crate::state::AppState;

/// Authenticated customer routes
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/cart/quote", post(handler::quote))
        .route("/orders", get(handler::list).post(handler::create))
        .route("/orders/intent", post(handler::create_intent))
        .route("/orders/intent/{id}", get(handler::get_intent))
        .route("/orders/{id}", get(handler::get_by_id))
        .route("/orders/{id}/cancel", post(handler::cancel))
        .route("/orders/{id}/receipt", get(handler::receipt))
        .route("/orders/{id}/review", post(handler::review))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::list))
        .route("/orders/notifications", get(admin::notifications))
        .route("/orders/{id}", get(admin::get_by_id))
        .route("/orders/{id}/status", patch(admin::update_status))
        .route("/orders/{id}/receipt", get(admin::receipt))
}

/// PDF response with an inline filename
pub(crate) fn pdf_response(order: &Order, bytes: Vec<u8>) -> Response {

    let filename = format!("pedido-{}.pdf", order.number.trim_start_matches('#'));
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
