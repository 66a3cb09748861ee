//! Product API

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

/// Storefront catalog (active products only)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handler::list_active))
        .route("/products/{id}", get(handler::get_active))
        .route("/categories", get(handler::categories))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handler::list).post(handler::create))
        .route(
            "/products/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/products/{id}/status", patch(handler::set_status))
}
