//! HTTP API for forno-server
//!
//! - `/api/public/*`: storefront, no authentication
//! - `/api/customer/*`: registration/login open, everything else needs a token
//! - `/api/admin/*`: login open, everything else needs an admin token
//! - `/api/webhooks/payment`: processor callbacks (signature or token)

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod layout;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod store_status;
pub mod webhook;

use axum::routing::get;
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, require_auth};
use crate::config::Config;
use crate::state::AppState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no tower-http layers, no state)
pub fn build_router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .merge(store_status::public_routes())
        .merge(products::public_routes())
        .merge(layout::public_routes())
        .merge(reviews::public_routes())
        .route("/time", get(health::server_time));

    let customer = Router::new()
        .merge(auth::profile_routes())
        .merge(orders::customer_routes())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .merge(auth::customer_public_routes(state));

    // Layers run outside-in: authenticate first, then check the role
    let admin = Router::new()
        .merge(products::admin_routes())
        .merge(orders::admin_routes())
        .merge(store_status::admin_routes())
        .merge(layout::admin_routes())
        .merge(reviews::admin_routes())
        .merge(dashboard::admin_routes())
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .merge(auth::admin_public_routes(state));

    Router::new()
        .merge(health::router())
        .nest("/api/public", public)
        .nest("/api/customer", customer)
        .nest("/api/admin", admin)
        .merge(webhook::router())
}

fn cors(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests
pub fn build_app(state: AppState) -> Router {
    build_router(&state)
        // CORS - Handle cross-origin requests
        .layer(cors(&state.config))
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
