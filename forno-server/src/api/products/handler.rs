//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductCreate, ProductStatusUpdate, ProductUpdate};

use crate::db::{RepoError, products};
use crate::error::validate;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

impl ProductQuery {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

fn product_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("productId", id)
}

fn map_repo(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => product_not_found(id),
        other => other.into(),
    }
}

// =============================================================================
// Storefront
// =============================================================================

/// GET /api/public/products
pub async fn list_active(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let products = products::find_all(&state.pool, true, query.category()).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/public/products/{id} - inactive products read as missing
pub async fn get_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Product>> {
    let product = products::find_by_id(&state.pool, id)
        .await?
        .filter(Product::is_active)
        .ok_or_else(|| product_not_found(id))?;
    Ok(ApiResponse::success(product))
}

/// GET /api/public/categories
pub async fn categories(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<String>>> {
    Ok(ApiResponse::success(products::categories(&state.pool).await?))
}

// =============================================================================
// Admin
// =============================================================================

/// GET /api/admin/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let products = products::find_all(&state.pool, false, query.category()).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/admin/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Product>> {
    let product = products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(ApiResponse::success(product))
}

/// POST /api/admin/products
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<ApiResponse<Product>> {
    validate(&payload)?;
    let product = products::create(&state.pool, payload).await?;
    tracing::info!(product_id = product.id, name = %product.name, "Product created");
    Ok(ApiResponse::success(product))
}

/// PUT /api/admin/products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<ApiResponse<Product>> {
    validate(&payload)?;
    let product = products::update(&state.pool, id, payload)
        .await
        .map_err(map_repo(id))?;
    tracing::info!(product_id = id, "Product updated");
    Ok(ApiResponse::success(product))
}

/// PATCH /api/admin/products/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductStatusUpdate>,
) -> AppResult<ApiResponse<Product>> {
    let product = products::set_status(&state.pool, id, payload.status)
        .await
        .map_err(map_repo(id))?;
    tracing::info!(product_id = id, status = payload.status.as_str(), "Product status changed");
    Ok(ApiResponse::success(product))
}

/// DELETE /api/admin/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !products::delete(&state.pool, id).await? {
        return Err(product_not_found(id));
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(ApiResponse::ok("Produto removido"))
}
