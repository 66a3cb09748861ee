//! Cart pricing and customer snapshot for order creation

use shared::error::{AppError, ErrorCode};
use shared::models::{CheckoutRequest, CustomerSnapshot, Fulfillment};
use shared::pricing::{PricedCart, price_cart};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::config::Config;
use crate::db::{products, users};
use crate::error::validate;

/// Priced cart plus the contact data copied onto the order
#[derive(Debug)]
pub struct Checkout {
    pub customer: CustomerSnapshot,
    pub cart: PricedCart,
}

/// Price the request against the current catalog
pub async fn quote(
    pool: &SqlitePool,
    config: &Config,
    req: &CheckoutRequest,
) -> Result<PricedCart, AppError> {
    validate(req)?;
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let mut ids: Vec<i64> = req.items.iter().map(|i| i.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let catalog = products::find_by_ids(pool, &ids).await?;

    Ok(price_cart(
        &req.items,
        &catalog,
        req.fulfillment,
        config.delivery_fee,
    )?)
}

/// Quote the cart and resolve who/where it goes to.
///
/// The request address wins over the profile address; delivery without any
/// address is rejected.
pub async fn prepare(
    pool: &SqlitePool,
    config: &Config,
    user: &CurrentUser,
    req: &CheckoutRequest,
) -> Result<Checkout, AppError> {
    let cart = quote(pool, config, req).await?;
    let profile = users::get_profile(pool, user.id).await?;

    let address = req
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .or_else(|| profile.address.clone().filter(|a| !a.trim().is_empty()));

    if req.fulfillment == Fulfillment::Entrega && address.is_none() {
        return Err(
            AppError::validation("Endereço obrigatório para entrega")
                .with_detail("address", vec!["required"]),
        );
    }

    Ok(Checkout {
        customer: CustomerSnapshot {
            name: profile.name,
            phone: profile.phone,
            address: if req.fulfillment == Fulfillment::Entrega {
                address
            } else {
                None
            },
        },
        cart,
    })
}
