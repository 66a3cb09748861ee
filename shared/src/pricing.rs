//! Cart pricing
//!
//! Prices always come from the catalog. Whatever the browser kept in its cart
//! is reduced to `(product_id, size, quantity, notes)` before it gets here.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::{CartItem, Fulfillment, OrderItem, Product};

pub const MAX_QUANTITY: u32 = 99;

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: i64, quantity: u32 },

    #[error("product {0} is unavailable")]
    ProductUnavailable(i64),

    #[error("product {product_id} has no size '{size}'")]
    UnknownSize { product_id: i64, size: String },
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::EmptyCart => AppError::new(ErrorCode::OrderEmpty),
            PricingError::InvalidQuantity {
                product_id,
                quantity,
            } => AppError::new(ErrorCode::InvalidQuantity)
                .with_detail("productId", product_id)
                .with_detail("quantity", quantity),
            PricingError::ProductUnavailable(id) => {
                AppError::new(ErrorCode::ProductUnavailable).with_detail("productId", id)
            }
            PricingError::UnknownSize { product_id, size } => {
                AppError::new(ErrorCode::ProductSizeNotFound)
                    .with_detail("productId", product_id)
                    .with_detail("size", size)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedCart {
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// Price a cart against the catalog.
///
/// `catalog` may contain inactive or unrelated products; only ids referenced
/// by the cart are looked up.
pub fn price_cart(
    items: &[CartItem],
    catalog: &[Product],
    fulfillment: Fulfillment,
    delivery_fee: Decimal,
) -> Result<PricedCart, PricingError> {
    if items.is_empty() {
        return Err(PricingError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut subtotal = Decimal::ZERO;

    for item in items {
        if item.quantity == 0 || item.quantity > MAX_QUANTITY {
            return Err(PricingError::InvalidQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }
        let product = catalog
            .iter()
            .find(|p| p.id == item.product_id)
            .filter(|p| p.is_active())
            .ok_or(PricingError::ProductUnavailable(item.product_id))?;
        let unit_price =
            product
                .price_for(&item.size)
                .ok_or_else(|| PricingError::UnknownSize {
                    product_id: product.id,
                    size: item.size.clone(),
                })?;

        let line_total = round2(unit_price * Decimal::from(item.quantity));
        subtotal += line_total;
        lines.push(OrderItem {
            product_id: product.id,
            product_name: product.name.clone(),
            size: item.size.clone(),
            unit_price,
            quantity: item.quantity,
            line_total,
            notes: item
                .notes
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        });
    }

    let delivery_fee = match fulfillment {
        Fulfillment::Entrega => round2(delivery_fee),
        Fulfillment::Retirada => Decimal::ZERO,
    };
    let subtotal = round2(subtotal);

    Ok(PricedCart {
        items: lines,
        subtotal,
        delivery_fee,
        total: round2(subtotal + delivery_fee),
    })
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Decimal reais → integer cents
pub fn to_cents(value: Decimal) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    (round2(value) * Decimal::ONE_HUNDRED).to_i64().unwrap_or(0)
}

/// Integer cents → Decimal reais
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductStatus, SizePrice};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(id: i64, status: ProductStatus) -> Product {
        Product {
            id,
            name: format!("Pizza {id}"),
            description: None,
            category: "Pizzas".into(),
            sizes: vec![
                SizePrice {
                    size: "M".into(),
                    price: d("39.90"),
                },
                SizePrice {
                    size: "G".into(),
                    price: d("49.90"),
                },
            ],
            image_url: None,
            status,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn item(product_id: i64, size: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id,
            size: size.into(),
            quantity,
            notes: None,
        }
    }

    #[test]
    fn delivery_adds_fee() {
        let catalog = [product(1, ProductStatus::Ativo)];
        let cart = price_cart(
            &[item(1, "G", 2), item(1, "M", 1)],
            &catalog,
            Fulfillment::Entrega,
            d("7.5"),
        )
        .unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].line_total, d("99.80"));
        assert_eq!(cart.subtotal, d("139.70"));
        assert_eq!(cart.delivery_fee, d("7.50"));
        assert_eq!(cart.total, d("147.20"));
    }

    #[test]
    fn pickup_has_no_fee() {
        let catalog = [product(1, ProductStatus::Ativo)];
        let cart =
            price_cart(&[item(1, "M", 1)], &catalog, Fulfillment::Retirada, d("7.5")).unwrap();
        assert_eq!(cart.delivery_fee, Decimal::ZERO);
        assert_eq!(cart.total, d("39.90"));
    }

    #[test]
    fn rejects_bad_carts() {
        let catalog = [
            product(1, ProductStatus::Ativo),
            product(2, ProductStatus::Inativo),
        ];
        let fee = d("5");
        assert_eq!(
            price_cart(&[], &catalog, Fulfillment::Entrega, fee),
            Err(PricingError::EmptyCart)
        );
        assert!(matches!(
            price_cart(&[item(1, "M", 0)], &catalog, Fulfillment::Entrega, fee),
            Err(PricingError::InvalidQuantity { quantity: 0, .. })
        ));
        assert!(matches!(
            price_cart(&[item(1, "M", 100)], &catalog, Fulfillment::Entrega, fee),
            Err(PricingError::InvalidQuantity { quantity: 100, .. })
        ));
        assert_eq!(
            price_cart(&[item(2, "M", 1)], &catalog, Fulfillment::Entrega, fee),
            Err(PricingError::ProductUnavailable(2))
        );
        assert_eq!(
            price_cart(&[item(9, "M", 1)], &catalog, Fulfillment::Entrega, fee),
            Err(PricingError::ProductUnavailable(9))
        );
        assert!(matches!(
            price_cart(&[item(1, "GG", 1)], &catalog, Fulfillment::Entrega, fee),
            Err(PricingError::UnknownSize { .. })
        ));
    }

    #[test]
    fn pricing_errors_map_to_codes() {
        let err: AppError = PricingError::ProductUnavailable(3).into();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);
        let err: AppError = PricingError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn cents_conversion() {
        assert_eq!(to_cents(d("147.20")), 14720);
        assert_eq!(to_cents(d("0.005")), 1);
        assert_eq!(from_cents(14720), d("147.20"));
        assert_eq!(from_cents(5), d("0.05"));
    }
}
