//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Catalog visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Ativo,
    Inativo,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ativo => "ativo",
            Self::Inativo => "inativo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ativo" => Some(Self::Ativo),
            "inativo" => Some(Self::Inativo),
            _ => None,
        }
    }
}

/// One entry of the price-by-size array (e.g. "P" 29.90, "G" 49.90)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizePrice {
    pub size: String,
    pub price: Decimal,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub sizes: Vec<SizePrice>,
    pub image_url: Option<String>,
    pub status: ProductStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Ativo
    }

    /// Price for the given size label (exact match)
    pub fn price_for(&self, size: &str) -> Option<Decimal> {
        self.sizes.iter().find(|s| s.size == size).map(|s| s.price)
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub category: String,
    #[validate(custom(function = "validate_sizes"))]
    pub sizes: Vec<SizePrice>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    pub status: Option<ProductStatus>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub category: Option<String>,
    #[validate(custom(function = "validate_sizes"))]
    pub sizes: Option<Vec<SizePrice>>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    pub status: Option<ProductStatus>,
}

/// Status-only patch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStatusUpdate {
    pub status: ProductStatus,
}

/// At least one size, labels unique and non-empty, every price > 0
pub fn validate_sizes(sizes: &[SizePrice]) -> Result<(), ValidationError> {
    if sizes.is_empty() {
        return Err(ValidationError::new("sizes_empty"));
    }
    let mut seen = std::collections::HashSet::new();
    for entry in sizes {
        let label = entry.size.trim();
        if label.is_empty() {
            return Err(ValidationError::new("size_label_empty"));
        }
        if !seen.insert(label.to_lowercase()) {
            return Err(ValidationError::new("size_label_duplicate"));
        }
        if entry.price <= Decimal::ZERO {
            return Err(ValidationError::new("size_price_not_positive"));
        }
    }
    Ok(())
}
