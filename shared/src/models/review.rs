//! Review Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer review, at most one per order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub order_id: i64,
    pub rating: u8,
    pub comment: Option<String>,
    /// Reviewer display name (joined from users)
    pub user_name: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewCreate {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

/// Public listing with aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub average: Option<f64>,
    pub count: i64,
    pub reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        for (rating, ok) in [(0u8, false), (1, true), (5, true), (6, false)] {
            let r = ReviewCreate {
                rating,
                comment: None,
            };
            assert_eq!(r.validate().is_ok(), ok, "rating {rating}");
        }
    }
}
