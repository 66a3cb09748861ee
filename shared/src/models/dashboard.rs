//! Admin dashboard aggregates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    /// Local date, `YYYY-MM-DD`
    pub date: String,
    pub orders: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub period_days: u32,
    pub order_count: i64,
    /// Sum of non-cancelled order totals
    pub revenue: Decimal,
    pub average_ticket: Decimal,
    pub by_status: BTreeMap<String, i64>,
    pub daily: Vec<DailyRevenue>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}
