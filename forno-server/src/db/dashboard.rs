//! Dashboard aggregates
//!
//! Orders are bucketed by local calendar date in the store timezone, so the
//! aggregation happens here rather than in SQL.

use std::collections::BTreeMap;

use chrono::{Days, TimeZone, Utc};
use rust_decimal::Decimal;
use shared::models::{DailyRevenue, DashboardStats, OrderStatus};
use shared::pricing::from_cents;
use sqlx::SqlitePool;

use super::{RepoResult, reviews};

#[derive(sqlx::FromRow)]
struct OrderSample {
    created_at: i64,
    total_cents: i64,
    status: String,
}

pub async fn stats(
    pool: &SqlitePool,
    tz: chrono_tz::Tz,
    days: u32,
    now: i64,
) -> RepoResult<DashboardStats> {
    let since = period_start(tz, days, now);
    let samples: Vec<OrderSample> = sqlx::query_as(
        "SELECT created_at, total_cents, status FROM orders WHERE created_at >= ? ORDER BY created_at",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    let (average_rating, review_count) = reviews::aggregate(pool, Some(since)).await?;

    Ok(summarize(&samples, tz, days, average_rating, review_count))
}

/// Local midnight of the first day of a `days`-long period ending today
fn period_start(tz: chrono_tz::Tz, days: u32, now: i64) -> i64 {
    let rolling = now - i64::from(days) * 86_400_000;
    let first_day = Utc
        .timestamp_millis_opt(now)
        .single()
        .map(|utc| utc.with_timezone(&tz).date_naive())
        .and_then(|today| today.checked_sub_days(Days::new(u64::from(days.saturating_sub(1)))));
    let Some(first_day) = first_day else {
        return rolling;
    };
    // Midnight may fall in a DST gap
    (0..3)
        .filter_map(|hour| first_day.and_hms_opt(hour, 0, 0))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map_or(rolling, |start| start.timestamp_millis())
}

fn summarize(
    samples: &[OrderSample],
    tz: chrono_tz::Tz,
    days: u32,
    average_rating: Option<f64>,
    review_count: i64,
) -> DashboardStats {
    let mut by_status: BTreeMap<String, i64> = OrderStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut daily: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    let mut revenue_cents = 0i64;
    let mut paid_orders = 0i64;

    for sample in samples {
        *by_status.entry(sample.status.clone()).or_default() += 1;
        let date = match Utc.timestamp_millis_opt(sample.created_at).single() {
            Some(utc) => utc.with_timezone(&tz).format("%Y-%m-%d").to_string(),
            None => continue,
        };
        let day = daily.entry(date).or_default();
        day.0 += 1;
        if sample.status != OrderStatus::Cancelado.as_str() {
            day.1 += sample.total_cents;
            revenue_cents += sample.total_cents;
            paid_orders += 1;
        }
    }

    let revenue = from_cents(revenue_cents);
    let average_ticket = if paid_orders > 0 {
        (revenue / Decimal::from(paid_orders)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    DashboardStats {
        period_days: days,
        order_count: samples.len() as i64,
        revenue,
        average_ticket,
        by_status,
        daily: daily
            .into_iter()
            .map(|(date, (orders, cents))| DailyRevenue {
                date,
                orders,
                revenue: from_cents(cents),
            })
            .collect(),
        average_rating,
        review_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(created_at: i64, total_cents: i64, status: &str) -> OrderSample {
        OrderSample {
            created_at,
            total_cents,
            status: status.into(),
        }
    }

    #[test]
    fn cancelled_orders_do_not_count_as_revenue() {
        // 2026-10-16 15:00 UTC = 12:00 in Sao Paulo
        let t = 1_792_162_800_000;
        let samples = [
            sample(t, 5000, "entregue"),
            sample(t + 1000, 3000, "pendente"),
            sample(t + 2000, 9900, "cancelado"),
        ];
        let stats = summarize(&samples, chrono_tz::America::Sao_Paulo, 7, None, 0);
        assert_eq!(stats.order_count, 3);
        assert_eq!(stats.revenue, from_cents(8000));
        assert_eq!(stats.average_ticket, from_cents(4000));
        assert_eq!(stats.by_status["cancelado"], 1);
        assert_eq!(stats.by_status["preparando"], 0);
        assert_eq!(stats.daily.len(), 1);
        assert_eq!(stats.daily[0].orders, 3);
    }

    #[test]
    fn days_split_on_local_midnight() {
        // 02:30 UTC is still the previous day in Sao Paulo (UTC-3)
        let late_local = 1_792_204_200_000; // 2026-10-17 02:30 UTC
        let stats = summarize(
            &[sample(late_local, 100, "entregue")],
            chrono_tz::America::Sao_Paulo,
            1,
            None,
            0,
        );
        assert_eq!(stats.daily[0].date, "2026-10-16");
    }

    #[test]
    fn period_starts_at_local_midnight() {
        let tz = chrono_tz::America::Sao_Paulo;
        // 2026-10-16 15:00 UTC; local midnight is 03:00 UTC
        let now = 1_792_162_800_000;
        assert_eq!(period_start(tz, 1, now), 1_792_119_600_000);
        assert_eq!(period_start(tz, 7, now), 1_792_119_600_000 - 6 * 86_400_000);
    }

    #[test]
    fn empty_period() {
        let stats = summarize(&[], chrono_tz::UTC, 30, None, 0);
        assert_eq!(stats.average_ticket, Decimal::ZERO);
        assert!(stats.daily.is_empty());
    }
}
