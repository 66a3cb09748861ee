//! Store open/closed resolution
//!
//! Combines the admin's manual override with the weekly schedule. Manual mode
//! always wins; a manual closure with a `reopenAt` in the past has lapsed and
//! reads as open. In schedule mode the store is open when `now` falls inside
//! today's range or inside the after-midnight tail of yesterday's range.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::{DayHours, StoreStatus, Weekday, parse_hhmm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    Manual,
    Schedule,
}

/// Result of combining manual override and schedule at a given instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveStatus {
    pub effective_closed: bool,
    pub source: StatusSource,
    pub reason: Option<String>,
    pub reopen_at: Option<i64>,
    pub is_manual_mode: bool,
    pub today: Weekday,
    pub today_hours: Option<DayHours>,
    /// Unix millis of the evaluation instant
    pub evaluated_at: i64,
}

/// Resolve the effective open/closed state at `now` (store-local time).
pub fn resolve<Tz: TimeZone>(status: &StoreStatus, now: DateTime<Tz>) -> EffectiveStatus {
    let now_ms = now.timestamp_millis();
    let today = Weekday::from(now.weekday());
    let today_hours = status.hours.get(&today).cloned();

    if status.is_manual_mode {
        let lapsed = status.reopen_at.is_some_and(|at| now_ms >= at);
        let closed = status.closed_now && !lapsed;
        return EffectiveStatus {
            effective_closed: closed,
            source: StatusSource::Manual,
            reason: if closed { status.reason.clone() } else { None },
            reopen_at: if closed { status.reopen_at } else { None },
            is_manual_mode: true,
            today,
            today_hours,
            evaluated_at: now_ms,
        };
    }

    let minute = now.hour() * 60 + now.minute();
    let open = open_by_schedule(status, today, minute);
    EffectiveStatus {
        effective_closed: !open,
        source: StatusSource::Schedule,
        reason: None,
        reopen_at: None,
        is_manual_mode: false,
        today,
        today_hours,
        evaluated_at: now_ms,
    }
}

/// Schedule-only check for `minute` (minutes since local midnight) on `day`
pub fn open_by_schedule(status: &StoreStatus, day: Weekday, minute: u32) -> bool {
    let today = status.hours.get(&day).and_then(range_of);
    let yesterday = status.hours.get(&day.pred()).and_then(range_of);

    let in_today = today.is_some_and(|(open, close)| {
        if open == close {
            true
        } else if close > open {
            minute >= open && minute < close
        } else {
            minute >= open
        }
    });
    // Overnight tail of yesterday's range
    let in_tail = yesterday.is_some_and(|(open, close)| close < open && minute < close);

    in_today || in_tail
}

fn range_of(day: &DayHours) -> Option<(u32, u32)> {
    if !day.enabled {
        return None;
    }
    let open = parse_hhmm(&day.open)?;
    let close = parse_hhmm(&day.close)?;
    Some((open, close))
}
