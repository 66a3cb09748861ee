//! Store Status Model (manual override + weekly hours)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// Day of week key used in the `hours` map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn pred(&self) -> Self {
        Weekday::from(chrono::Weekday::from(*self).pred())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

/// Opening range for one weekday, `HH:MM` local time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Persisted store status (singleton row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub closed_now: bool,
    pub reason: Option<String>,
    /// Unix millis at which a manual closure lapses
    pub reopen_at: Option<i64>,
    pub is_manual_mode: bool,
    pub hours: BTreeMap<Weekday, DayHours>,
    pub updated_at: Option<i64>,
}

/// Admin update; absent fields keep their stored value
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatusUpdate {
    pub closed_now: Option<bool>,
    #[validate(length(max = 200))]
    pub reason: Option<String>,
    pub reopen_at: Option<i64>,
    pub is_manual_mode: Option<bool>,
    #[validate(custom(function = "validate_hours"))]
    pub hours: Option<BTreeMap<Weekday, DayHours>>,
}

impl StoreStatusUpdate {
    /// Merge into the stored status. `now` is Unix millis.
    ///
    /// A closure whose `reopenAt` has passed is already over and is cleared
    /// before merging. Closing replaces `reopenAt`; absent means no deadline.
    pub fn apply_to(self, status: &mut StoreStatus, now: i64) {
        if status.reopen_at.is_some_and(|at| now >= at) {
            status.closed_now = false;
            status.reason = None;
            status.reopen_at = None;
        }
        match self.closed_now {
            Some(true) => {
                status.closed_now = true;
                status.reopen_at = self.reopen_at;
            }
            Some(false) => status.closed_now = false,
            None => {
                if self.reopen_at.is_some() {
                    status.reopen_at = self.reopen_at;
                }
            }
        }
        if self.reason.is_some() {
            status.reason = self.reason.filter(|r| !r.trim().is_empty());
        }
        if let Some(manual) = self.is_manual_mode {
            status.is_manual_mode = manual;
        }
        if let Some(hours) = self.hours {
            status.hours = hours;
        }
        if !status.closed_now {
            status.reason = None;
            status.reopen_at = None;
        }
    }
}

/// Quick manual open/close from the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ManualToggle {
    pub closed: bool,
    #[validate(length(max = 200))]
    pub reason: Option<String>,
    pub reopen_at: Option<i64>,
}

/// Parse `HH:MM` into minutes since midnight
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

pub fn validate_hours(hours: &BTreeMap<Weekday, DayHours>) -> Result<(), ValidationError> {
    for day in hours.values() {
        if parse_hhmm(&day.open).is_none() || parse_hhmm(&day.close).is_none() {
            return Err(ValidationError::new("invalid_hhmm"));
        }
    }
    Ok(())
}
