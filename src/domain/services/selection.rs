use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::domain::services::availability::{status_on, DayEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRole {
    Pickup,
    Dropoff,
}

impl DateRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pickup" => Some(DateRole::Pickup),
            "dropoff" => Some(DateRole::Dropoff),
            _ => None,
        }
    }
}

/// Why a date can or cannot be chosen. `Unavailable` and
/// `BelowMinimumStay` are distinct so the UI can disable the two cases
/// differently.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateDecision {
    Selectable,
    InPast,
    Unavailable,
    BelowMinimumStay,
}

/// Decides whether `date` may be picked for `role` against the merged
/// timeline. A dropoff additionally needs `date - pickup >=
/// min_rental_days` (inclusive lower bound).
pub fn evaluate_date(
    entries: &[DayEntry],
    today: NaiveDate,
    date: NaiveDate,
    role: DateRole,
    pickup: Option<NaiveDate>,
    min_rental_days: i64,
) -> DateDecision {
    if date < today {
        return DateDecision::InPast;
    }
    if !status_on(entries, date).is_available() {
        return DateDecision::Unavailable;
    }
    if role == DateRole::Dropoff
        && let Some(pickup) = pickup
        && !dropoff_still_valid(pickup, date, min_rental_days) {
        return DateDecision::BelowMinimumStay;
    }
    DateDecision::Selectable
}

pub fn is_selectable(
    entries: &[DayEntry],
    today: NaiveDate,
    date: NaiveDate,
    role: DateRole,
    pickup: Option<NaiveDate>,
    min_rental_days: i64,
) -> bool {
    evaluate_date(entries, today, date, role, pickup, min_rental_days) == DateDecision::Selectable
}

/// Earliest dropoff date satisfying the minimum stay for a given pickup.
pub fn min_selectable_dropoff(pickup: NaiveDate, min_rental_days: i64) -> NaiveDate {
    let days = min_rental_days.max(1) as u64;
    pickup.checked_add_days(Days::new(days)).unwrap_or(pickup)
}

/// A previously chosen dropoff must be re-checked whenever the pickup
/// moves; callers drop the dropoff when this turns false.
pub fn dropoff_still_valid(pickup: NaiveDate, dropoff: NaiveDate, min_rental_days: i64) -> bool {
    (dropoff - pickup).num_days() >= min_rental_days.max(1)
}

/// Write-path re-check: the whole inclusive stay range must be free.
pub fn range_is_open(entries: &[DayEntry], pickup: NaiveDate, dropoff: NaiveDate) -> bool {
    let mut day = pickup;
    while day <= dropoff {
        if !status_on(entries, day).is_available() {
            return false;
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => return true,
        }
    }
    true
}
