use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Origin of a blocking interval. Stored as TEXT; `rank` decides which
/// status a date reports when intervals overlap.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    BookedConfirmed,
    BookedExternal,
    BlockedManual,
}

impl IntervalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::BookedConfirmed => "BOOKED_CONFIRMED",
            IntervalKind::BookedExternal => "BOOKED_EXTERNAL",
            IntervalKind::BlockedManual => "BLOCKED_MANUAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BOOKED_CONFIRMED" => Some(IntervalKind::BookedConfirmed),
            "BOOKED_EXTERNAL" => Some(IntervalKind::BookedExternal),
            "BLOCKED_MANUAL" => Some(IntervalKind::BlockedManual),
            _ => None,
        }
    }

    /// Confirmed platform bookings outrank external sync, which outranks
    /// manual blocks. Higher wins on overlapping dates.
    pub fn rank(&self) -> u8 {
        match self {
            IntervalKind::BookedConfirmed => 3,
            IntervalKind::BookedExternal => 2,
            IntervalKind::BlockedManual => 1,
        }
    }
}

/// An inclusive day range that blocks a vehicle. Intervals are never
/// mutated in place: external ones are replaced wholesale on resync,
/// manual ones deleted explicitly, confirmed ones follow the booking.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CalendarInterval {
    pub id: String,
    pub vehicle_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub reason: Option<String>,
    pub source_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CalendarInterval {
    pub fn manual_block(vehicle_id: String, start_date: NaiveDate, end_date: NaiveDate, reason: Option<String>) -> Self {
        Self::new(vehicle_id, start_date, end_date, IntervalKind::BlockedManual, reason, None)
    }

    pub fn external_booking(vehicle_id: String, feed_id: String, start_date: NaiveDate, end_date: NaiveDate, summary: Option<String>) -> Self {
        Self::new(vehicle_id, start_date, end_date, IntervalKind::BookedExternal, summary, Some(feed_id))
    }

    pub fn confirmed_booking(vehicle_id: String, booking_id: String, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(vehicle_id, start_date, end_date, IntervalKind::BookedConfirmed, Some("Platform booking".to_string()), Some(booking_id))
    }

    fn new(vehicle_id: String, start_date: NaiveDate, end_date: NaiveDate, kind: IntervalKind, reason: Option<String>, source_ref: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vehicle_id,
            start_date,
            end_date,
            status: kind.as_str().to_string(),
            reason,
            source_ref,
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> Option<IntervalKind> {
        IntervalKind::parse(&self.status)
    }
}
