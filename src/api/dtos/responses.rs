use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::models::booking::{Booking, PriceBreakdown};
use crate::domain::services::availability::DayEntry;
use crate::domain::services::selection::DateDecision;

#[derive(Serialize)]
pub struct CompanyCreatedResponse {
    pub company_id: String,
    pub slug: String,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub vehicle_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub degraded: bool,
    pub days: Vec<DayEntry>,
}

#[derive(Serialize)]
pub struct SelectableResponse {
    pub date: NaiveDate,
    pub role: String,
    pub decision: DateDecision,
    pub selectable: bool,
    /// Earliest valid dropoff for the supplied pickup, when one was given.
    pub min_dropoff: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct QuoteResponse {
    pub vehicle_id: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub breakdown: PriceBreakdown,
}

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking: Booking,
    pub checkout_url: Option<String>,
    /// Set when the charge could not be created; the booking stays
    /// PENDING and the charge can be retried.
    pub payment_error: Option<String>,
}

#[derive(Serialize)]
pub struct ChargeResponse {
    pub checkout_url: String,
}

#[derive(Serialize)]
pub struct FeedSyncResponse {
    pub feed_id: String,
    pub imported: usize,
}
