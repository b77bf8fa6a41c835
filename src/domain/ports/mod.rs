use crate::domain::models::{
    booking::Booking, calendar::CalendarInterval, company::Company,
    feed::CalendarFeed, policy::RentalPolicy, vehicle::Vehicle,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, company: &Company) -> Result<Company, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Company>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>, AppError>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>, AppError>;
    async fn list_by_company(&self, company_id: &str) -> Result<Vec<Vehicle>, AppError>;
    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError>;
}

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    async fn create(&self, policy: &RentalPolicy) -> Result<RentalPolicy, AppError>;
    async fn find_by_company(&self, company_id: &str) -> Result<Option<RentalPolicy>, AppError>;
    async fn update(&self, policy: &RentalPolicy) -> Result<RentalPolicy, AppError>;
}

#[async_trait]
pub trait IntervalRepository: Send + Sync {
    async fn create(&self, interval: &CalendarInterval) -> Result<CalendarInterval, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<CalendarInterval>, AppError>;
    async fn list_by_vehicle_and_status(&self, vehicle_id: &str, status: &str) -> Result<Vec<CalendarInterval>, AppError>;
    /// Replace-not-merge resync: drops every stored interval of the feed
    /// and writes the new set in one transaction.
    async fn replace_for_feed(&self, feed_id: &str, intervals: &[CalendarInterval]) -> Result<usize, AppError>;
    async fn delete_for_feed(&self, feed_id: &str) -> Result<(), AppError>;
    async fn delete_manual_block(&self, vehicle_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking only if no overlapping active booking or
    /// blocking interval exists for the vehicle; check and insert run in
    /// one transaction so concurrent overlapping attempts cannot both
    /// succeed.
    async fn create_guarded(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_company(&self, company_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn set_payment_ref(&self, id: &str, payment_ref: &str) -> Result<(), AppError>;
    /// Marks the confirmation charge paid, flips the booking to
    /// CONFIRMED, and materializes its BOOKED_CONFIRMED interval — one
    /// transaction, idempotent on repeat calls.
    async fn mark_paid_and_confirmed(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn mark_payment_failed(&self, id: &str) -> Result<(), AppError>;
    /// Cancels the booking and releases its confirmed interval.
    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn complete(&self, booking: &Booking) -> Result<Booking, AppError>;
}

#[async_trait]
pub trait FeedRepository: Send + Sync {
    async fn create(&self, feed: &CalendarFeed) -> Result<CalendarFeed, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<CalendarFeed>, AppError>;
    async fn list_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<CalendarFeed>, AppError>;
    async fn list_due(&self, cutoff: DateTime<Utc>) -> Result<Vec<CalendarFeed>, AppError>;
    async fn record_sync(&self, id: &str, synced_at: DateTime<Utc>, error: Option<String>) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[derive(Debug, Serialize, Clone)]
pub struct ChargeHandle {
    pub reference: String,
    pub checkout_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStatus {
    Paid,
    Unpaid,
    Pending,
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn create_charge(&self, amount: f64, description: &str, customer_ref: &str) -> Result<ChargeHandle, AppError>;
    /// Reconciliation read against the provider; never triggers a charge
    /// and is safe to repeat.
    async fn charge_status(&self, reference: &str) -> Result<ChargeStatus, AppError>;
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, AppError>;
}
