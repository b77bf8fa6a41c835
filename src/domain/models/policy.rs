use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEPOSIT_METHOD_DELIVERY: &str = "DELIVERY";
pub const DEPOSIT_METHOD_CARD: &str = "CARD";

/// Per-company rental requirements, read by date selection and pricing.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RentalPolicy {
    pub id: String,
    pub company_id: String,
    pub min_driver_age: i32,
    pub min_driving_years: i32,
    pub min_rental_days: i64,
    pub license_required: bool,
    pub damage_deposit_required: bool,
    pub damage_deposit_amount: f64,
    pub damage_deposit_method: String,
    pub created_at: DateTime<Utc>,
}

impl RentalPolicy {
    /// Defaults applied when a company is created.
    pub fn defaults(company_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            company_id,
            min_driver_age: 21,
            min_driving_years: 1,
            min_rental_days: 1,
            license_required: false,
            damage_deposit_required: false,
            damage_deposit_amount: 0.0,
            damage_deposit_method: DEPOSIT_METHOD_DELIVERY.to_string(),
            created_at: Utc::now(),
        }
    }
}
