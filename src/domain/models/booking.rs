use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use rand::{distributions::Alphanumeric, Rng};

/// Cost components derived once at booking time and frozen on the row.
/// `due_now` is captured via card; the remainder settles at pickup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub rental_days: i64,
    pub rate_per_day: f64,
    pub base: f64,
    pub confirmation_fee: f64,
    pub taxable_amount: f64,
    pub government_tax: f64,
    pub permit_fee: f64,
    pub underage_deposit: f64,
    pub damage_deposit: f64,
    pub total: f64,
    pub due_now: f64,
    pub due_at_pickup: f64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub company_id: String,
    pub vehicle_id: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub renter_name: String,
    pub renter_email: String,
    pub renter_phone: Option<String>,
    pub driver_age: i32,
    pub driving_years: i32,
    pub has_international_license: bool,
    pub delivery_location: Option<String>,
    pub price: Json<PriceBreakdown>,
    pub status: String,
    pub payment_status: String,
    pub payment_ref: Option<String>,
    pub management_token: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub company_id: String,
    pub vehicle_id: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub renter_name: String,
    pub renter_email: String,
    pub renter_phone: Option<String>,
    pub driver_age: i32,
    pub driving_years: i32,
    pub has_international_license: bool,
    pub delivery_location: Option<String>,
    pub price: PriceBreakdown,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            company_id: params.company_id,
            vehicle_id: params.vehicle_id,
            pickup_date: params.pickup_date,
            dropoff_date: params.dropoff_date,
            renter_name: params.renter_name,
            renter_email: params.renter_email,
            renter_phone: params.renter_phone,
            driver_age: params.driver_age,
            driving_years: params.driving_years,
            has_international_license: params.has_international_license,
            delivery_location: params.delivery_location,
            price: Json(params.price),
            status: "PENDING".to_string(),
            payment_status: "PENDING".to_string(),
            payment_ref: None,
            management_token: token,
            created_at: Utc::now(),
        }
    }
}
