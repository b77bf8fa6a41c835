use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub slug: String,
    pub contact_email: String,
}

#[derive(Deserialize)]
pub struct CreateVehicleRequest {
    pub name: String,
    pub rate_per_day: f64,
    pub seats: i32,
    pub transmission: String,
}

#[derive(Deserialize)]
pub struct UpdateVehicleRequest {
    pub name: Option<String>,
    pub rate_per_day: Option<f64>,
    pub seats: Option<i32>,
    pub transmission: Option<String>,
    pub is_listed: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdatePolicyRequest {
    pub min_driver_age: Option<i32>,
    pub min_driving_years: Option<i32>,
    pub min_rental_days: Option<i64>,
    pub license_required: Option<bool>,
    pub damage_deposit_required: Option<bool>,
    pub damage_deposit_amount: Option<f64>,
    pub damage_deposit_method: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBlockRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateFeedRequest {
    pub url: String,
    pub label: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub pickup_date: String,
    pub dropoff_date: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub driver_age: i32,
    pub driving_years: i32,
    #[serde(default)]
    pub has_international_license: bool,
    pub delivery_location: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct SelectableQuery {
    pub date: NaiveDate,
    pub role: String,
    pub pickup: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub pickup: NaiveDate,
    pub dropoff: NaiveDate,
    pub driver_age: i32,
    #[serde(default)]
    pub has_international_license: bool,
}
