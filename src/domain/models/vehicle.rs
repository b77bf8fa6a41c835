use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A rentable vehicle. Never deleted while bookings reference it;
/// `is_listed = false` takes it off the public catalogue instead.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Vehicle {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub rate_per_day: f64,
    pub seats: i32,
    pub transmission: String,
    pub is_listed: bool,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(company_id: String, name: String, rate_per_day: f64, seats: i32, transmission: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            company_id,
            name,
            rate_per_day,
            seats,
            transmission,
            is_listed: true,
            created_at: Utc::now(),
        }
    }
}
