use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// An external iCal calendar linked to a vehicle. Synced periodically;
/// each sync replaces the feed's stored intervals wholesale.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CalendarFeed {
    pub id: String,
    pub vehicle_id: String,
    pub url: String,
    pub label: String,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CalendarFeed {
    pub fn new(vehicle_id: String, url: String, label: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vehicle_id,
            url,
            label,
            last_synced_at: None,
            last_error: None,
            created_at: Utc::now(),
        }
    }
}
