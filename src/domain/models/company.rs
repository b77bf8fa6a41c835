use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: String, slug: String, contact_email: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            contact_email,
            created_at: Utc::now(),
        }
    }
}
