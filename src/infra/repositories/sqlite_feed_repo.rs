use crate::domain::{models::feed::CalendarFeed, ports::FeedRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteFeedRepo {
    pool: SqlitePool,
}

impl SqliteFeedRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl FeedRepository for SqliteFeedRepo {
    async fn create(&self, feed: &CalendarFeed) -> Result<CalendarFeed, AppError> {
        sqlx::query_as::<_, CalendarFeed>(
            "INSERT INTO calendar_feeds (id, vehicle_id, url, label, last_synced_at, last_error, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&feed.id).bind(&feed.vehicle_id).bind(&feed.url).bind(&feed.label)
            .bind(feed.last_synced_at).bind(&feed.last_error).bind(feed.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CalendarFeed>, AppError> {
        sqlx::query_as::<_, CalendarFeed>("SELECT * FROM calendar_feeds WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<CalendarFeed>, AppError> {
        sqlx::query_as::<_, CalendarFeed>("SELECT * FROM calendar_feeds WHERE vehicle_id = ? ORDER BY created_at ASC")
            .bind(vehicle_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_due(&self, cutoff: DateTime<Utc>) -> Result<Vec<CalendarFeed>, AppError> {
        sqlx::query_as::<_, CalendarFeed>(
            "SELECT * FROM calendar_feeds WHERE last_synced_at IS NULL OR last_synced_at < ? ORDER BY last_synced_at ASC"
        )
            .bind(cutoff)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn record_sync(&self, id: &str, synced_at: DateTime<Utc>, error: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE calendar_feeds SET last_synced_at = ?, last_error = ? WHERE id = ?")
            .bind(synced_at).bind(&error).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM calendar_feeds WHERE id = ?")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Feed not found".into()));
        }
        Ok(())
    }
}
