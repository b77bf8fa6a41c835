use crate::domain::{models::feed::CalendarFeed, ports::FeedRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresFeedRepo {
    pool: PgPool,
}

impl PostgresFeedRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl FeedRepository for PostgresFeedRepo {
    async fn create(&self, feed: &CalendarFeed) -> Result<CalendarFeed, AppError> {
        sqlx::query_as::<_, CalendarFeed>(
            "INSERT INTO calendar_feeds (id, vehicle_id, url, label, last_synced_at, last_error, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&feed.id).bind(&feed.vehicle_id).bind(&feed.url).bind(&feed.label)
            .bind(feed.last_synced_at).bind(&feed.last_error).bind(feed.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CalendarFeed>, AppError> {
        sqlx::query_as::<_, CalendarFeed>("SELECT * FROM calendar_feeds WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_vehicle(&self, vehicle_id: &str) -> Result<Vec<CalendarFeed>, AppError> {
        sqlx::query_as::<_, CalendarFeed>("SELECT * FROM calendar_feeds WHERE vehicle_id = $1 ORDER BY created_at ASC")
            .bind(vehicle_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_due(&self, cutoff: DateTime<Utc>) -> Result<Vec<CalendarFeed>, AppError> {
        sqlx::query_as::<_, CalendarFeed>(
            "SELECT * FROM calendar_feeds WHERE last_synced_at IS NULL OR last_synced_at < $1 ORDER BY last_synced_at ASC NULLS FIRST"
        )
            .bind(cutoff)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn record_sync(&self, id: &str, synced_at: DateTime<Utc>, error: Option<String>) -> Result<(), AppError> {
        sqlx::query("UPDATE calendar_feeds SET last_synced_at = $1, last_error = $2 WHERE id = $3")
            .bind(synced_at).bind(&error).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM calendar_feeds WHERE id = $1")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Feed not found".into()));
        }
        Ok(())
    }
}
