use crate::domain::{models::calendar::CalendarInterval, ports::IntervalRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresIntervalRepo {
    pool: PgPool,
}

impl PostgresIntervalRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl IntervalRepository for PostgresIntervalRepo {
    async fn create(&self, interval: &CalendarInterval) -> Result<CalendarInterval, AppError> {
        sqlx::query_as::<_, CalendarInterval>(
            "INSERT INTO calendar_intervals (id, vehicle_id, start_date, end_date, status, reason, source_ref, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&interval.id).bind(&interval.vehicle_id).bind(interval.start_date)
            .bind(interval.end_date).bind(&interval.status).bind(&interval.reason)
            .bind(&interval.source_ref).bind(interval.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CalendarInterval>, AppError> {
        sqlx::query_as::<_, CalendarInterval>("SELECT * FROM calendar_intervals WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_vehicle_and_status(&self, vehicle_id: &str, status: &str) -> Result<Vec<CalendarInterval>, AppError> {
        sqlx::query_as::<_, CalendarInterval>(
            "SELECT * FROM calendar_intervals WHERE vehicle_id = $1 AND status = $2 ORDER BY start_date ASC"
        )
            .bind(vehicle_id).bind(status)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn replace_for_feed(&self, feed_id: &str, intervals: &[CalendarInterval]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM calendar_intervals WHERE source_ref = $1 AND status = 'BOOKED_EXTERNAL'")
            .bind(feed_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        for interval in intervals {
            sqlx::query(
                "INSERT INTO calendar_intervals (id, vehicle_id, start_date, end_date, status, reason, source_ref, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            )
                .bind(&interval.id).bind(&interval.vehicle_id).bind(interval.start_date)
                .bind(interval.end_date).bind(&interval.status).bind(&interval.reason)
                .bind(&interval.source_ref).bind(interval.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(intervals.len())
    }

    async fn delete_for_feed(&self, feed_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM calendar_intervals WHERE source_ref = $1 AND status = 'BOOKED_EXTERNAL'")
            .bind(feed_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn delete_manual_block(&self, vehicle_id: &str, id: &str) -> Result<(), AppError> {
        let res = sqlx::query(
            "DELETE FROM calendar_intervals WHERE id = $1 AND vehicle_id = $2 AND status = 'BLOCKED_MANUAL'"
        )
            .bind(id).bind(vehicle_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Manual block not found".into()));
        }
        Ok(())
    }
}
