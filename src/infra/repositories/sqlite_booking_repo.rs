use crate::domain::{models::booking::Booking, models::calendar::CalendarInterval, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_guarded(&self, booking: &Booking) -> Result<Booking, AppError> {
        // Overlap check and insert in a single statement: two concurrent
        // attempts for crossing ranges cannot both pass the guard.
        let res = sqlx::query(
            "INSERT INTO bookings (id, company_id, vehicle_id, pickup_date, dropoff_date, renter_name, renter_email, renter_phone, driver_age, driving_years, has_international_license, delivery_location, price, status, payment_status, payment_ref, management_token, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM bookings
                 WHERE vehicle_id = ? AND status IN ('PENDING', 'CONFIRMED')
                   AND pickup_date <= ? AND dropoff_date >= ?
             )
             AND NOT EXISTS (
                 SELECT 1 FROM calendar_intervals
                 WHERE vehicle_id = ? AND start_date <= ? AND end_date >= ?
             )"
        )
            .bind(&booking.id).bind(&booking.company_id).bind(&booking.vehicle_id)
            .bind(booking.pickup_date).bind(booking.dropoff_date)
            .bind(&booking.renter_name).bind(&booking.renter_email).bind(&booking.renter_phone)
            .bind(booking.driver_age).bind(booking.driving_years).bind(booking.has_international_license)
            .bind(&booking.delivery_location).bind(&booking.price)
            .bind(&booking.status).bind(&booking.payment_status).bind(&booking.payment_ref)
            .bind(&booking.management_token).bind(booking.created_at)
            .bind(&booking.vehicle_id).bind(booking.dropoff_date).bind(booking.pickup_date)
            .bind(&booking.vehicle_id).bind(booking.dropoff_date).bind(booking.pickup_date)
            .execute(&self.pool).await.map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::Conflict("Dates no longer available".into()));
        }
        Ok(booking.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE management_token = ?")
            .bind(token).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_company(&self, company_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE company_id = ? ORDER BY pickup_date ASC")
            .bind(company_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_payment_ref(&self, id: &str, payment_ref: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE bookings SET payment_ref = ? WHERE id = ?")
            .bind(payment_ref).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn mark_paid_and_confirmed(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let confirmed = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET payment_status = 'PAID', status = 'CONFIRMED'
             WHERE id = ? AND status != 'CANCELLED'
             RETURNING *"
        )
            .bind(&booking.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Booking was cancelled before payment settled".into()))?;

        // Repeat reconciliations must not stack intervals.
        let interval = CalendarInterval::confirmed_booking(
            confirmed.vehicle_id.clone(),
            confirmed.id.clone(),
            confirmed.pickup_date,
            confirmed.dropoff_date,
        );
        sqlx::query(
            "INSERT INTO calendar_intervals (id, vehicle_id, start_date, end_date, status, reason, source_ref, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM calendar_intervals WHERE source_ref = ? AND status = 'BOOKED_CONFIRMED'
             )"
        )
            .bind(&interval.id).bind(&interval.vehicle_id).bind(interval.start_date)
            .bind(interval.end_date).bind(&interval.status).bind(&interval.reason)
            .bind(&interval.source_ref).bind(interval.created_at)
            .bind(&confirmed.id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(confirmed)
    }

    async fn mark_payment_failed(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE bookings SET payment_status = 'FAILED' WHERE id = ? AND payment_status != 'PAID'")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let cancelled = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'CANCELLED' WHERE id = ? RETURNING *"
        )
            .bind(&booking.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM calendar_intervals WHERE source_ref = ? AND status = 'BOOKED_CONFIRMED'")
            .bind(&booking.id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn complete(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'COMPLETED' WHERE id = ? AND status = 'CONFIRMED' RETURNING *"
        )
            .bind(&booking.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Only confirmed bookings can be completed".into()))
    }
}
