use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Renter self-service lookup via the management token issued at
/// booking time.
pub async fn get_booking_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status == "CANCELLED" {
        return Err(AppError::Conflict("Booking is already cancelled".into()));
    }
    if booking.status == "COMPLETED" {
        return Err(AppError::Conflict("Completed bookings cannot be cancelled".into()));
    }

    // Cancelling releases the confirmed interval, freeing the dates for
    // the next renter.
    let cancelled = state.booking_repo.cancel(&booking).await?;
    info!("Booking cancelled: {}", cancelled.id);
    Ok(Json(cancelled))
}
