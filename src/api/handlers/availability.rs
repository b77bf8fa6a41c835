use axum::{extract::{State, Path, Query}, http::header, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{AvailabilityQuery, SelectableQuery},
    responses::{AvailabilityResponse, SelectableResponse},
};
use crate::domain::models::calendar::IntervalKind;
use crate::domain::services::availability::{load_intervals_degraded, merge_intervals};
use crate::domain::services::selection::{evaluate_date, min_selectable_dropoff, DateDecision, DateRole};
use crate::domain::services::ical::export_feed;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{Days, Utc};

const DEFAULT_WINDOW_DAYS: u64 = 90;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    state.vehicle_repo.find_by_id(&vehicle_id).await?
        .ok_or(AppError::NotFound("Vehicle not found".into()))?;

    let today = Utc::now().date_naive();
    let start = query.start.unwrap_or(today);
    let end = query.end.unwrap_or_else(|| start.checked_add_days(Days::new(DEFAULT_WINDOW_DAYS)).unwrap_or(start));
    if end < start {
        return Err(AppError::Validation("Range end must not precede start".into()));
    }

    // Degraded rather than failed when one origin cannot be read; the
    // public calendar must always render.
    let (intervals, degraded) = load_intervals_degraded(&state.interval_repo, &vehicle_id).await;
    let days = merge_intervals(&intervals, start, end);

    Ok(Json(AvailabilityResponse {
        vehicle_id,
        start,
        end,
        degraded,
        days,
    }))
}

pub async fn get_selectable(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<String>,
    Query(query): Query<SelectableQuery>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = state.vehicle_repo.find_by_id(&vehicle_id).await?
        .ok_or(AppError::NotFound("Vehicle not found".into()))?;

    let role = DateRole::parse(&query.role)
        .ok_or(AppError::Validation("Role must be 'pickup' or 'dropoff'".into()))?;
    if role == DateRole::Dropoff && query.pickup.is_none() {
        return Err(AppError::Validation("Dropoff evaluation requires a pickup date".into()));
    }

    let policy = state.policy_repo.find_by_company(&vehicle.company_id).await?;
    let min_rental_days = policy.map(|p| p.min_rental_days).unwrap_or(1);

    let today = Utc::now().date_naive();
    let window_start = today.min(query.date);
    let window_end = query.date.max(query.pickup.unwrap_or(query.date));

    let (intervals, _) = load_intervals_degraded(&state.interval_repo, &vehicle_id).await;
    let entries = merge_intervals(&intervals, window_start, window_end);

    let decision = evaluate_date(&entries, today, query.date, role, query.pickup, min_rental_days);

    Ok(Json(SelectableResponse {
        date: query.date,
        role: query.role,
        decision,
        selectable: decision == DateDecision::Selectable,
        min_dropoff: query.pickup.map(|p| min_selectable_dropoff(p, min_rental_days)),
    }))
}

/// Confirmed platform bookings rendered as an iCal feed companies can
/// subscribe to from their own calendar tools.
pub async fn export_calendar(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = state.vehicle_repo.find_by_id(&vehicle_id).await?
        .ok_or(AppError::NotFound("Vehicle not found".into()))?;

    let intervals = state.interval_repo
        .list_by_vehicle_and_status(&vehicle.id, IntervalKind::BookedConfirmed.as_str())
        .await?;

    let body = export_feed(&vehicle, &intervals);
    Ok(([(header::CONTENT_TYPE, "text/calendar; charset=utf-8")], body))
}
