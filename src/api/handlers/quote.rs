use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::QuoteQuery, responses::QuoteResponse};
use crate::domain::models::policy::RentalPolicy;
use crate::domain::services::pricing::{compute_breakdown, rental_days, PricingInputs};
use crate::error::AppError;
use std::sync::Arc;

/// Price preview for a candidate stay. Purely derived; nothing persists
/// until an actual booking is created.
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = state.vehicle_repo.find_by_id(&vehicle_id).await?
        .ok_or(AppError::NotFound("Vehicle not found".into()))?;

    if query.dropoff < query.pickup {
        return Err(AppError::Validation("Dropoff must not precede pickup".into()));
    }
    if query.driver_age <= 0 {
        return Err(AppError::Validation("Driver age must be positive".into()));
    }

    let policy = state.policy_repo.find_by_company(&vehicle.company_id).await?
        .unwrap_or_else(|| RentalPolicy::defaults(vehicle.company_id.clone()));

    let breakdown = compute_breakdown(PricingInputs {
        rental_days: rental_days(query.pickup, query.dropoff),
        rate_per_day: vehicle.rate_per_day,
        driver_age: query.driver_age,
        has_international_license: query.has_international_license,
        min_driver_age: policy.min_driver_age,
        damage_deposit_required: policy.damage_deposit_required,
        damage_deposit_amount: policy.damage_deposit_amount,
    });

    Ok(Json(QuoteResponse {
        vehicle_id,
        pickup_date: query.pickup,
        dropoff_date: query.dropoff,
        breakdown,
    }))
}
