use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::company::CompanyId;
use crate::api::dtos::{requests::CreateBookingRequest, responses::{BookingCreatedResponse, ChargeResponse}};
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::domain::models::calendar::IntervalKind;
use crate::domain::models::policy::RentalPolicy;
use crate::domain::services::availability::merge_intervals;
use crate::domain::services::pricing::{compute_breakdown, rental_days, round_currency, PricingInputs};
use crate::domain::services::selection::range_is_open;
use crate::domain::ports::ChargeStatus;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

/// Platform-wide floor; companies may only raise the age limit through
/// their policy. Below the company limit but above this floor rents
/// with the underage deposit instead of being refused.
const ABSOLUTE_MIN_DRIVER_AGE: i32 = 18;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: Starting for vehicle {}", vehicle_id);

    let vehicle = state.vehicle_repo.find_by_id(&vehicle_id).await?
        .ok_or(AppError::NotFound("Vehicle not found".into()))?;

    if !vehicle.is_listed {
        return Err(AppError::PolicyViolation("Vehicle is not open for booking".into()));
    }

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Renter name is required".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("Invalid renter email".into()));
    }

    let pickup = NaiveDate::parse_from_str(&payload.pickup_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid pickup date format".into()))?;
    let dropoff = NaiveDate::parse_from_str(&payload.dropoff_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid dropoff date format".into()))?;

    let today = Utc::now().date_naive();
    if pickup < today {
        return Err(AppError::Validation("Cannot book in the past".into()));
    }
    if dropoff < pickup {
        return Err(AppError::Validation("Dropoff must not precede pickup".into()));
    }

    let policy = state.policy_repo.find_by_company(&vehicle.company_id).await?
        .unwrap_or_else(|| RentalPolicy::defaults(vehicle.company_id.clone()));

    check_policy(&policy, &payload, pickup, dropoff)?;

    // Re-validate against the current timeline, not whatever the caller
    // rendered from. The guarded insert below still closes the rest of
    // the race window.
    let mut intervals = Vec::new();
    for kind in [IntervalKind::BookedConfirmed, IntervalKind::BookedExternal, IntervalKind::BlockedManual] {
        let mut batch = state.interval_repo
            .list_by_vehicle_and_status(&vehicle.id, kind.as_str())
            .await?;
        intervals.append(&mut batch);
    }
    let entries = merge_intervals(&intervals, pickup, dropoff);
    if !range_is_open(&entries, pickup, dropoff) {
        return Err(AppError::Conflict("Dates no longer available".into()));
    }

    let breakdown = compute_breakdown(PricingInputs {
        rental_days: rental_days(pickup, dropoff),
        rate_per_day: vehicle.rate_per_day,
        driver_age: payload.driver_age,
        has_international_license: payload.has_international_license,
        min_driver_age: policy.min_driver_age,
        damage_deposit_required: policy.damage_deposit_required,
        damage_deposit_amount: policy.damage_deposit_amount,
    });

    let booking = Booking::new(NewBookingParams {
        company_id: vehicle.company_id.clone(),
        vehicle_id: vehicle.id.clone(),
        pickup_date: pickup,
        dropoff_date: dropoff,
        renter_name: payload.name,
        renter_email: payload.email,
        renter_phone: payload.phone,
        driver_age: payload.driver_age,
        driving_years: payload.driving_years,
        has_international_license: payload.has_international_license,
        delivery_location: payload.delivery_location,
        price: breakdown,
    });

    info!("create_booking: Inserting booking into DB...");
    let created = state.booking_repo.create_guarded(&booking).await?;
    info!("create_booking: DB insert success: {}", created.id);

    // The confirmation fee is captured now; the booking confirms only
    // once the provider reports the charge paid. An unreachable provider
    // leaves the booking PENDING with the charge retryable.
    let due_now = round_currency(created.price.due_now);
    let description = format!("Confirmation fee for booking {}", created.id);

    match state.payment_service.create_charge(due_now, &description, &created.renter_email).await {
        Ok(handle) => {
            state.booking_repo.set_payment_ref(&created.id, &handle.reference).await?;
            info!("Booking {} pending payment via charge {}", created.id, handle.reference);
            Ok(Json(BookingCreatedResponse {
                booking: created,
                checkout_url: Some(handle.checkout_url),
                payment_error: None,
            }))
        }
        Err(e) => {
            warn!("Charge creation failed for booking {}: {}", created.id, e);
            Ok(Json(BookingCreatedResponse {
                booking: created,
                checkout_url: None,
                payment_error: Some(e.to_string()),
            }))
        }
    }
}

fn check_policy(policy: &RentalPolicy, payload: &CreateBookingRequest, pickup: NaiveDate, dropoff: NaiveDate) -> Result<(), AppError> {
    if payload.driver_age < ABSOLUTE_MIN_DRIVER_AGE {
        return Err(AppError::PolicyViolation(format!(
            "Driver must be at least {} years old", ABSOLUTE_MIN_DRIVER_AGE
        )));
    }
    if payload.driving_years < policy.min_driving_years {
        return Err(AppError::PolicyViolation(format!(
            "Driver needs at least {} years of driving experience", policy.min_driving_years
        )));
    }
    if policy.license_required && !payload.has_international_license {
        return Err(AppError::PolicyViolation("An international driving license is required for this company".into()));
    }
    if (dropoff - pickup).num_days() < policy.min_rental_days.max(1) {
        return Err(AppError::PolicyViolation(format!(
            "Rental must be at least {} days", policy.min_rental_days.max(1)
        )));
    }
    Ok(())
}

/// Retry charge creation for a booking whose first attempt hit an
/// unreachable provider.
pub async fn charge_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status == "CANCELLED" {
        return Err(AppError::Conflict("Booking is cancelled".into()));
    }
    if booking.payment_status == "PAID" {
        return Err(AppError::Conflict("Confirmation fee already paid".into()));
    }

    let due_now = round_currency(booking.price.due_now);
    let description = format!("Confirmation fee for booking {}", booking.id);
    let handle = state.payment_service.create_charge(due_now, &description, &booking.renter_email).await?;
    state.booking_repo.set_payment_ref(&booking.id, &handle.reference).await?;

    info!("Charge recreated for booking {}: {}", booking.id, handle.reference);
    Ok(Json(ChargeResponse { checkout_url: handle.checkout_url }))
}

/// Reconciles the booking against the payment provider. A read, not a
/// charge: calling it repeatedly cannot double-charge or double-confirm.
pub async fn reconcile_payment(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let Some(payment_ref) = booking.payment_ref.clone() else {
        return Err(AppError::Validation("No charge exists for this booking yet".into()));
    };

    let status = state.payment_service.charge_status(&payment_ref).await?;

    let updated = match status {
        ChargeStatus::Paid => {
            // Confirmation is a side effect of the paid charge and of
            // nothing else; the repo also materializes the confirmed
            // interval in the same transaction.
            let confirmed = state.booking_repo.mark_paid_and_confirmed(&booking).await?;
            info!("Booking confirmed: {} via charge {}", confirmed.id, payment_ref);
            confirmed
        }
        ChargeStatus::Unpaid => {
            state.booking_repo.mark_payment_failed(&booking.id).await?;
            warn!("Charge {} for booking {} reported unpaid", payment_ref, booking.id);
            state.booking_repo.find_by_id(&booking.id).await?
                .ok_or(AppError::Internal)?
        }
        ChargeStatus::Pending => booking,
    };

    Ok(Json(updated))
}

pub async fn list_company_bookings(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_company(&company_id).await?;
    Ok(Json(bookings))
}

/// Company marks a confirmed rental finished after the vehicle returns.
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    if booking.company_id != company_id {
        return Err(AppError::NotFound("Booking not found".into()));
    }

    let completed = state.booking_repo.complete(&booking).await?;
    info!("Booking completed: {}", completed.id);
    Ok(Json(completed))
}
