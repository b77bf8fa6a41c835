use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::company::CompanyId;
use crate::api::dtos::requests::UpdatePolicyRequest;
use crate::domain::models::policy::{DEPOSIT_METHOD_CARD, DEPOSIT_METHOD_DELIVERY};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_policy(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
) -> Result<impl IntoResponse, AppError> {
    let policy = state.policy_repo.find_by_company(&company_id).await?
        .ok_or(AppError::NotFound("Rental policy not found".into()))?;
    Ok(Json(policy))
}

pub async fn update_policy(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Json(payload): Json<UpdatePolicyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut policy = state.policy_repo.find_by_company(&company_id).await?
        .ok_or(AppError::NotFound("Rental policy not found".into()))?;

    if let Some(age) = payload.min_driver_age {
        if age < 18 {
            return Err(AppError::Validation("Minimum driver age cannot be below 18".into()));
        }
        policy.min_driver_age = age;
    }
    if let Some(years) = payload.min_driving_years {
        if years < 0 {
            return Err(AppError::Validation("Minimum driving experience cannot be negative".into()));
        }
        policy.min_driving_years = years;
    }
    if let Some(days) = payload.min_rental_days {
        if days < 1 {
            return Err(AppError::Validation("Minimum rental duration must be at least 1 day".into()));
        }
        policy.min_rental_days = days;
    }
    if let Some(required) = payload.license_required { policy.license_required = required; }
    if let Some(required) = payload.damage_deposit_required { policy.damage_deposit_required = required; }
    if let Some(amount) = payload.damage_deposit_amount {
        if amount < 0.0 {
            return Err(AppError::Validation("Damage deposit cannot be negative".into()));
        }
        policy.damage_deposit_amount = amount;
    }
    if let Some(method) = payload.damage_deposit_method {
        match method.as_str() {
            DEPOSIT_METHOD_DELIVERY | DEPOSIT_METHOD_CARD => policy.damage_deposit_method = method,
            _ => return Err(AppError::Validation("Invalid damage deposit method".into())),
        }
    }

    let updated = state.policy_repo.update(&policy).await?;
    info!("Rental policy updated for company {}", company_id);
    Ok(Json(updated))
}
