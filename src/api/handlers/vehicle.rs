use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::company::CompanyId;
use crate::api::dtos::requests::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::domain::models::vehicle::Vehicle;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Vehicle name is required".into()));
    }
    if payload.rate_per_day <= 0.0 {
        return Err(AppError::Validation("Daily rate must be positive".into()));
    }
    if payload.seats <= 0 {
        return Err(AppError::Validation("Seat count must be positive".into()));
    }

    let vehicle = Vehicle::new(company_id, payload.name, payload.rate_per_day, payload.seats, payload.transmission);
    let created = state.vehicle_repo.create(&vehicle).await?;

    info!("Vehicle created: {} for company {}", created.id, created.company_id);
    Ok(Json(created))
}

pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = state.vehicle_repo.list_by_company(&company_id).await?;
    Ok(Json(vehicles))
}

pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, vehicle_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = owned_vehicle(&state, &company_id, &vehicle_id).await?;
    Ok(Json(vehicle))
}

pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, vehicle_id)): Path<(String, String)>,
    Json(payload): Json<UpdateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut vehicle = owned_vehicle(&state, &company_id, &vehicle_id).await?;

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Vehicle name cannot be empty".into()));
        }
        vehicle.name = name;
    }
    if let Some(rate) = payload.rate_per_day {
        if rate <= 0.0 {
            return Err(AppError::Validation("Daily rate must be positive".into()));
        }
        vehicle.rate_per_day = rate;
    }
    if let Some(seats) = payload.seats { vehicle.seats = seats; }
    if let Some(transmission) = payload.transmission { vehicle.transmission = transmission; }
    if let Some(is_listed) = payload.is_listed { vehicle.is_listed = is_listed; }

    let updated = state.vehicle_repo.update(&vehicle).await?;
    info!("Vehicle updated: {}", updated.id);
    Ok(Json(updated))
}

pub(crate) async fn owned_vehicle(state: &Arc<AppState>, company_id: &str, vehicle_id: &str) -> Result<Vehicle, AppError> {
    let vehicle = state.vehicle_repo.find_by_id(vehicle_id).await?
        .ok_or(AppError::NotFound("Vehicle not found".into()))?;
    if vehicle.company_id != company_id {
        return Err(AppError::NotFound("Vehicle not found".into()));
    }
    Ok(vehicle)
}
