use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::company::CompanyId;
use crate::api::dtos::requests::CreateBlockRequest;
use crate::api::handlers::vehicle::owned_vehicle;
use crate::domain::models::calendar::{CalendarInterval, IntervalKind};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_block(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, vehicle_id)): Path<(String, String)>,
    Json(payload): Json<CreateBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = owned_vehicle(&state, &company_id, &vehicle_id).await?;

    if payload.end_date < payload.start_date {
        return Err(AppError::Validation("Block end date must not precede start date".into()));
    }

    let block = CalendarInterval::manual_block(vehicle.id, payload.start_date, payload.end_date, payload.reason);
    let created = state.interval_repo.create(&block).await?;

    info!("Manual block created: {} on vehicle {} ({}..{})", created.id, vehicle_id, created.start_date, created.end_date);
    Ok(Json(created))
}

pub async fn list_blocks(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, vehicle_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = owned_vehicle(&state, &company_id, &vehicle_id).await?;
    let blocks = state.interval_repo
        .list_by_vehicle_and_status(&vehicle.id, IntervalKind::BlockedManual.as_str())
        .await?;
    Ok(Json(blocks))
}

pub async fn delete_block(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, block_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let block = state.interval_repo.find_by_id(&block_id).await?
        .ok_or(AppError::NotFound("Manual block not found".into()))?;

    // Ownership check runs through the vehicle; blocks carry no company.
    let vehicle = owned_vehicle(&state, &company_id, &block.vehicle_id).await?;

    state.interval_repo.delete_manual_block(&vehicle.id, &block_id).await?;
    info!("Manual block deleted: {}", block_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
