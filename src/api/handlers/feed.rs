use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::company::CompanyId;
use crate::api::dtos::{requests::CreateFeedRequest, responses::FeedSyncResponse};
use crate::api::handlers::vehicle::owned_vehicle;
use crate::background::sync_feed_once;
use crate::domain::models::feed::CalendarFeed;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_feed(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, vehicle_id)): Path<(String, String)>,
    Json(payload): Json<CreateFeedRequest>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = owned_vehicle(&state, &company_id, &vehicle_id).await?;

    if !payload.url.starts_with("http://") && !payload.url.starts_with("https://") {
        return Err(AppError::Validation("Feed URL must be an HTTP(S) address".into()));
    }

    let label = payload.label.unwrap_or_else(|| "External calendar".to_string());
    let feed = CalendarFeed::new(vehicle.id, payload.url, label);
    let created = state.feed_repo.create(&feed).await?;

    info!("Feed linked: {} for vehicle {}", created.id, vehicle_id);
    Ok(Json(created))
}

pub async fn list_feeds(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, vehicle_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = owned_vehicle(&state, &company_id, &vehicle_id).await?;
    let feeds = state.feed_repo.list_by_vehicle(&vehicle.id).await?;
    Ok(Json(feeds))
}

pub async fn sync_feed(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, feed_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let feed = state.feed_repo.find_by_id(&feed_id).await?
        .ok_or(AppError::NotFound("Feed not found".into()))?;
    owned_vehicle(&state, &company_id, &feed.vehicle_id).await?;

    let imported = sync_feed_once(&state, &feed).await?;
    Ok(Json(FeedSyncResponse { feed_id, imported }))
}

pub async fn delete_feed(
    State(state): State<Arc<AppState>>,
    CompanyId(company_id): CompanyId,
    Path((_, feed_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let feed = state.feed_repo.find_by_id(&feed_id).await?
        .ok_or(AppError::NotFound("Feed not found".into()))?;
    owned_vehicle(&state, &company_id, &feed.vehicle_id).await?;

    // Unlinking a feed also drops everything it imported, so the
    // timeline stops reporting its dates immediately.
    state.interval_repo.delete_for_feed(&feed_id).await?;
    state.feed_repo.delete(&feed_id).await?;

    info!("Feed unlinked: {}", feed_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
