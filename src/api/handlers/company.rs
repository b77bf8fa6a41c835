use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CreateCompanyRequest, responses::CompanyCreatedResponse};
use crate::domain::models::{company::Company, policy::RentalPolicy};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_company(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Company name and slug are required".into()));
    }
    if !payload.contact_email.contains('@') {
        return Err(AppError::Validation("Invalid contact email".into()));
    }

    let company = Company::new(payload.name, payload.slug, payload.contact_email);
    let created = state.company_repo.create(&company).await?;

    // Every company starts from the default rental policy; it owns the
    // record and can tighten it afterwards.
    let policy = RentalPolicy::defaults(created.id.clone());
    state.policy_repo.create(&policy).await?;

    info!("Company created: {} ({})", created.id, created.slug);
    Ok(Json(CompanyCreatedResponse {
        company_id: created.id,
        slug: created.slug,
    }))
}

pub async fn get_company_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = state.company_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Company not found".into()))?;
    Ok(Json(company))
}
