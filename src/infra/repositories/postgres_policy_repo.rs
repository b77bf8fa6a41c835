use crate::domain::{models::policy::RentalPolicy, ports::PolicyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPolicyRepo {
    pool: PgPool,
}

impl PostgresPolicyRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl PolicyRepository for PostgresPolicyRepo {
    async fn create(&self, policy: &RentalPolicy) -> Result<RentalPolicy, AppError> {
        sqlx::query_as::<_, RentalPolicy>(
            "INSERT INTO rental_policies (id, company_id, min_driver_age, min_driving_years, min_rental_days, license_required, damage_deposit_required, damage_deposit_amount, damage_deposit_method, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&policy.id).bind(&policy.company_id).bind(policy.min_driver_age)
            .bind(policy.min_driving_years).bind(policy.min_rental_days).bind(policy.license_required)
            .bind(policy.damage_deposit_required).bind(policy.damage_deposit_amount)
            .bind(&policy.damage_deposit_method).bind(policy.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_company(&self, company_id: &str) -> Result<Option<RentalPolicy>, AppError> {
        sqlx::query_as::<_, RentalPolicy>("SELECT * FROM rental_policies WHERE company_id = $1")
            .bind(company_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, policy: &RentalPolicy) -> Result<RentalPolicy, AppError> {
        sqlx::query_as::<_, RentalPolicy>(
            "UPDATE rental_policies SET min_driver_age=$1, min_driving_years=$2, min_rental_days=$3, license_required=$4, damage_deposit_required=$5, damage_deposit_amount=$6, damage_deposit_method=$7
             WHERE company_id=$8
             RETURNING *"
        )
            .bind(policy.min_driver_age).bind(policy.min_driving_years).bind(policy.min_rental_days)
            .bind(policy.license_required).bind(policy.damage_deposit_required)
            .bind(policy.damage_deposit_amount).bind(&policy.damage_deposit_method)
            .bind(&policy.company_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
