use crate::domain::{models::policy::RentalPolicy, ports::PolicyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePolicyRepo {
    pool: SqlitePool,
}

impl SqlitePolicyRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl PolicyRepository for SqlitePolicyRepo {
    async fn create(&self, policy: &RentalPolicy) -> Result<RentalPolicy, AppError> {
        sqlx::query_as::<_, RentalPolicy>(
            "INSERT INTO rental_policies (id, company_id, min_driver_age, min_driving_years, min_rental_days, license_required, damage_deposit_required, damage_deposit_amount, damage_deposit_method, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&policy.id).bind(&policy.company_id).bind(policy.min_driver_age)
            .bind(policy.min_driving_years).bind(policy.min_rental_days).bind(policy.license_required)
            .bind(policy.damage_deposit_required).bind(policy.damage_deposit_amount)
            .bind(&policy.damage_deposit_method).bind(policy.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_company(&self, company_id: &str) -> Result<Option<RentalPolicy>, AppError> {
        sqlx::query_as::<_, RentalPolicy>("SELECT * FROM rental_policies WHERE company_id = ?")
            .bind(company_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, policy: &RentalPolicy) -> Result<RentalPolicy, AppError> {
        sqlx::query_as::<_, RentalPolicy>(
            "UPDATE rental_policies SET min_driver_age=?, min_driving_years=?, min_rental_days=?, license_required=?, damage_deposit_required=?, damage_deposit_amount=?, damage_deposit_method=?
             WHERE company_id=?
             RETURNING *"
        )
            .bind(policy.min_driver_age).bind(policy.min_driving_years).bind(policy.min_rental_days)
            .bind(policy.license_required).bind(policy.damage_deposit_required)
            .bind(policy.damage_deposit_amount).bind(&policy.damage_deposit_method)
            .bind(&policy.company_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
