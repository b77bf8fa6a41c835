use crate::domain::{models::vehicle::Vehicle, ports::VehicleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresVehicleRepo {
    pool: PgPool,
}

impl PostgresVehicleRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl VehicleRepository for PostgresVehicleRepo {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "INSERT INTO vehicles (id, company_id, name, rate_per_day, seats, transmission, is_listed, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&vehicle.id).bind(&vehicle.company_id).bind(&vehicle.name)
            .bind(vehicle.rate_per_day).bind(vehicle.seats).bind(&vehicle.transmission)
            .bind(vehicle.is_listed).bind(vehicle.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_company(&self, company_id: &str) -> Result<Vec<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE company_id = $1 ORDER BY created_at ASC")
            .bind(company_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET name=$1, rate_per_day=$2, seats=$3, transmission=$4, is_listed=$5
             WHERE id=$6 AND company_id=$7
             RETURNING *"
        )
            .bind(&vehicle.name).bind(vehicle.rate_per_day).bind(vehicle.seats)
            .bind(&vehicle.transmission).bind(vehicle.is_listed)
            .bind(&vehicle.id).bind(&vehicle.company_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
