use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::feeds::http_feed_source::HttpFeedSource;
use crate::infra::payment::http_payment_service::HttpPaymentService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_company_repo::PostgresCompanyRepo,
    postgres_feed_repo::PostgresFeedRepo, postgres_interval_repo::PostgresIntervalRepo,
    postgres_policy_repo::PostgresPolicyRepo, postgres_vehicle_repo::PostgresVehicleRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_company_repo::SqliteCompanyRepo,
    sqlite_feed_repo::SqliteFeedRepo, sqlite_interval_repo::SqliteIntervalRepo,
    sqlite_policy_repo::SqlitePolicyRepo, sqlite_vehicle_repo::SqliteVehicleRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let payment_service = Arc::new(HttpPaymentService::new(
        config.payment_service_url.clone(),
        config.payment_service_token.clone(),
    ));
    let feed_source = Arc::new(HttpFeedSource::new());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            company_repo: Arc::new(PostgresCompanyRepo::new(pool.clone())),
            vehicle_repo: Arc::new(PostgresVehicleRepo::new(pool.clone())),
            policy_repo: Arc::new(PostgresPolicyRepo::new(pool.clone())),
            interval_repo: Arc::new(PostgresIntervalRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            feed_repo: Arc::new(PostgresFeedRepo::new(pool.clone())),
            payment_service,
            feed_source,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            company_repo: Arc::new(SqliteCompanyRepo::new(pool.clone())),
            vehicle_repo: Arc::new(SqliteVehicleRepo::new(pool.clone())),
            policy_repo: Arc::new(SqlitePolicyRepo::new(pool.clone())),
            interval_repo: Arc::new(SqliteIntervalRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            feed_repo: Arc::new(SqliteFeedRepo::new(pool.clone())),
            payment_service,
            feed_source,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
