use rental_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_company_repo::SqliteCompanyRepo,
        sqlite_feed_repo::SqliteFeedRepo,
        sqlite_interval_repo::SqliteIntervalRepo,
        sqlite_policy_repo::SqlitePolicyRepo,
        sqlite_vehicle_repo::SqliteVehicleRepo,
    },
    domain::ports::{ChargeHandle, ChargeStatus, FeedSource, PaymentService},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;
use axum::Router;
use async_trait::async_trait;

/// In-memory stand-in for the payment collaborator. Tests flip charges
/// between pending/paid/unpaid and can take the whole provider offline.
pub struct MockPaymentService {
    reachable: Mutex<bool>,
    statuses: Mutex<HashMap<String, ChargeStatus>>,
    counter: AtomicU32,
}

impl MockPaymentService {
    pub fn new() -> Self {
        Self {
            reachable: Mutex::new(true),
            statuses: Mutex::new(HashMap::new()),
            counter: AtomicU32::new(0),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        *self.reachable.lock().unwrap() = reachable;
    }

    pub fn set_status(&self, reference: &str, status: ChargeStatus) {
        self.statuses.lock().unwrap().insert(reference.to_string(), status);
    }
}

#[async_trait]
impl PaymentService for MockPaymentService {
    async fn create_charge(&self, _amount: f64, _description: &str, _customer_ref: &str) -> Result<ChargeHandle, AppError> {
        if !*self.reachable.lock().unwrap() {
            return Err(AppError::Upstream("payment provider unreachable".into()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let reference = format!("ch_{}", n);
        self.statuses.lock().unwrap().insert(reference.clone(), ChargeStatus::Pending);
        Ok(ChargeHandle {
            checkout_url: format!("https://pay.test/checkout/{}", reference),
            reference,
        })
    }

    async fn charge_status(&self, reference: &str) -> Result<ChargeStatus, AppError> {
        if !*self.reachable.lock().unwrap() {
            return Err(AppError::Upstream("payment provider unreachable".into()));
        }
        self.statuses.lock().unwrap().get(reference).copied()
            .ok_or(AppError::Upstream(format!("unknown charge {}", reference)))
    }
}

/// Serves canned iCal text per URL instead of hitting the network.
pub struct MockFeedSource {
    bodies: Mutex<HashMap<String, String>>,
}

impl MockFeedSource {
    pub fn new() -> Self {
        Self { bodies: Mutex::new(HashMap::new()) }
    }

    pub fn set_body(&self, url: &str, body: &str) {
        self.bodies.lock().unwrap().insert(url.to_string(), body.to_string());
    }
}

#[async_trait]
impl FeedSource for MockFeedSource {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.bodies.lock().unwrap().get(url).cloned()
            .ok_or(AppError::Upstream(format!("calendar unreachable at {}", url)))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub payment: Arc<MockPaymentService>,
    pub feeds: Arc<MockFeedSource>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            payment_service_url: "http://localhost".to_string(),
            payment_service_token: "token".to_string(),
            feed_sync_interval_secs: 3600,
        };

        let payment = Arc::new(MockPaymentService::new());
        let feeds = Arc::new(MockFeedSource::new());

        let state = Arc::new(AppState {
            config: config.clone(),
            company_repo: Arc::new(SqliteCompanyRepo::new(pool.clone())),
            vehicle_repo: Arc::new(SqliteVehicleRepo::new(pool.clone())),
            policy_repo: Arc::new(SqlitePolicyRepo::new(pool.clone())),
            interval_repo: Arc::new(SqliteIntervalRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            feed_repo: Arc::new(SqliteFeedRepo::new(pool.clone())),
            payment_service: payment.clone(),
            feed_source: feeds.clone(),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            payment,
            feeds,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
    }
}
