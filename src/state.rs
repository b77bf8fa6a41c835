use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, CompanyRepository, FeedRepository, FeedSource,
    IntervalRepository, PaymentService, PolicyRepository, VehicleRepository,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub company_repo: Arc<dyn CompanyRepository>,
    pub vehicle_repo: Arc<dyn VehicleRepository>,
    pub policy_repo: Arc<dyn PolicyRepository>,
    pub interval_repo: Arc<dyn IntervalRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub feed_repo: Arc<dyn FeedRepository>,
    pub payment_service: Arc<dyn PaymentService>,
    pub feed_source: Arc<dyn FeedSource>,
}
