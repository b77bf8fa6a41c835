use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, block, booking, booking_management, company, feed, health, policy, quote, vehicle};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Companies
        .route("/api/v1/companies", post(company::create_company))
        .route("/api/v1/companies/by-slug/{slug}", get(company::get_company_by_slug))

        // Rental policy
        .route("/api/v1/{company_id}/policy", get(policy::get_policy).put(policy::update_policy))

        // Fleet management
        .route("/api/v1/{company_id}/vehicles", post(vehicle::create_vehicle).get(vehicle::list_vehicles))
        .route("/api/v1/{company_id}/vehicles/{vehicle_id}", get(vehicle::get_vehicle).put(vehicle::update_vehicle))

        // Manual blocks
        .route("/api/v1/{company_id}/vehicles/{vehicle_id}/blocks", post(block::create_block).get(block::list_blocks))
        .route("/api/v1/{company_id}/blocks/{block_id}", delete(block::delete_block))

        // External calendar feeds
        .route("/api/v1/{company_id}/vehicles/{vehicle_id}/feeds", post(feed::create_feed).get(feed::list_feeds))
        .route("/api/v1/{company_id}/feeds/{feed_id}/sync", post(feed::sync_feed))
        .route("/api/v1/{company_id}/feeds/{feed_id}", delete(feed::delete_feed))

        // Public availability & pricing
        .route("/api/v1/vehicles/{vehicle_id}/availability", get(availability::get_availability))
        .route("/api/v1/vehicles/{vehicle_id}/selectable", get(availability::get_selectable))
        .route("/api/v1/vehicles/{vehicle_id}/quote", get(quote::get_quote))
        .route("/api/v1/vehicles/{vehicle_id}/calendar.ics", get(availability::export_calendar))

        // Public booking flow
        .route("/api/v1/vehicles/{vehicle_id}/bookings", post(booking::create_booking))
        .route("/api/v1/bookings/{booking_id}/charge", post(booking::charge_booking))
        .route("/api/v1/bookings/{booking_id}/reconcile", post(booking::reconcile_payment))

        // Renter self-service
        .route("/api/v1/bookings/manage/{token}", get(booking_management::get_booking_by_token))
        .route("/api/v1/bookings/manage/{token}/cancel", post(booking_management::cancel_booking))

        // Company booking management
        .route("/api/v1/{company_id}/bookings", get(booking::list_company_bookings))
        .route("/api/v1/{company_id}/bookings/{booking_id}/complete", post(booking::complete_booking))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        company_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
