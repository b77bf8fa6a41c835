mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Days, Utc};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed(app: &TestApp, slug: &str) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/companies")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": format!("Race {}", slug), "slug": slug, "contact_email": "r@c.e"
            }).to_string())).unwrap()
    ).await.unwrap();
    let company_id = parse_body(res).await["company_id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/vehicles", company_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Daihatsu Rocky", "rate_per_day": 70.0, "seats": 5, "transmission": "AUTOMATIC"
            }).to_string())).unwrap()
    ).await.unwrap();
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

fn day_offset(days: u64) -> String {
    Utc::now().date_naive().checked_add_days(Days::new(days)).unwrap().format("%Y-%m-%d").to_string()
}

fn payload(pickup: u64, dropoff: u64, email: &str) -> Value {
    json!({
        "pickup_date": day_offset(pickup),
        "dropoff_date": day_offset(dropoff),
        "name": "Racer",
        "email": email,
        "driver_age": 30,
        "driving_years": 5,
        "has_international_license": true
    })
}

fn booking_request(vehicle_id: &str, body: &Value) -> Request<Body> {
    Request::builder().method("POST").uri(format!("/api/v1/vehicles/{}/bookings", vehicle_id))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_sequential_overlap_conflicts() {
    let app = TestApp::new().await;
    let vehicle_id = seed(&app, "sequential").await;

    let res = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(5, 8, "a@a.a"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Even an unpaid pending booking holds its range
    let res = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(7, 10, "b@b.b"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Back-to-back ranges sharing the changeover day also collide under
    // day granularity
    let res = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(8, 11, "c@c.c"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // A disjoint range goes through
    let res = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(9, 12, "d@d.d"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_overlap_exactly_one_wins() {
    let app = TestApp::new().await;
    let vehicle_id = seed(&app, "concurrent").await;

    let first = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(5, 8, "x@x.x")));
    let second = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(6, 9, "y@y.y")));

    let (res_a, res_b) = tokio::join!(first, second);
    let status_a = res_a.unwrap().status();
    let status_b = res_b.unwrap().status();

    let outcomes = [status_a, status_b];
    assert_eq!(outcomes.iter().filter(|s| **s == StatusCode::OK).count(), 1,
        "exactly one of two concurrent overlapping bookings must succeed (got {:?})", outcomes);
    assert_eq!(outcomes.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 1,
        "the losing attempt must receive a retryable conflict (got {:?})", outcomes);
}

#[tokio::test]
async fn test_conflict_is_retryable_after_dates_change() {
    let app = TestApp::new().await;
    let vehicle_id = seed(&app, "retry").await;

    let res = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(5, 8, "w@w.w"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(5, 8, "l@l.l"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The loser refreshes the calendar, picks a free range, and succeeds
    let res = app.router.clone().oneshot(booking_request(&vehicle_id, &payload(10, 13, "l@l.l"))).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_different_vehicles_do_not_contend() {
    let app = TestApp::new().await;
    let vehicle_a = seed(&app, "fleet-a").await;
    let vehicle_b = seed(&app, "fleet-b").await;

    let first = app.router.clone().oneshot(booking_request(&vehicle_a, &payload(5, 8, "p@p.p")));
    let second = app.router.clone().oneshot(booking_request(&vehicle_b, &payload(5, 8, "q@q.q")));

    let (res_a, res_b) = tokio::join!(first, second);
    assert_eq!(res_a.unwrap().status(), StatusCode::OK);
    assert_eq!(res_b.unwrap().status(), StatusCode::OK);
}
