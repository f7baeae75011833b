use axum::http::StatusCode;
use clinic_core::schedule::SlotSchedule;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::{TestContext, booking_payload};

#[tokio::test]
async fn test_monday_listing_shape() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/time-slots")
        .add_query_param("date", "2024-06-10")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["date"], json!("2024-06-10"));
    assert_eq!(body["total_slots"], json!(8));

    let first = &body["slots"][0];
    assert_eq!(first["start_time"], json!("08:00"));
    assert_eq!(first["end_time"], json!("09:00"));
    assert_eq!(first["display_time"], json!("08:00 - 09:00"));
    assert_eq!(first["available_slots"], json!(10));
    assert_eq!(first["booked_slots"], json!(0));
    assert_eq!(first["unlimited_patients"], json!(false));
    assert_eq!(first["available"], json!(true));
    assert_eq!(body["slots"][7]["display_time"], json!("17:00 - 18:00"));
}

#[tokio::test]
async fn test_sunday_listing_is_empty() {
    let ctx = TestContext::new();

    let body = ctx.slots("2024-06-09").await;

    assert_eq!(body["total_slots"], json!(0));
    assert_eq!(body["slots"], json!([]));
}

#[tokio::test]
async fn test_listing_twice_creates_no_duplicates() {
    let ctx = TestContext::new();

    ctx.slots("2024-06-10").await;
    ctx.slots("2024-06-10").await;

    assert_eq!(ctx.store.slot_count().unwrap(), 8);
}

#[tokio::test]
async fn test_invalid_date_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/time-slots")
        .add_query_param("date", "10-06-2024")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("10-06-2024"));
}

#[tokio::test]
async fn test_generate_range() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/time-slots/generate")
        .json(&json!({ "start_date": "2024-06-10", "days": 7 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["days_processed"], json!(7));
    assert_eq!(body["slots_created"], json!(48));
    assert_eq!(body["closed_days"], json!(1));
    assert_eq!(ctx.store.slot_count().unwrap(), 48);
}

#[tokio::test]
async fn test_generate_uses_configured_horizon() {
    let ctx = TestContext::with_schedule(SlotSchedule {
        horizon_days: 2,
        closed_days: Vec::new(),
        ..SlotSchedule::default()
    });

    let body = ctx
        .server
        .post("/api/time-slots/generate")
        .json(&json!({ "start_date": "2024-06-09" }))
        .await
        .json::<Value>();

    assert_eq!(body["days_processed"], json!(2));
    assert_eq!(body["slots_created"], json!(16));
}

#[tokio::test]
async fn test_generate_rejects_zero_days() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/time-slots/generate")
        .json(&json!({ "days": 0 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_custom_slot() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/time-slots")
        .json(&json!({
            "date": "2024-06-10",
            "start_time": "18:00",
            "end_time": "19:00",
            "max_patients": 2
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["display_time"], json!("18:00 - 19:00"));
    assert_eq!(body["available_slots"], json!(2));
    assert_eq!(body["unlimited_patients"], json!(false));

    // The template day is still generated alongside the custom slot.
    let listing = ctx.slots("2024-06-10").await;
    assert_eq!(listing["total_slots"], json!(9));
    assert_eq!(listing["slots"][8]["id"], body["id"]);
}

#[tokio::test]
async fn test_duplicate_custom_slot_is_conflict() {
    let ctx = TestContext::new();
    let payload = json!({ "date": "2024-06-10", "start_time": "18:00", "end_time": "19:00" });

    ctx.server.post("/api/time-slots").json(&payload).await;
    let response = ctx.server.post("/api/time-slots").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(ctx.store.slot_count().unwrap(), 9);
}

#[tokio::test]
async fn test_custom_slot_matching_template_is_conflict() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/time-slots")
        .json(&json!({ "date": "2024-06-10", "start_time": "08:00", "end_time": "09:00" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_custom_slot_rejects_bad_window() {
    let ctx = TestContext::new();

    for body in [
        json!({ "date": "2024-06-10", "start_time": "19:00", "end_time": "18:00" }),
        json!({ "date": "2024-06-10", "start_time": "7pm", "end_time": "20:00" }),
        json!({ "date": "2024-06-10", "start_time": "18:00", "end_time": "19:00", "max_patients": 0 }),
    ] {
        let response = ctx.server.post("/api/time-slots").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(ctx.store.slot_count().unwrap(), 0);
}

#[tokio::test]
async fn test_unlimited_custom_slot_never_fills() {
    let ctx = TestContext::new();
    let created = ctx
        .server
        .post("/api/time-slots")
        .json(&json!({
            "date": "2024-06-09",
            "start_time": "10:00",
            "end_time": "12:00",
            "unlimited_patients": true
        }))
        .await
        .json::<Value>();
    let slot_id = created["id"].as_str().unwrap().to_string();

    for _ in 0..12 {
        let response = ctx
            .server
            .post("/api/book-test")
            .json(&booking_payload(Some(&slot_id)))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let listing = ctx.slots("2024-06-09").await;
    assert_eq!(listing["total_slots"], json!(1));
    assert_eq!(listing["slots"][0]["available_slots"], json!(null));
    assert_eq!(listing["slots"][0]["available"], json!(true));
}
