use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::{TestContext, booking_payload};

#[tokio::test]
async fn test_book_test_returns_created() {
    let ctx = TestContext::new();
    let slot_id = ctx.first_slot_id("2024-06-10").await;

    let response = ctx
        .server
        .post("/api/book-test")
        .json(&booking_payload(Some(&slot_id)))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total_patients_saved"], json!(1));
    assert_eq!(body["total_amount"], json!(300.0));
    assert_eq!(body["booking_date"], json!("2024-06-10"));
    assert_eq!(body["time_slot_info"]["id"], json!(slot_id));
    assert_eq!(body["time_slot_info"]["time"], json!("08:00 - 09:00"));
    assert_eq!(body["patients_saved"][0]["gender"], json!("M"));
    assert!(body["booking_id"].as_str().unwrap().starts_with("BK"));

    let slots = ctx.slots("2024-06-10").await;
    assert_eq!(slots["slots"][0]["booked_slots"], json!(1));
    assert_eq!(slots["slots"][0]["available_slots"], json!(9));
}

#[tokio::test]
async fn test_unknown_slot_id_books_without_slot() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/book-test")
        .json(&booking_payload(Some("00000000-0000-0000-0000-000000000000")))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["time_slot_info"]["id"], json!(null));
}

#[tokio::test]
async fn test_full_slot_is_conflict() {
    let ctx = TestContext::new();
    let slot_id = ctx.first_slot_id("2024-06-10").await;
    for _ in 0..10 {
        ctx.book(Some(&slot_id)).await;
    }

    let response = ctx
        .server
        .post("/api/book-test")
        .json(&booking_payload(Some(&slot_id)))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert!(response.json::<Value>()["error"].as_str().unwrap().starts_with("Slot full"));

    let slots = ctx.slots("2024-06-10").await;
    assert_eq!(slots["total_slots"], json!(7));
}

#[tokio::test]
async fn test_invalid_age_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/book-test")
        .json(&json!({
            "cart_items": [
                { "name": "CBC", "price": 300.0, "patients": [ { "name": "Ravi", "age": "forty" } ] }
            ],
            "total_price": 300.0
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_and_list_bookings() {
    let ctx = TestContext::new();
    let booking_id = ctx.book(None).await["booking_id"].as_str().unwrap().to_string();

    let response = ctx.server.get(&format!("/api/bookings/{}", booking_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let booking = response.json::<Value>();
    assert_eq!(booking["status"], json!("pending"));
    assert_eq!(booking["tests"], json!(["CBC"]));

    let listed = ctx.server.get("/api/bookings").await.json::<Value>();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let missing = ctx.server.get("/api/bookings/BK00000000000000AAAAAA").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_restores_capacity() {
    let ctx = TestContext::new();
    let slot_id = ctx.first_slot_id("2024-06-10").await;
    let booking_id = ctx.book(Some(&slot_id)).await["booking_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .server
        .post(&format!("/api/bookings/{}/cancel", booking_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], json!("cancelled"));

    let slots = ctx.slots("2024-06-10").await;
    assert_eq!(slots["slots"][0]["booked_slots"], json!(0));

    let again = ctx
        .server
        .post(&format!("/api/bookings/{}/cancel", booking_id))
        .await;
    assert_eq!(again.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_status() {
    let ctx = TestContext::new();
    let booking_id = ctx.book(None).await["booking_id"].as_str().unwrap().to_string();
    let path = format!("/api/bookings/{}/status", booking_id);

    let confirmed = ctx.server.put(&path).json(&json!({ "status": "confirmed" })).await;
    assert_eq!(confirmed.status_code(), StatusCode::OK);
    assert_eq!(confirmed.json::<Value>()["status"], json!("confirmed"));

    let backwards = ctx.server.put(&path).json(&json!({ "status": "pending" })).await;
    assert_eq!(backwards.status_code(), StatusCode::BAD_REQUEST);

    let unknown = ctx.server.put(&path).json(&json!({ "status": "shipped" })).await;
    assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_total_is_bad_request() {
    let ctx = TestContext::new();
    let slot_id = ctx.first_slot_id("2024-06-10").await;
    let mut payload = booking_payload(Some(&slot_id));
    payload["total_price"] = json!(-500.0);

    let response = ctx.server.post("/api/book-test").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("total_price"));

    let slots = ctx.slots("2024-06-10").await;
    assert_eq!(slots["slots"][0]["booked_slots"], json!(0));
    assert_eq!(ctx.server.get("/api/patients").await.json::<Value>(), json!([]));
}
