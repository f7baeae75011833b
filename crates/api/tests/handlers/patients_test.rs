use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_patient_lifecycle() {
    let ctx = TestContext::new();

    let created = ctx
        .server
        .post("/api/patients")
        .json(&json!({ "first_name": "Meera", "age": 29, "gender": "F" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_str().unwrap().to_string();
    let path = format!("/api/patients/{}", id);

    let fetched = ctx.server.get(&path).await.json::<Value>();
    assert_eq!(fetched["first_name"], json!("Meera"));
    assert_eq!(fetched["gender"], json!("F"));

    let updated = ctx.server.put(&path).json(&json!({ "age": 30 })).await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    assert_eq!(updated.json::<Value>()["age"], json!(30));

    let deleted = ctx.server.delete(&path).await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let missing = ctx.server.get(&path).await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_patient_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/patients")
        .json(&json!({ "first_name": " ", "age": 29, "gender": "F" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let listed = ctx.server.get("/api/patients").await.json::<Value>();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_booking_patients_appear_in_dashboard() {
    let ctx = TestContext::new();
    ctx.book(None).await;

    let stats = ctx.server.get("/api/dashboard/stats").await;

    assert_eq!(stats.status_code(), StatusCode::OK);
    let stats = stats.json::<Value>();
    assert_eq!(stats["total_patients"], json!(1));
    assert_eq!(stats["total_consultations"], json!(0));
    assert_eq!(stats["recent_patients"][0]["first_name"], json!("Ravi"));
}
