use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_consultations() {
    let ctx = TestContext::new();

    let created = ctx
        .server
        .post("/api/consultations")
        .json(&json!({ "docname": "Dr. Rao", "specialization": "Cardiology", "price": 800.0 }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let listed = ctx.server.get("/api/consultations").await.json::<Value>();
    assert_eq!(listed[0]["docname"], json!("Dr. Rao"));
    assert_eq!(listed[0]["specialization"], json!("Cardiology"));
}

#[tokio::test]
async fn test_lab_tests_sorted_and_validated() {
    let ctx = TestContext::new();
    for (name, price) in [("Thyroid", 450.0), ("CBC", 300.0)] {
        ctx.server
            .post("/api/tests")
            .json(&json!({ "name": name, "price": price }))
            .await;
    }

    let listed = ctx.server.get("/api/tests").await.json::<Value>();
    assert_eq!(listed[0]["name"], json!("CBC"));
    assert_eq!(listed[1]["name"], json!("Thyroid"));

    let invalid = ctx
        .server
        .post("/api/tests")
        .json(&json!({ "name": "", "price": 10.0 }))
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
}
