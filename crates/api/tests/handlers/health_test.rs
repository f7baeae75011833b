use axum::http::StatusCode;
use clinic_api::routes::health::{HealthResponse, VersionResponse};
use pretty_assertions::assert_eq;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let health = response.json::<HealthResponse>();
    assert_eq!(health.status, "ok");
    assert_eq!(health.store, "ok");
}

#[tokio::test]
async fn test_version() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/version").await;

    assert_eq!(response.json::<VersionResponse>().version, env!("CARGO_PKG_VERSION"));
}
