use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/consultations",
            get(handlers::catalog::list_consultations).post(handlers::catalog::create_consultation),
        )
        .route(
            "/api/tests",
            get(handlers::catalog::list_lab_tests).post(handlers::catalog::create_lab_test),
        )
}
