use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/time-slots",
            get(handlers::slots::list_time_slots).post(handlers::slots::create_time_slot),
        )
        .route(
            "/api/time-slots/generate",
            post(handlers::slots::generate_time_slots),
        )
}
