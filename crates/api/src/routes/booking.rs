use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/book-test", post(handlers::booking::book_test))
        .route("/api/bookings", get(handlers::booking::list_bookings))
        .route("/api/bookings/:booking_id", get(handlers::booking::get_booking))
        .route(
            "/api/bookings/:booking_id/cancel",
            post(handlers::booking::cancel_booking),
        )
        .route(
            "/api/bookings/:booking_id/status",
            put(handlers::booking::update_booking_status),
        )
}
