use axum::{Json, extract::State};
use clinic_core::models::patient::DashboardStats;
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn dashboard_stats(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.patients().dashboard().await?))
}
