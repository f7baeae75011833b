use axum::{Json, extract::State, http::StatusCode};
use clinic_core::models::catalog::{Consultation, LabTest, NewConsultation, NewLabTest};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_consultations(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Consultation>>, AppError> {
    Ok(Json(state.catalog().consultations().await?))
}

#[axum::debug_handler]
pub async fn create_consultation(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<NewConsultation>,
) -> Result<(StatusCode, Json<Consultation>), AppError> {
    let consultation = state.catalog().add_consultation(payload).await?;
    Ok((StatusCode::CREATED, Json(consultation)))
}

#[axum::debug_handler]
pub async fn list_lab_tests(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<LabTest>>, AppError> {
    Ok(Json(state.catalog().lab_tests().await?))
}

#[axum::debug_handler]
pub async fn create_lab_test(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<NewLabTest>,
) -> Result<(StatusCode, Json<LabTest>), AppError> {
    let test = state.catalog().add_lab_test(payload).await?;
    Ok((StatusCode::CREATED, Json(test)))
}
