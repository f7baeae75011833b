use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_core::models::patient::{NewPatient, Patient, PatientUpdate};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Patient>>, AppError> {
    Ok(Json(state.patients().list().await?))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    let patient = state.patients().create(payload).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, AppError> {
    Ok(Json(state.patients().get(id).await?))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatientUpdate>,
) -> Result<Json<Patient>, AppError> {
    Ok(Json(state.patients().update(id, payload).await?))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.patients().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
