use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use clinic_core::{
    errors::ClinicError,
    models::time_slot::{
        CreateTimeSlotRequest, DaySlotsResponse, GenerateSlotsRequest, GenerationSummary,
        TimeSlotResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

/// Upper bound for a single bulk generation request.
pub const MAX_GENERATE_DAYS: u32 = 366;

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        AppError(ClinicError::Validation(format!(
            "Invalid date '{}', expected YYYY-MM-DD",
            raw
        )))
    })
}

#[axum::debug_handler]
pub async fn list_time_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<DaySlotsResponse>, AppError> {
    let date = match query.date.as_deref().filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let slots = state.slots().list_slots(date).await?;
    Ok(Json(DaySlotsResponse::new(date, &slots)))
}

#[axum::debug_handler]
pub async fn create_time_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTimeSlotRequest>,
) -> Result<(StatusCode, Json<TimeSlotResponse>), AppError> {
    let slot = state.slots().create_slot(payload.into_new_slot()?).await?;
    Ok((StatusCode::CREATED, Json(TimeSlotResponse::from(&slot))))
}

#[axum::debug_handler]
pub async fn generate_time_slots(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<GenerateSlotsRequest>,
) -> Result<Json<GenerationSummary>, AppError> {
    let start = payload.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let days = payload.days.unwrap_or(state.schedule.horizon_days);

    if days == 0 || days > MAX_GENERATE_DAYS {
        return Err(AppError(ClinicError::Validation(format!(
            "days must be between 1 and {}",
            MAX_GENERATE_DAYS
        ))));
    }

    let summary = state.slots().generate_range(start, days).await?;
    Ok(Json(summary))
}
