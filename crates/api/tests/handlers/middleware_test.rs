use axum::http::StatusCode;
use clinic_api::middleware::error_handling::{AppError, map_error};
use clinic_core::errors::ClinicError;
use rstest::rstest;

#[rstest]
#[case(ClinicError::NotFound("Booking BK1 not found".to_string()), StatusCode::NOT_FOUND)]
#[case(ClinicError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(ClinicError::SlotFull("08:00 - 09:00".to_string()), StatusCode::CONFLICT)]
#[case(ClinicError::Conflict("2024-06-10 18:00 - 19:00".to_string()), StatusCode::CONFLICT)]
#[case(ClinicError::Store(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    ClinicError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: ClinicError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[test]
fn test_eyre_report_becomes_store_error() {
    let err: AppError = eyre::eyre!("pool timed out").into();

    assert!(matches!(err.0, ClinicError::Store(_)));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
