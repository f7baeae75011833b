use crate::models::DbBooking;
use chrono::Utc;
use clinic_core::models::booking::{BookingStatus, NewBooking};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, booking_id, patient_ids, tests, total_amount, booking_date, \
     time_slot_id, preferred_time, status, notes, created_at, updated_at";

pub async fn create_booking(pool: &Pool<Postgres>, booking: &NewBooking) -> Result<DbBooking> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let db_booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, booking_id, patient_ids, tests, total_amount, booking_date,
                              time_slot_id, preferred_time, status, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    ))
    .bind(id)
    .bind(&booking.booking_id)
    .bind(&booking.patients)
    .bind(&booking.tests)
    .bind(booking.total_amount)
    .bind(booking.booking_date)
    .bind(booking.time_slot)
    .bind(&booking.preferred_time)
    .bind(BookingStatus::Pending.as_str())
    .bind(&booking.notes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(db_booking)
}

pub async fn get_booking_by_booking_id(pool: &Pool<Postgres>, booking_id: &str) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {} FROM bookings WHERE booking_id = $1",
        BOOKING_COLUMNS
    ))
    .bind(booking_id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn list_bookings(pool: &Pool<Postgres>) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {} FROM bookings ORDER BY created_at DESC",
        BOOKING_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    booking_id: &str,
    expected: BookingStatus,
    status: BookingStatus,
) -> Result<Option<DbBooking>> {
    // The status guard makes this a compare-and-set; a concurrent change
    // leaves zero rows and `None`.
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, updated_at = $3
        WHERE booking_id = $1 AND status = $4
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    ))
    .bind(booking_id)
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(expected.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}
