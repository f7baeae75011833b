use crate::models::DbTimeSlot;
use chrono::{NaiveDate, Utc};
use clinic_core::models::time_slot::NewTimeSlot;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SLOT_COLUMNS: &str =
    "id, date, start_time, end_time, max_patients, unlimited_patients, booked_slots, created_at";

/// Inserts the slot unless its (date, start_time, end_time) key is taken.
pub async fn insert_time_slot_if_absent(pool: &Pool<Postgres>, slot: &NewTimeSlot) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO time_slots (id, date, start_time, end_time, max_patients, unlimited_patients, booked_slots, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
        ON CONFLICT (date, start_time, end_time) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(slot.date)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(slot.max_patients)
    .bind(slot.unlimited_patients)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn get_time_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        "SELECT {} FROM time_slots WHERE id = $1",
        SLOT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

pub async fn get_time_slots_by_date(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        "SELECT {} FROM time_slots WHERE date = $1 ORDER BY start_time ASC",
        SLOT_COLUMNS
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

/// Takes one seat in a bounded slot in a single conditional update.
///
/// Returns `None` when nothing was updated: the slot is missing, unlimited
/// or already full. Callers re-read the slot to tell these apart.
pub async fn increment_booked_slots(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET booked_slots = booked_slots + 1
        WHERE id = $1
          AND NOT unlimited_patients
          AND max_patients IS NOT NULL
          AND booked_slots < max_patients
        RETURNING {}
        "#,
        SLOT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

/// Gives back one seat of a bounded slot, never going below zero.
pub async fn decrement_booked_slots(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET booked_slots = booked_slots - 1
        WHERE id = $1
          AND NOT unlimited_patients
          AND booked_slots > 0
        RETURNING {}
        "#,
        SLOT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}
