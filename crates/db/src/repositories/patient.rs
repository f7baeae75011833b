use crate::models::DbPatient;
use chrono::Utc;
use clinic_core::models::patient::{NewPatient, PatientUpdate};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const PATIENT_COLUMNS: &str = "id, user_id, first_name, age, gender, phone_number, email, \
     prescription_file, prescription_filename, created_at";

pub async fn create_patient(pool: &Pool<Postgres>, patient: &NewPatient) -> Result<DbPatient> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating patient: id={}, first_name={}", id, patient.first_name);

    let db_patient = sqlx::query_as::<_, DbPatient>(&format!(
        r#"
        INSERT INTO patients (id, user_id, first_name, age, gender, phone_number, email,
                              prescription_file, prescription_filename, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {}
        "#,
        PATIENT_COLUMNS
    ))
    .bind(id)
    .bind(&patient.user_id)
    .bind(&patient.first_name)
    .bind(patient.age)
    .bind(patient.gender.code())
    .bind(&patient.phone_number)
    .bind(&patient.email)
    .bind(&patient.prescription_file)
    .bind(&patient.prescription_filename)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(db_patient)
}

pub async fn get_patient_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbPatient>> {
    let patient = sqlx::query_as::<_, DbPatient>(&format!(
        "SELECT {} FROM patients WHERE id = $1",
        PATIENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(patient)
}

pub async fn list_patients(pool: &Pool<Postgres>) -> Result<Vec<DbPatient>> {
    let patients = sqlx::query_as::<_, DbPatient>(&format!(
        "SELECT {} FROM patients ORDER BY first_name ASC",
        PATIENT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(patients)
}

pub async fn list_recent_patients(pool: &Pool<Postgres>, limit: i64) -> Result<Vec<DbPatient>> {
    let patients = sqlx::query_as::<_, DbPatient>(&format!(
        "SELECT {} FROM patients ORDER BY created_at DESC LIMIT $1",
        PATIENT_COLUMNS
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(patients)
}

pub async fn update_patient(
    pool: &Pool<Postgres>,
    id: Uuid,
    update: &PatientUpdate,
) -> Result<Option<DbPatient>> {
    let Some(patient) = get_patient_by_id(pool, id).await? else {
        return Ok(None);
    };

    let first_name = update.first_name.as_deref().unwrap_or(&patient.first_name);
    let age = update.age.unwrap_or(patient.age);
    let gender = update
        .gender
        .map(|gender| gender.code().to_string())
        .unwrap_or_else(|| patient.gender.clone());
    let phone_number = update.phone_number.as_ref().or(patient.phone_number.as_ref());
    let email = update.email.as_ref().or(patient.email.as_ref());

    let updated = sqlx::query_as::<_, DbPatient>(&format!(
        r#"
        UPDATE patients
        SET first_name = $2, age = $3, gender = $4, phone_number = $5, email = $6
        WHERE id = $1
        RETURNING {}
        "#,
        PATIENT_COLUMNS
    ))
    .bind(id)
    .bind(first_name)
    .bind(age)
    .bind(gender)
    .bind(phone_number)
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

pub async fn delete_patient(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM patients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_patients(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
