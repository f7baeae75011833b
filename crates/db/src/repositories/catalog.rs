use crate::models::{DbConsultation, DbLabTest};
use chrono::Utc;
use clinic_core::models::catalog::{NewConsultation, NewLabTest};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Consultation Repository

pub async fn create_consultation(
    pool: &Pool<Postgres>,
    consultation: &NewConsultation,
) -> Result<DbConsultation> {
    let db_consultation = sqlx::query_as::<_, DbConsultation>(
        r#"
        INSERT INTO consultations (id, docname, specialization, price, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, docname, specialization, price, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&consultation.docname)
    .bind(&consultation.specialization)
    .bind(consultation.price)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(db_consultation)
}

pub async fn list_consultations(pool: &Pool<Postgres>) -> Result<Vec<DbConsultation>> {
    let consultations = sqlx::query_as::<_, DbConsultation>(
        r#"
        SELECT id, docname, specialization, price, created_at
        FROM consultations
        ORDER BY docname ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(consultations)
}

pub async fn count_consultations(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM consultations")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

// Lab Test Repository

pub async fn create_lab_test(pool: &Pool<Postgres>, test: &NewLabTest) -> Result<DbLabTest> {
    let db_test = sqlx::query_as::<_, DbLabTest>(
        r#"
        INSERT INTO lab_tests (id, name, description, price, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, price, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&test.name)
    .bind(&test.description)
    .bind(test.price)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(db_test)
}

pub async fn list_lab_tests(pool: &Pool<Postgres>) -> Result<Vec<DbLabTest>> {
    let tests = sqlx::query_as::<_, DbLabTest>(
        r#"
        SELECT id, name, description, price, created_at
        FROM lab_tests
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tests)
}

pub async fn count_lab_tests(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lab_tests")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
