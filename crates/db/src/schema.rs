use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create patients table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id VARCHAR(100) NULL,
            first_name VARCHAR(100) NOT NULL,
            age INTEGER NOT NULL CHECK (age >= 0),
            gender CHAR(1) NOT NULL CHECK (gender IN ('M', 'F', 'O')),
            phone_number VARCHAR(15) NULL,
            email VARCHAR(255) NULL,
            prescription_file TEXT NULL,
            prescription_filename TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create consultations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS consultations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            docname VARCHAR(255) NOT NULL,
            specialization VARCHAR(255) NULL,
            price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create lab_tests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lab_tests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table; one slot per (date, start, end)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            max_patients INTEGER NULL CHECK (max_patients >= 1),
            unlimited_patients BOOLEAN NOT NULL DEFAULT FALSE,
            booked_slots INTEGER NOT NULL DEFAULT 0 CHECK (booked_slots >= 0),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT unique_slot UNIQUE (date, start_time, end_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            booking_id VARCHAR(50) NOT NULL UNIQUE,
            patient_ids UUID[] NOT NULL DEFAULT '{}',
            tests TEXT[] NOT NULL DEFAULT '{}',
            total_amount DOUBLE PRECISION NOT NULL CHECK (total_amount >= 0),
            booking_date DATE NOT NULL,
            time_slot_id UUID NULL REFERENCES time_slots(id) ON DELETE SET NULL,
            preferred_time VARCHAR(100) NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'confirmed', 'completed', 'cancelled')),
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_time_slots_date ON time_slots(date)",
        "CREATE INDEX IF NOT EXISTS idx_patients_first_name ON patients(first_name)",
        "CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_created_at ON bookings(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_time_slot_id ON bookings(time_slot_id)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
