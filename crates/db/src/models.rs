use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clinic_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        booking::Booking,
        catalog::{Consultation, LabTest},
        patient::Patient,
        time_slot::TimeSlot,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_patients: Option<i32>,
    pub unlimited_patients: bool,
    pub booked_slots: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        Self {
            id: row.id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            max_patients: row.max_patients,
            unlimited_patients: row.unlimited_patients,
            booked_slots: row.booked_slots,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub first_name: String,
    pub age: i32,
    pub gender: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub prescription_file: Option<String>,
    pub prescription_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbPatient> for Patient {
    type Error = ClinicError;

    fn try_from(row: DbPatient) -> ClinicResult<Self> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            age: row.age,
            gender: row.gender.parse()?,
            phone_number: row.phone_number,
            email: row.email,
            prescription_file: row.prescription_file,
            prescription_filename: row.prescription_filename,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub booking_id: String,
    pub patient_ids: Vec<Uuid>,
    pub tests: Vec<String>,
    pub total_amount: f64,
    pub booking_date: NaiveDate,
    pub time_slot_id: Option<Uuid>,
    pub preferred_time: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = ClinicError;

    fn try_from(row: DbBooking) -> ClinicResult<Self> {
        Ok(Self {
            id: row.id,
            booking_id: row.booking_id,
            patients: row.patient_ids,
            tests: row.tests,
            total_amount: row.total_amount,
            booking_date: row.booking_date,
            time_slot: row.time_slot_id,
            preferred_time: row.preferred_time,
            status: row.status.parse()?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbConsultation {
    pub id: Uuid,
    pub docname: String,
    pub specialization: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl From<DbConsultation> for Consultation {
    fn from(row: DbConsultation) -> Self {
        Self {
            id: row.id,
            docname: row.docname,
            specialization: row.specialization,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLabTest {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl From<DbLabTest> for LabTest {
    fn from(row: DbLabTest) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            created_at: row.created_at,
        }
    }
}
