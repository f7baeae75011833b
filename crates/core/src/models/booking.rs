use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ClinicError, ClinicResult};

use super::{patient::Gender, require_amount, require_max_len};

/// Width of the `preferred_time` column.
pub const MAX_PREFERRED_TIME_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled bookings are final.
    pub fn is_final(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        match (self, next) {
            (current, _) if current.is_final() => false,
            (BookingStatus::Pending, BookingStatus::Confirmed) => true,
            (BookingStatus::Pending | BookingStatus::Confirmed, BookingStatus::Completed) => true,
            (_, BookingStatus::Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(ClinicError::Validation(format!(
                "Unknown booking status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub booking_id: String,
    pub patients: Vec<Uuid>,
    pub tests: Vec<String>,
    pub total_amount: f64,
    pub booking_date: NaiveDate,
    pub time_slot: Option<Uuid>,
    pub preferred_time: Option<String>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub booking_id: String,
    pub patients: Vec<Uuid>,
    pub tests: Vec<String>,
    pub total_amount: f64,
    pub booking_date: NaiveDate,
    pub time_slot: Option<Uuid>,
    pub preferred_time: Option<String>,
    pub notes: Option<String>,
}

/// Age as sent by the booking form, either a number or numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    Number(i64),
    Text(String),
}

impl AgeInput {
    /// `Ok(None)` for blank text, which the recorder treats as a missing age.
    pub fn parse(&self) -> ClinicResult<Option<i32>> {
        let value = match self {
            AgeInput::Number(n) => *n,
            AgeInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse::<i64>()
                    .map_err(|_| ClinicError::Validation(format!("Invalid age '{}'", text)))?
            }
        };

        i32::try_from(value)
            .ok()
            .filter(|age| *age >= 0)
            .map(Some)
            .ok_or_else(|| ClinicError::Validation(format!("Invalid age '{}'", value)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<AgeInput>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub patients: Vec<PatientEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub cart_items: Vec<CartItemRequest>,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub booking_date: Option<NaiveDate>,
    /// Kept as text: an id that does not parse is handled like an unknown slot.
    #[serde(default)]
    pub time_slot_id: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Checks the amounts and free-text fields. Patient entries are checked
    /// separately as they are classified.
    pub fn validate(&self) -> ClinicResult<()> {
        require_amount("total_price", self.total_price)?;
        for item in &self.cart_items {
            require_amount("price", item.price)?;
        }
        if let Some(preferred_time) = &self.preferred_time {
            require_max_len("preferred_time", preferred_time, MAX_PREFERRED_TIME_LEN)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPatient {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub age: i32,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatientDetail {
    #[serde(rename = "self")]
    SelfBooking { note: String },
    #[serde(rename = "other")]
    Other(SavedPatient),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestBooked {
    pub test_name: String,
    pub price: f64,
    pub patients_count: usize,
    pub patient_details: Vec<PatientDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub tests_booked: Vec<TestBooked>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotInfo {
    pub id: Option<Uuid>,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub success: bool,
    pub message: String,
    pub booking_id: String,
    pub total_patients_saved: usize,
    pub total_amount: f64,
    pub booking_date: NaiveDate,
    pub time_slot_info: TimeSlotInfo,
    pub booking_details: BookingDetails,
    pub patients_saved: Vec<SavedPatient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    /// Parsed with [`BookingStatus::from_str`] so unknown values surface as
    /// validation errors.
    pub status: String,
}

impl UpdateBookingStatusRequest {
    pub fn status(&self) -> ClinicResult<BookingStatus> {
        self.status.trim().to_ascii_lowercase().parse()
    }
}
