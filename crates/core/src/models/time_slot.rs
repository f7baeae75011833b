use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{ClinicError, ClinicResult},
    schedule::{DEFAULT_CAPACITY, SlotWindow, parse_time},
};

/// Wall-clock format used for slot times on the wire.
pub const TIME_FORMAT: &str = "%H:%M";

/// A bookable appointment window on a calendar day.
///
/// Only `booked_slots` is mutable state. `available_slots` and `available`
/// are derived from it and the capacity so they can never disagree with the
/// counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_patients: Option<i32>,
    pub unlimited_patients: bool,
    pub booked_slots: i32,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Effective capacity, `None` when the slot accepts any number of patients.
    ///
    /// A bounded slot that lost its `max_patients` value is treated as unlimited.
    pub fn capacity(&self) -> Option<i32> {
        if self.unlimited_patients {
            None
        } else {
            self.max_patients
        }
    }

    pub fn available_slots(&self) -> Option<i32> {
        self.capacity()
            .map(|max| (max - self.booked_slots).max(0))
    }

    pub fn is_available(&self) -> bool {
        self.available_slots().map_or(true, |left| left > 0)
    }

    pub fn is_full(&self) -> bool {
        !self.is_available()
    }

    pub fn display_time(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format(TIME_FORMAT),
            self.end_time.format(TIME_FORMAT)
        )
    }
}

/// A slot that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_patients: Option<i32>,
    pub unlimited_patients: bool,
}

impl NewTimeSlot {
    /// Natural key of a slot; at most one slot exists per key.
    pub fn key(&self) -> (NaiveDate, NaiveTime, NaiveTime) {
        (self.date, self.start_time, self.end_time)
    }

    pub fn validate(&self) -> ClinicResult<()> {
        SlotWindow::new(self.start_time, self.end_time)?;
        match (self.unlimited_patients, self.max_patients) {
            (true, _) => Ok(()),
            (false, Some(max)) if max > 0 => Ok(()),
            (false, other) => Err(ClinicError::Validation(format!(
                "max_patients must be a positive number for a bounded slot, got {:?}",
                other
            ))),
        }
    }
}

/// Body of `POST /api/time-slots`: one slot outside the daily template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTimeSlotRequest {
    pub date: NaiveDate,
    /// `HH:MM`
    pub start_time: String,
    pub end_time: String,
    /// Defaults to the standard capacity for bounded slots.
    #[serde(default)]
    pub max_patients: Option<i32>,
    #[serde(default)]
    pub unlimited_patients: bool,
}

impl CreateTimeSlotRequest {
    pub fn into_new_slot(self) -> ClinicResult<NewTimeSlot> {
        let slot = NewTimeSlot {
            date: self.date,
            start_time: parse_time(&self.start_time)?,
            end_time: parse_time(&self.end_time)?,
            max_patients: if self.unlimited_patients {
                None
            } else {
                Some(self.max_patients.unwrap_or(DEFAULT_CAPACITY))
            },
            unlimited_patients: self.unlimited_patients,
        };
        slot.validate()?;
        Ok(slot)
    }
}

/// Result of trying to take one seat in a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatReservation {
    /// The seat was taken (or the slot is unlimited); carries the slot after the update.
    Reserved(TimeSlot),
    /// The slot exists but has no capacity left.
    Full(TimeSlot),
    /// No slot with that id.
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub display_time: String,
    pub available_slots: Option<i32>,
    pub booked_slots: i32,
    pub unlimited_patients: bool,
    pub available: bool,
}

impl From<&TimeSlot> for TimeSlotResponse {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            id: slot.id,
            date: slot.date,
            start_time: slot.start_time.format(TIME_FORMAT).to_string(),
            end_time: slot.end_time.format(TIME_FORMAT).to_string(),
            display_time: slot.display_time(),
            available_slots: slot.available_slots(),
            booked_slots: slot.booked_slots,
            unlimited_patients: slot.unlimited_patients,
            available: slot.is_available(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlotsResponse {
    pub date: NaiveDate,
    pub total_slots: usize,
    pub slots: Vec<TimeSlotResponse>,
}

impl DaySlotsResponse {
    pub fn new(date: NaiveDate, slots: &[TimeSlot]) -> Self {
        let slots: Vec<TimeSlotResponse> = slots.iter().map(TimeSlotResponse::from).collect();
        Self {
            date,
            total_slots: slots.len(),
            slots,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateSlotsRequest {
    pub start_date: Option<NaiveDate>,
    pub days: Option<u32>,
}

/// Outcome of a bulk generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub start_date: Option<NaiveDate>,
    pub days_processed: u32,
    pub slots_created: u32,
    pub closed_days: u32,
    pub already_populated_days: u32,
}
