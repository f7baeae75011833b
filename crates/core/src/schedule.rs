//! The clinic's daily slot template.
//!
//! Opening hours, per-slot capacity and closing days are data rather than
//! constants so a deployment can change them from the environment. The
//! default reproduces the clinic's standing rules: eight one-hour slots
//! (08:00-12:00 and 14:00-18:00), ten patients each, closed on Sundays.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ClinicError, ClinicResult},
    models::time_slot::{NewTimeSlot, TIME_FORMAT},
};

pub const DEFAULT_CAPACITY: i32 = 10;
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

const DEFAULT_WINDOWS: [(u32, u32); 8] = [
    (8, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (14, 15),
    (15, 16),
    (16, 17),
    (17, 18),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SlotWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> ClinicResult<Self> {
        if end <= start {
            return Err(ClinicError::Validation(format!(
                "Slot window must end after it starts ({} - {})",
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    fn hours(start: u32, end: u32) -> Self {
        Self {
            start: NaiveTime::from_hms_opt(start, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(end, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSchedule {
    /// Daily windows, kept sorted by start time.
    pub windows: Vec<SlotWindow>,
    /// Patients per slot; `None` creates unlimited slots.
    pub capacity: Option<i32>,
    pub closed_days: Vec<Weekday>,
    /// Default number of days covered by bulk generation.
    pub horizon_days: u32,
}

impl Default for SlotSchedule {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS
                .iter()
                .map(|&(start, end)| SlotWindow::hours(start, end))
                .collect(),
            capacity: Some(DEFAULT_CAPACITY),
            closed_days: vec![Weekday::Sun],
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl SlotSchedule {
    pub fn is_open(&self, date: NaiveDate) -> bool {
        !self.closed_days.contains(&date.weekday())
    }

    /// The slots the clinic offers on `date`, empty on closed days.
    pub fn slots_for(&self, date: NaiveDate) -> Vec<NewTimeSlot> {
        if !self.is_open(date) {
            return Vec::new();
        }

        self.windows
            .iter()
            .map(|window| NewTimeSlot {
                date,
                start_time: window.start,
                end_time: window.end,
                max_patients: self.capacity,
                unlimited_patients: self.capacity.is_none(),
            })
            .collect()
    }

    /// Parses `"08:00-09:00,09:00-10:00"`.
    ///
    /// Windows may not overlap; the result is sorted by start time.
    pub fn parse_windows(input: &str) -> ClinicResult<Vec<SlotWindow>> {
        let mut windows = input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (start, end) = part.split_once('-').ok_or_else(|| {
                    ClinicError::Validation(format!(
                        "Invalid slot window '{}', expected HH:MM-HH:MM",
                        part
                    ))
                })?;
                SlotWindow::new(parse_time(start)?, parse_time(end)?)
            })
            .collect::<ClinicResult<Vec<_>>>()?;

        if windows.is_empty() {
            return Err(ClinicError::Validation(
                "At least one slot window is required".to_string(),
            ));
        }

        windows.sort_by_key(|window| window.start);
        if let Some(pair) = windows.windows(2).find(|pair| pair[1].start < pair[0].end) {
            return Err(ClinicError::Validation(format!(
                "Slot windows overlap at {}",
                pair[1].start.format(TIME_FORMAT)
            )));
        }

        Ok(windows)
    }

    /// Parses a capacity: a positive integer or `unlimited`.
    pub fn parse_capacity(input: &str) -> ClinicResult<Option<i32>> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("unlimited") {
            return Ok(None);
        }

        match input.parse::<i32>() {
            Ok(capacity) if capacity > 0 => Ok(Some(capacity)),
            _ => Err(ClinicError::Validation(format!(
                "Invalid slot capacity '{}', expected a positive number or 'unlimited'",
                input
            ))),
        }
    }

    /// Parses a comma-separated weekday list such as `"sat,sun"`. Blank means always open.
    pub fn parse_closed_days(input: &str) -> ClinicResult<Vec<Weekday>> {
        input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<Weekday>()
                    .map_err(|_| ClinicError::Validation(format!("Invalid weekday '{}'", part)))
            })
            .collect()
    }
}

/// Parses `HH:MM`.
pub fn parse_time(input: &str) -> ClinicResult<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT)
        .map_err(|_| ClinicError::Validation(format!("Invalid time '{}', expected HH:MM", input.trim())))
}
