//! Turns a checkout cart into a booking record.
//!
//! The flow is: validate the whole request, create patient rows for every
//! named, non-self entry, reserve a seat in the selected slot, then write
//! the booking. Patient rows are not rolled back if a later step fails; a
//! reserved seat is released again if the booking itself cannot be written.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    errors::{ClinicError, ClinicResult},
    models::{
        booking::{
            Booking, BookingConfirmation, BookingDetails, BookingRequest, BookingStatus,
            NewBooking, PatientDetail, PatientEntry, SavedPatient, TestBooked, TimeSlotInfo,
        },
        patient::{Gender, NewPatient},
        time_slot::TimeSlot,
    },
    schedule::SlotSchedule,
    store::{BookingStore, PatientStore, SlotStore},
};

use super::slots::SlotService;

/// Names starting with this token are bookings for the requester themself.
pub const SELF_MARKER: &str = "Self";
pub const SELF_NOTE: &str = "Booked for self";
pub const CUSTOM_TIME: &str = "Custom time";
const BOOKING_ID_SUFFIX_LEN: usize = 6;

/// `BK` + UTC timestamp to the second + random suffix.
///
/// The suffix keeps two bookings made in the same second apart; the store's
/// unique index on `booking_id` catches anything left.
pub fn generate_booking_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOOKING_ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("BK{}{}", now.format("%Y%m%d%H%M%S"), suffix)
}

enum EntryKind {
    SelfBooking,
    Incomplete,
    Patient(NewPatient),
}

fn classify_entry(entry: &PatientEntry) -> ClinicResult<EntryKind> {
    let name = entry.name.as_deref().map(str::trim).unwrap_or_default();
    if name.starts_with(SELF_MARKER) {
        return Ok(EntryKind::SelfBooking);
    }

    if name.is_empty() {
        return Ok(EntryKind::Incomplete);
    }
    let age = match &entry.age {
        Some(age) => age.parse()?,
        None => None,
    };
    let Some(age) = age else {
        return Ok(EntryKind::Incomplete);
    };

    let gender = match entry.gender.as_deref() {
        Some(gender) => Gender::from_loose(gender)?,
        None => Gender::Other,
    };

    Ok(EntryKind::Patient(NewPatient {
        user_id: None,
        first_name: name.to_string(),
        age,
        gender,
        phone_number: None,
        email: None,
        prescription_file: None,
        prescription_filename: None,
    }))
}

fn check_transition(booking: &Booking, next: BookingStatus) -> ClinicResult<()> {
    if next == BookingStatus::Cancelled {
        if booking.status == BookingStatus::Cancelled {
            return Err(ClinicError::Validation(format!(
                "Booking {} is already cancelled",
                booking.booking_id
            )));
        }
        if booking.status.is_final() {
            return Err(ClinicError::Validation(format!(
                "Booking {} is {} and cannot be cancelled",
                booking.booking_id, booking.status
            )));
        }
        return Ok(());
    }

    if !booking.status.can_transition_to(next) {
        return Err(ClinicError::Validation(format!(
            "Booking {} cannot move from {} to {}",
            booking.booking_id, booking.status, next
        )));
    }
    Ok(())
}

fn self_detail() -> PatientDetail {
    PatientDetail::SelfBooking {
        note: SELF_NOTE.to_string(),
    }
}

pub struct BookingService<S: ?Sized> {
    store: Arc<S>,
    slots: SlotService<S>,
}

impl<S> BookingService<S>
where
    S: SlotStore + PatientStore + BookingStore + ?Sized,
{
    pub fn new(store: Arc<S>, schedule: SlotSchedule) -> Self {
        let slots = SlotService::new(Arc::clone(&store), schedule);
        Self { store, slots }
    }

    pub async fn book(&self, request: BookingRequest) -> ClinicResult<BookingConfirmation> {
        request.validate()?;

        // Every entry is classified and checked before anything is written.
        let mut classified = Vec::with_capacity(request.cart_items.len());
        for item in &request.cart_items {
            let mut entries = Vec::with_capacity(item.patients.len());
            for entry in &item.patients {
                let kind = classify_entry(entry)?;
                if let EntryKind::Patient(new_patient) = &kind {
                    new_patient.validate()?;
                }
                entries.push(kind);
            }
            classified.push(entries);
        }

        let booking_id = generate_booking_id(Utc::now());
        debug!(
            "Recording booking {} with {} cart items",
            booking_id,
            request.cart_items.len()
        );

        let mut saved_patients = Vec::new();
        let mut tests_booked = Vec::with_capacity(request.cart_items.len());

        for (item, entries) in request.cart_items.iter().zip(classified) {
            let mut details = Vec::new();

            if item.patients.is_empty() {
                details.push(self_detail());
            }

            for kind in entries {
                match kind {
                    EntryKind::SelfBooking => details.push(self_detail()),
                    EntryKind::Incomplete => {
                        debug!("Skipping incomplete patient entry for {}", item.name);
                    }
                    EntryKind::Patient(new_patient) => {
                        let patient = self.store.create_patient(new_patient).await?;
                        debug!("Saved patient {} ({})", patient.first_name, patient.id);

                        let saved = SavedPatient {
                            patient_id: patient.id,
                            patient_name: patient.first_name,
                            age: patient.age,
                            gender: patient.gender,
                        };
                        details.push(PatientDetail::Other(saved.clone()));
                        saved_patients.push(saved);
                    }
                }
            }

            tests_booked.push(TestBooked {
                test_name: item.name.clone(),
                price: item.price,
                patients_count: if item.patients.is_empty() { 1 } else { item.patients.len() },
                patient_details: details,
            });
        }

        let slot = self.resolve_slot(request.time_slot_id.as_deref()).await?;

        let booking_date = request
            .booking_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let new_booking = NewBooking {
            booking_id,
            patients: saved_patients.iter().map(|p| p.patient_id).collect(),
            tests: request.cart_items.iter().map(|item| item.name.clone()).collect(),
            total_amount: request.total_price,
            booking_date,
            time_slot: slot.as_ref().map(|slot| slot.id),
            preferred_time: request.preferred_time.clone(),
            notes: request.notes.clone(),
        };

        let booking = match self.store.insert_booking(new_booking).await {
            Ok(booking) => booking,
            Err(err) => {
                if let Some(slot) = &slot {
                    if let Err(release_err) = self.slots.release(slot.id).await {
                        error!(
                            "Failed to release seat in slot {} after booking error: {}",
                            slot.id, release_err
                        );
                    }
                }
                return Err(err);
            }
        };

        info!(
            "Booking {} recorded: {} patients, amount {}",
            booking.booking_id,
            saved_patients.len(),
            booking.total_amount
        );

        let time = match &slot {
            Some(slot) => slot.display_time(),
            None => request
                .preferred_time
                .clone()
                .unwrap_or_else(|| CUSTOM_TIME.to_string()),
        };

        Ok(BookingConfirmation {
            success: true,
            message: "Test booking successful!".to_string(),
            booking_id: booking.booking_id,
            total_patients_saved: saved_patients.len(),
            total_amount: booking.total_amount,
            booking_date: booking.booking_date,
            time_slot_info: TimeSlotInfo {
                id: booking.time_slot,
                time,
            },
            booking_details: BookingDetails { tests_booked },
            patients_saved: saved_patients,
        })
    }

    pub async fn get_booking(&self, booking_id: &str) -> ClinicResult<Booking> {
        self.store
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| ClinicError::NotFound(format!("Booking {} not found", booking_id)))
    }

    pub async fn list_bookings(&self) -> ClinicResult<Vec<Booking>> {
        self.store.list_bookings().await
    }

    /// Cancels the booking and gives its seat back to the slot.
    ///
    /// The seat is released only by the call whose own status update moved
    /// the booking to `cancelled`.
    pub async fn cancel(&self, booking_id: &str) -> ClinicResult<Booking> {
        let cancelled = self.transition(booking_id, BookingStatus::Cancelled).await?;

        if let Some(slot_id) = cancelled.time_slot {
            self.slots.release(slot_id).await?;
        }

        info!("Booking {} cancelled", booking_id);
        Ok(cancelled)
    }

    pub async fn update_status(&self, booking_id: &str, status: BookingStatus) -> ClinicResult<Booking> {
        if status == BookingStatus::Cancelled {
            return self.cancel(booking_id).await;
        }
        self.transition(booking_id, status).await
    }

    async fn transition(&self, booking_id: &str, status: BookingStatus) -> ClinicResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        check_transition(&booking, status)?;

        match self
            .store
            .set_booking_status(booking_id, booking.status, status)
            .await?
        {
            Some(updated) => Ok(updated),
            None => {
                // Lost a race with another status change; report against
                // the status that won.
                let current = self.get_booking(booking_id).await?;
                check_transition(&current, status)?;
                Err(ClinicError::Validation(format!(
                    "Booking {} changed while updating, retry",
                    booking_id
                )))
            }
        }
    }

    async fn resolve_slot(&self, time_slot_id: Option<&str>) -> ClinicResult<Option<TimeSlot>> {
        let Some(raw) = time_slot_id.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(None);
        };

        let Ok(slot_id) = Uuid::parse_str(raw) else {
            warn!("Ignoring malformed time slot id '{}'", raw);
            return Ok(None);
        };

        let slot = self.slots.reserve(slot_id).await?;
        if slot.is_none() {
            warn!("Time slot {} not found, booking without a slot", slot_id);
        }
        Ok(slot)
    }
}
