//! A process-local store with the same semantics as [`crate::store::PgStore`].
//!
//! Every operation runs under one mutex, so the capacity check and the
//! counter update of `reserve_seat` are atomic just like the conditional
//! `UPDATE` used against PostgreSQL.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clinic_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        booking::{Booking, BookingStatus, NewBooking},
        catalog::{Consultation, LabTest, NewConsultation, NewLabTest},
        patient::{NewPatient, Patient, PatientUpdate},
        time_slot::{NewTimeSlot, SeatReservation, TimeSlot},
    },
    store::{BookingStore, CatalogStore, PatientStore, SlotStore},
};
use eyre::eyre;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    slots: Vec<TimeSlot>,
    patients: Vec<Patient>,
    bookings: Vec<Booking>,
    consultations: Vec<Consultation>,
    lab_tests: Vec<LabTest>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a slot as-is, bypassing the template. Useful for seeding
    /// unlimited or partially booked slots.
    pub fn put_slot(&self, slot: TimeSlot) -> ClinicResult<()> {
        let mut state = self.state()?;
        state.slots.retain(|existing| existing.id != slot.id);
        state.slots.push(slot);
        Ok(())
    }

    pub fn slot_count(&self) -> ClinicResult<usize> {
        Ok(self.state()?.slots.len())
    }

    fn state(&self) -> ClinicResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| ClinicError::Store(eyre!("in-memory store lock poisoned")))
    }
}

#[async_trait]
impl SlotStore for InMemoryStore {
    async fn find_slots_by_date(&self, date: NaiveDate) -> ClinicResult<Vec<TimeSlot>> {
        let state = self.state()?;
        let mut slots: Vec<TimeSlot> = state
            .slots
            .iter()
            .filter(|slot| slot.date == date)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }

    async fn find_slot(&self, id: Uuid) -> ClinicResult<Option<TimeSlot>> {
        let state = self.state()?;
        Ok(state.slots.iter().find(|slot| slot.id == id).cloned())
    }

    async fn insert_slot_if_absent(&self, slot: NewTimeSlot) -> ClinicResult<bool> {
        let mut state = self.state()?;
        let key = slot.key();
        if state
            .slots
            .iter()
            .any(|existing| (existing.date, existing.start_time, existing.end_time) == key)
        {
            return Ok(false);
        }

        state.slots.push(TimeSlot {
            id: Uuid::new_v4(),
            date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            max_patients: slot.max_patients,
            unlimited_patients: slot.unlimited_patients,
            booked_slots: 0,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn reserve_seat(&self, id: Uuid) -> ClinicResult<SeatReservation> {
        let mut state = self.state()?;
        let Some(slot) = state.slots.iter_mut().find(|slot| slot.id == id) else {
            return Ok(SeatReservation::Missing);
        };

        match slot.capacity() {
            None => Ok(SeatReservation::Reserved(slot.clone())),
            Some(max) if slot.booked_slots >= max => Ok(SeatReservation::Full(slot.clone())),
            Some(_) => {
                slot.booked_slots += 1;
                Ok(SeatReservation::Reserved(slot.clone()))
            }
        }
    }

    async fn release_seat(&self, id: Uuid) -> ClinicResult<Option<TimeSlot>> {
        let mut state = self.state()?;
        let Some(slot) = state.slots.iter_mut().find(|slot| slot.id == id) else {
            return Ok(None);
        };

        if !slot.unlimited_patients && slot.booked_slots > 0 {
            slot.booked_slots -= 1;
        }
        Ok(Some(slot.clone()))
    }
}

#[async_trait]
impl PatientStore for InMemoryStore {
    async fn create_patient(&self, patient: NewPatient) -> ClinicResult<Patient> {
        let mut state = self.state()?;
        let patient = Patient {
            id: Uuid::new_v4(),
            user_id: patient.user_id,
            first_name: patient.first_name,
            age: patient.age,
            gender: patient.gender,
            phone_number: patient.phone_number,
            email: patient.email,
            prescription_file: patient.prescription_file,
            prescription_filename: patient.prescription_filename,
            created_at: Utc::now(),
        };
        state.patients.push(patient.clone());
        Ok(patient)
    }

    async fn find_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>> {
        let state = self.state()?;
        Ok(state.patients.iter().find(|p| p.id == id).cloned())
    }

    async fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        let mut patients = self.state()?.patients.clone();
        patients.sort_by(|a, b| a.first_name.cmp(&b.first_name));
        Ok(patients)
    }

    async fn recent_patients(&self, limit: i64) -> ClinicResult<Vec<Patient>> {
        let state = self.state()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state.patients.iter().rev().take(limit).cloned().collect())
    }

    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> ClinicResult<Option<Patient>> {
        let mut state = self.state()?;
        let Some(patient) = state.patients.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        update.apply(patient);
        Ok(Some(patient.clone()))
    }

    async fn delete_patient(&self, id: Uuid) -> ClinicResult<bool> {
        let mut state = self.state()?;
        let before = state.patients.len();
        state.patients.retain(|p| p.id != id);
        Ok(state.patients.len() < before)
    }

    async fn count_patients(&self) -> ClinicResult<i64> {
        Ok(self.state()?.patients.len() as i64)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn insert_booking(&self, booking: NewBooking) -> ClinicResult<Booking> {
        let mut state = self.state()?;
        if state.bookings.iter().any(|b| b.booking_id == booking.booking_id) {
            return Err(ClinicError::Store(eyre!(
                "duplicate booking_id {}",
                booking.booking_id
            )));
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            booking_id: booking.booking_id,
            patients: booking.patients,
            tests: booking.tests,
            total_amount: booking.total_amount,
            booking_date: booking.booking_date,
            time_slot: booking.time_slot,
            preferred_time: booking.preferred_time,
            status: BookingStatus::Pending,
            notes: booking.notes,
            created_at: now,
            updated_at: now,
        };
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, booking_id: &str) -> ClinicResult<Option<Booking>> {
        let state = self.state()?;
        Ok(state
            .bookings
            .iter()
            .find(|b| b.booking_id == booking_id)
            .cloned())
    }

    async fn list_bookings(&self) -> ClinicResult<Vec<Booking>> {
        let state = self.state()?;
        Ok(state.bookings.iter().rev().cloned().collect())
    }

    async fn set_booking_status(
        &self,
        booking_id: &str,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> ClinicResult<Option<Booking>> {
        let mut state = self.state()?;
        let Some(booking) = state
            .bookings
            .iter_mut()
            .find(|b| b.booking_id == booking_id && b.status == expected)
        else {
            return Ok(None);
        };
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(Some(booking.clone()))
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn create_consultation(&self, consultation: NewConsultation) -> ClinicResult<Consultation> {
        let mut state = self.state()?;
        let consultation = Consultation {
            id: Uuid::new_v4(),
            docname: consultation.docname,
            specialization: consultation.specialization,
            price: consultation.price,
            created_at: Utc::now(),
        };
        state.consultations.push(consultation.clone());
        Ok(consultation)
    }

    async fn list_consultations(&self) -> ClinicResult<Vec<Consultation>> {
        let mut consultations = self.state()?.consultations.clone();
        consultations.sort_by(|a, b| a.docname.cmp(&b.docname));
        Ok(consultations)
    }

    async fn count_consultations(&self) -> ClinicResult<i64> {
        Ok(self.state()?.consultations.len() as i64)
    }

    async fn create_lab_test(&self, test: NewLabTest) -> ClinicResult<LabTest> {
        let mut state = self.state()?;
        let test = LabTest {
            id: Uuid::new_v4(),
            name: test.name,
            description: test.description,
            price: test.price,
            created_at: Utc::now(),
        };
        state.lab_tests.push(test.clone());
        Ok(test)
    }

    async fn list_lab_tests(&self) -> ClinicResult<Vec<LabTest>> {
        let mut tests = self.state()?.lab_tests.clone();
        tests.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tests)
    }

    async fn count_lab_tests(&self) -> ClinicResult<i64> {
        Ok(self.state()?.lab_tests.len() as i64)
    }
}
