//! Persistence seams.
//!
//! Each trait covers one collection of the clinic's document store. Writes
//! that touch capacity (`reserve_seat`, `release_seat`) must be a single
//! atomic operation in the implementation so concurrent bookings can never
//! push a slot past its capacity.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::ClinicResult,
    models::{
        booking::{Booking, BookingStatus, NewBooking},
        catalog::{Consultation, LabTest, NewConsultation, NewLabTest},
        patient::{NewPatient, Patient, PatientUpdate},
        time_slot::{NewTimeSlot, SeatReservation, TimeSlot},
    },
};

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// All slots of a day, ordered by start time.
    async fn find_slots_by_date(&self, date: NaiveDate) -> ClinicResult<Vec<TimeSlot>>;

    async fn find_slot(&self, id: Uuid) -> ClinicResult<Option<TimeSlot>>;

    /// Inserts the slot unless one with the same (date, start, end) exists.
    /// Returns `true` when a row was written.
    async fn insert_slot_if_absent(&self, slot: NewTimeSlot) -> ClinicResult<bool>;

    /// Takes one seat if the slot has capacity left. Unlimited slots are
    /// returned unchanged as `Reserved`.
    async fn reserve_seat(&self, id: Uuid) -> ClinicResult<SeatReservation>;

    /// Gives back one seat of a bounded slot. `None` if the slot is gone.
    async fn release_seat(&self, id: Uuid) -> ClinicResult<Option<TimeSlot>>;
}

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn create_patient(&self, patient: NewPatient) -> ClinicResult<Patient>;

    async fn find_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>>;

    /// Ordered by first name.
    async fn list_patients(&self) -> ClinicResult<Vec<Patient>>;

    /// Newest first.
    async fn recent_patients(&self, limit: i64) -> ClinicResult<Vec<Patient>>;

    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> ClinicResult<Option<Patient>>;

    /// Returns `false` when no patient had that id.
    async fn delete_patient(&self, id: Uuid) -> ClinicResult<bool>;

    async fn count_patients(&self) -> ClinicResult<i64>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, booking: NewBooking) -> ClinicResult<Booking>;

    async fn find_booking(&self, booking_id: &str) -> ClinicResult<Option<Booking>>;

    /// Newest first.
    async fn list_bookings(&self) -> ClinicResult<Vec<Booking>>;

    /// Moves the booking from `expected` to `status` in one atomic step.
    /// `None` when no booking has that id or its status is no longer
    /// `expected`.
    async fn set_booking_status(
        &self,
        booking_id: &str,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> ClinicResult<Option<Booking>>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_consultation(&self, consultation: NewConsultation) -> ClinicResult<Consultation>;

    async fn list_consultations(&self) -> ClinicResult<Vec<Consultation>>;

    async fn count_consultations(&self) -> ClinicResult<i64>;

    async fn create_lab_test(&self, test: NewLabTest) -> ClinicResult<LabTest>;

    async fn list_lab_tests(&self) -> ClinicResult<Vec<LabTest>>;

    async fn count_lab_tests(&self) -> ClinicResult<i64>;
}

/// Every collection the API needs, as one object.
pub trait ClinicStore: SlotStore + PatientStore + BookingStore + CatalogStore {}

impl<T> ClinicStore for T where T: SlotStore + PatientStore + BookingStore + CatalogStore {}
