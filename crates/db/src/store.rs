//! PostgreSQL implementation of the clinic store traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use clinic_core::{
    errors::ClinicResult,
    models::{
        booking::{Booking, BookingStatus, NewBooking},
        catalog::{Consultation, LabTest, NewConsultation, NewLabTest},
        patient::{NewPatient, Patient, PatientUpdate},
        time_slot::{NewTimeSlot, SeatReservation, TimeSlot},
    },
    store::{BookingStore, CatalogStore, PatientStore, SlotStore},
};
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{booking, catalog, patient, time_slot},
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SlotStore for PgStore {
    async fn find_slots_by_date(&self, date: NaiveDate) -> ClinicResult<Vec<TimeSlot>> {
        let rows = time_slot::get_time_slots_by_date(&self.pool, date).await?;
        Ok(rows.into_iter().map(TimeSlot::from).collect())
    }

    async fn find_slot(&self, id: Uuid) -> ClinicResult<Option<TimeSlot>> {
        let row = time_slot::get_time_slot_by_id(&self.pool, id).await?;
        Ok(row.map(TimeSlot::from))
    }

    async fn insert_slot_if_absent(&self, slot: NewTimeSlot) -> ClinicResult<bool> {
        Ok(time_slot::insert_time_slot_if_absent(&self.pool, &slot).await?)
    }

    async fn reserve_seat(&self, id: Uuid) -> ClinicResult<SeatReservation> {
        if let Some(row) = time_slot::increment_booked_slots(&self.pool, id).await? {
            return Ok(SeatReservation::Reserved(row.into()));
        }

        // Nothing was incremented: the slot is missing, unlimited or full.
        let reservation = match self.find_slot(id).await? {
            None => SeatReservation::Missing,
            Some(slot) if slot.capacity().is_none() => SeatReservation::Reserved(slot),
            Some(slot) => SeatReservation::Full(slot),
        };
        Ok(reservation)
    }

    async fn release_seat(&self, id: Uuid) -> ClinicResult<Option<TimeSlot>> {
        match time_slot::decrement_booked_slots(&self.pool, id).await? {
            Some(row) => Ok(Some(row.into())),
            None => self.find_slot(id).await,
        }
    }
}

#[async_trait]
impl PatientStore for PgStore {
    async fn create_patient(&self, new_patient: NewPatient) -> ClinicResult<Patient> {
        patient::create_patient(&self.pool, &new_patient).await?.try_into()
    }

    async fn find_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>> {
        patient::get_patient_by_id(&self.pool, id)
            .await?
            .map(Patient::try_from)
            .transpose()
    }

    async fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        patient::list_patients(&self.pool)
            .await?
            .into_iter()
            .map(Patient::try_from)
            .collect()
    }

    async fn recent_patients(&self, limit: i64) -> ClinicResult<Vec<Patient>> {
        patient::list_recent_patients(&self.pool, limit)
            .await?
            .into_iter()
            .map(Patient::try_from)
            .collect()
    }

    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> ClinicResult<Option<Patient>> {
        patient::update_patient(&self.pool, id, &update)
            .await?
            .map(Patient::try_from)
            .transpose()
    }

    async fn delete_patient(&self, id: Uuid) -> ClinicResult<bool> {
        Ok(patient::delete_patient(&self.pool, id).await?)
    }

    async fn count_patients(&self) -> ClinicResult<i64> {
        Ok(patient::count_patients(&self.pool).await?)
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn insert_booking(&self, new_booking: NewBooking) -> ClinicResult<Booking> {
        booking::create_booking(&self.pool, &new_booking).await?.try_into()
    }

    async fn find_booking(&self, booking_id: &str) -> ClinicResult<Option<Booking>> {
        booking::get_booking_by_booking_id(&self.pool, booking_id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn list_bookings(&self) -> ClinicResult<Vec<Booking>> {
        booking::list_bookings(&self.pool)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn set_booking_status(
        &self,
        booking_id: &str,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> ClinicResult<Option<Booking>> {
        booking::update_booking_status(&self.pool, booking_id, expected, status)
            .await?
            .map(Booking::try_from)
            .transpose()
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn create_consultation(&self, consultation: NewConsultation) -> ClinicResult<Consultation> {
        Ok(catalog::create_consultation(&self.pool, &consultation).await?.into())
    }

    async fn list_consultations(&self) -> ClinicResult<Vec<Consultation>> {
        let rows = catalog::list_consultations(&self.pool).await?;
        Ok(rows.into_iter().map(Consultation::from).collect())
    }

    async fn count_consultations(&self) -> ClinicResult<i64> {
        Ok(catalog::count_consultations(&self.pool).await?)
    }

    async fn create_lab_test(&self, test: NewLabTest) -> ClinicResult<LabTest> {
        Ok(catalog::create_lab_test(&self.pool, &test).await?.into())
    }

    async fn list_lab_tests(&self) -> ClinicResult<Vec<LabTest>> {
        let rows = catalog::list_lab_tests(&self.pool).await?;
        Ok(rows.into_iter().map(LabTest::from).collect())
    }

    async fn count_lab_tests(&self) -> ClinicResult<i64> {
        Ok(catalog::count_lab_tests(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::create_test_pool;
    use chrono::NaiveTime;

    fn slot_on(date: NaiveDate, max_patients: i32) -> NewTimeSlot {
        NewTimeSlot {
            date,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            max_patients: Some(max_patients),
            unlimited_patients: false,
        }
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database at TEST_DATABASE_URL"]
    async fn test_conditional_reserve_stops_at_capacity() {
        let store = PgStore::new(create_test_pool().await);
        // Far-future date so reruns do not collide with real data
        let date = NaiveDate::from_ymd_opt(2999, 1, 4).unwrap();
        store.insert_slot_if_absent(slot_on(date, 2)).await.unwrap();
        let slot = store.find_slots_by_date(date).await.unwrap().remove(0);

        // Reset the counter left over from previous runs
        while store.release_seat(slot.id).await.unwrap().unwrap().booked_slots > 0 {}

        assert!(matches!(store.reserve_seat(slot.id).await.unwrap(), SeatReservation::Reserved(_)));
        assert!(matches!(store.reserve_seat(slot.id).await.unwrap(), SeatReservation::Reserved(_)));
        assert!(matches!(store.reserve_seat(slot.id).await.unwrap(), SeatReservation::Full(_)));
        assert_eq!(store.reserve_seat(Uuid::new_v4()).await.unwrap(), SeatReservation::Missing);
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database at TEST_DATABASE_URL"]
    async fn test_insert_slot_if_absent_is_idempotent() {
        let store = PgStore::new(create_test_pool().await);
        let date = NaiveDate::from_ymd_opt(2999, 1, 5).unwrap();

        store.insert_slot_if_absent(slot_on(date, 10)).await.unwrap();
        assert!(!store.insert_slot_if_absent(slot_on(date, 10)).await.unwrap());
        assert_eq!(store.find_slots_by_date(date).await.unwrap().len(), 1);
    }
}
