use async_trait::async_trait;
use chrono::NaiveDate;
use clinic_core::{
    errors::ClinicResult,
    models::{
        patient::{NewPatient, Patient, PatientUpdate},
        time_slot::{NewTimeSlot, SeatReservation, TimeSlot},
    },
    store::{PatientStore, SlotStore},
};
use mockall::mock;
use uuid::Uuid;

// Mock stores for testing
mock! {
    pub SlotRepo {}

    #[async_trait]
    impl SlotStore for SlotRepo {
        async fn find_slots_by_date(&self, date: NaiveDate) -> ClinicResult<Vec<TimeSlot>>;

        async fn find_slot(&self, id: Uuid) -> ClinicResult<Option<TimeSlot>>;

        async fn insert_slot_if_absent(&self, slot: NewTimeSlot) -> ClinicResult<bool>;

        async fn reserve_seat(&self, id: Uuid) -> ClinicResult<SeatReservation>;

        async fn release_seat(&self, id: Uuid) -> ClinicResult<Option<TimeSlot>>;
    }
}

mock! {
    pub PatientRepo {}

    #[async_trait]
    impl PatientStore for PatientRepo {
        async fn create_patient(&self, patient: NewPatient) -> ClinicResult<Patient>;

        async fn find_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>>;

        async fn list_patients(&self) -> ClinicResult<Vec<Patient>>;

        async fn recent_patients(&self, limit: i64) -> ClinicResult<Vec<Patient>>;

        async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> ClinicResult<Option<Patient>>;

        async fn delete_patient(&self, id: Uuid) -> ClinicResult<bool>;

        async fn count_patients(&self) -> ClinicResult<i64>;
    }
}
