use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use clinic_core::{
    errors::ClinicError,
    models::time_slot::{CreateTimeSlotRequest, GenerationSummary, TimeSlot},
    schedule::SlotSchedule,
    services::slots::SlotService,
};
use clinic_db::{InMemoryStore, mock::repositories::MockSlotRepo};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn service() -> (Arc<InMemoryStore>, SlotService<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let service = SlotService::new(Arc::clone(&store), SlotSchedule::default());
    (store, service)
}

fn unlimited_slot(on: NaiveDate) -> TimeSlot {
    TimeSlot {
        id: Uuid::new_v4(),
        date: on,
        start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        max_patients: None,
        unlimited_patients: true,
        booked_slots: 0,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_generate_for_monday() {
    let (_, slots) = service();

    let generated = slots.generate_for_date(date(2024, 6, 10)).await.unwrap();

    assert_eq!(generated.len(), 8);
    assert!(generated.iter().all(|s| s.is_available() && s.available_slots() == Some(10)));
    assert_eq!(generated[0].display_time(), "08:00 - 09:00");
    assert_eq!(generated[7].display_time(), "17:00 - 18:00");
}

#[tokio::test]
async fn test_generate_for_sunday_is_empty() {
    let (store, slots) = service();

    let generated = slots.generate_for_date(date(2024, 6, 9)).await.unwrap();

    assert!(generated.is_empty());
    assert_eq!(store.slot_count().unwrap(), 0);
}

#[tokio::test]
async fn test_generation_is_idempotent() {
    let (store, slots) = service();
    let monday = date(2024, 6, 10);

    let first = slots.generate_for_date(monday).await.unwrap();
    let second = slots.generate_for_date(monday).await.unwrap();

    assert_eq!(store.slot_count().unwrap(), 8);
    assert_eq!(
        first.iter().map(|s| s.id).collect::<Vec<_>>(),
        second.iter().map(|s| s.id).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_list_slots_generates_lazily() {
    let (store, slots) = service();

    let listed = slots.list_slots(date(2024, 6, 10)).await.unwrap();

    assert_eq!(listed.len(), 8);
    assert_eq!(store.slot_count().unwrap(), 8);
    assert!(listed.windows(2).all(|pair| pair[0].start_time < pair[1].start_time));
}

#[tokio::test]
async fn test_full_slot_disappears_from_listing() {
    let (_, slots) = service();
    let monday = date(2024, 6, 10);
    let first = slots.list_slots(monday).await.unwrap()[0].clone();

    for _ in 0..10 {
        slots.reserve(first.id).await.unwrap();
    }

    let listed = slots.list_slots(monday).await.unwrap();
    assert_eq!(listed.len(), 7);
    assert!(listed.iter().all(|s| s.id != first.id));
}

#[tokio::test]
async fn test_eleventh_reservation_is_rejected() {
    let (_, slots) = service();
    let slot = slots.generate_for_date(date(2024, 6, 10)).await.unwrap()[0].clone();

    let mut last = None;
    for _ in 0..10 {
        last = slots.reserve(slot.id).await.unwrap();
    }
    let last = last.unwrap();
    assert_eq!(last.booked_slots, 10);
    assert_eq!(last.available_slots(), Some(0));
    assert!(!last.is_available());

    let err = slots.reserve(slot.id).await.unwrap_err();
    assert!(matches!(err, ClinicError::SlotFull(_)));
}

#[tokio::test]
async fn test_unlimited_slot_never_fills() {
    let (store, slots) = service();
    let slot = unlimited_slot(date(2024, 6, 10));
    store.put_slot(slot.clone()).unwrap();

    for _ in 0..25 {
        let reserved = slots.reserve(slot.id).await.unwrap().unwrap();
        assert!(reserved.is_available());
        assert_eq!(reserved.available_slots(), None);
    }
}

#[tokio::test]
async fn test_reserve_missing_slot_returns_none() {
    let (_, slots) = service();
    assert_eq!(slots.reserve(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_release_restores_one_seat() {
    let (_, slots) = service();
    let slot = slots.generate_for_date(date(2024, 6, 10)).await.unwrap()[0].clone();

    slots.reserve(slot.id).await.unwrap();
    slots.reserve(slot.id).await.unwrap();
    let released = slots.release(slot.id).await.unwrap().unwrap();

    assert_eq!(released.booked_slots, 1);
}

#[tokio::test]
async fn test_release_never_goes_negative() {
    let (_, slots) = service();
    let slot = slots.generate_for_date(date(2024, 6, 10)).await.unwrap()[0].clone();

    let released = slots.release(slot.id).await.unwrap().unwrap();

    assert_eq!(released.booked_slots, 0);
    assert_eq!(slots.release(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_generate_range_over_a_week() {
    let (store, slots) = service();

    // Monday 2024-06-10 through Sunday 2024-06-16
    let summary = slots.generate_range(date(2024, 6, 10), 7).await.unwrap();

    assert_eq!(
        summary,
        GenerationSummary {
            start_date: Some(date(2024, 6, 10)),
            days_processed: 7,
            slots_created: 48,
            closed_days: 1,
            already_populated_days: 0,
        }
    );
    assert_eq!(store.slot_count().unwrap(), 48);
}

#[tokio::test]
async fn test_generate_range_skips_populated_days() {
    let (_, slots) = service();
    slots.generate_for_date(date(2024, 6, 11)).await.unwrap();

    let summary = slots.generate_range(date(2024, 6, 10), 3).await.unwrap();

    assert_eq!(summary.slots_created, 16);
    assert_eq!(summary.already_populated_days, 1);
    assert_eq!(summary.closed_days, 0);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let mut repo = MockSlotRepo::new();
    repo.expect_find_slots_by_date()
        .returning(|_| Err(ClinicError::Store(eyre::eyre!("connection refused"))));
    let slots = SlotService::new(Arc::new(repo), SlotSchedule::default());

    let err = slots.list_slots(date(2024, 6, 10)).await.unwrap_err();

    assert!(matches!(err, ClinicError::Store(_)));
}

#[tokio::test]
async fn test_existing_keys_are_not_counted_as_created() {
    let mut repo = MockSlotRepo::new();
    repo.expect_insert_slot_if_absent()
        .times(8)
        .returning(|slot| Ok(slot.start_time.format("%H").to_string() != "08"));
    repo.expect_find_slots_by_date().returning(|_| Ok(Vec::new()));
    let slots = SlotService::new(Arc::new(repo), SlotSchedule::default());

    let summary = slots.generate_range(date(2024, 6, 10), 1).await.unwrap();

    assert_eq!(summary.slots_created, 7);
}

fn custom(on: NaiveDate, start: &str, end: &str, max: Option<i32>, unlimited: bool) -> CreateTimeSlotRequest {
    CreateTimeSlotRequest {
        date: on,
        start_time: start.to_string(),
        end_time: end.to_string(),
        max_patients: max,
        unlimited_patients: unlimited,
    }
}

#[tokio::test]
async fn test_create_slot_keeps_template_day() {
    let (store, slots) = service();
    let monday = date(2024, 6, 10);

    let slot = slots
        .create_slot(custom(monday, "18:00", "19:00", Some(3), false).into_new_slot().unwrap())
        .await
        .unwrap();

    assert_eq!(slot.max_patients, Some(3));
    assert_eq!(slot.display_time(), "18:00 - 19:00");
    assert_eq!(store.slot_count().unwrap(), 9);
    assert_eq!(slots.list_slots(monday).await.unwrap().len(), 9);
}

#[tokio::test]
async fn test_create_slot_on_closed_day() {
    let (store, slots) = service();
    let sunday = date(2024, 6, 9);

    let slot = slots
        .create_slot(custom(sunday, "10:00", "12:00", None, true).into_new_slot().unwrap())
        .await
        .unwrap();

    assert!(slot.unlimited_patients);
    assert_eq!(slot.capacity(), None);
    assert_eq!(store.slot_count().unwrap(), 1);
}

#[tokio::test]
async fn test_create_slot_duplicate_key_conflicts() {
    let (store, slots) = service();
    let sunday = date(2024, 6, 9);
    let request = custom(sunday, "10:00", "12:00", None, false);

    let first = slots.create_slot(request.clone().into_new_slot().unwrap()).await.unwrap();
    assert_eq!(first.max_patients, Some(10));

    let err = slots
        .create_slot(request.into_new_slot().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClinicError::Conflict(_)));
    assert_eq!(store.slot_count().unwrap(), 1);
}

#[test]
fn test_custom_slot_request_validation() {
    let monday = date(2024, 6, 10);

    assert!(custom(monday, "19:00", "18:00", None, false).into_new_slot().is_err());
    assert!(custom(monday, "18:00", "18:00", None, false).into_new_slot().is_err());
    assert!(custom(monday, "6pm", "19:00", None, false).into_new_slot().is_err());
    assert!(custom(monday, "18:00", "19:00", Some(0), false).into_new_slot().is_err());
    assert!(custom(monday, "18:00", "19:00", Some(0), true).into_new_slot().is_ok());
}
