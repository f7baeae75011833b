//! Slot generation and availability tracking.
//!
//! Slots are created lazily the first time a day is listed, or ahead of
//! time with [`SlotService::generate_range`]. Capacity only changes through
//! [`SlotService::reserve`] and [`SlotService::release`], both of which
//! delegate to a single atomic store operation.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use eyre::eyre;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    errors::{ClinicError, ClinicResult},
    models::time_slot::{GenerationSummary, NewTimeSlot, SeatReservation, TIME_FORMAT, TimeSlot},
    schedule::SlotSchedule,
    store::SlotStore,
};

pub struct SlotService<S: ?Sized> {
    store: Arc<S>,
    schedule: SlotSchedule,
}

impl<S: ?Sized> Clone for SlotService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            schedule: self.schedule.clone(),
        }
    }
}

impl<S> SlotService<S>
where
    S: SlotStore + ?Sized,
{
    pub fn new(store: Arc<S>, schedule: SlotSchedule) -> Self {
        Self { store, schedule }
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }

    /// Persists the day's template slots that do not exist yet and returns
    /// every slot of that day. Calling it again creates nothing.
    pub async fn generate_for_date(&self, date: NaiveDate) -> ClinicResult<Vec<TimeSlot>> {
        let created = self.fill_day(date).await?;
        if created > 0 {
            info!("Created {} time slots for {}", created, date);
        }
        self.store.find_slots_by_date(date).await
    }

    /// Generates slots for `days` consecutive dates starting at `start`.
    ///
    /// Days that already hold slots are left untouched.
    pub async fn generate_range(&self, start: NaiveDate, days: u32) -> ClinicResult<GenerationSummary> {
        let mut summary = GenerationSummary {
            start_date: Some(start),
            ..GenerationSummary::default()
        };

        for offset in 0..days {
            let date = start
                .checked_add_days(Days::new(u64::from(offset)))
                .ok_or_else(|| ClinicError::Validation(format!("Date out of range after {}", start)))?;
            summary.days_processed += 1;

            if !self.schedule.is_open(date) {
                debug!("Skipping closed day {}", date);
                summary.closed_days += 1;
                continue;
            }

            if !self.store.find_slots_by_date(date).await?.is_empty() {
                debug!("Slots already exist for {}", date);
                summary.already_populated_days += 1;
                continue;
            }

            summary.slots_created += self.fill_day(date).await?;
        }

        info!(
            "Generated {} time slots over {} days from {}",
            summary.slots_created, summary.days_processed, start
        );
        Ok(summary)
    }

    /// Adds a single slot outside the template, with its own capacity.
    ///
    /// On an open day the template slots are written first, so a custom
    /// slot never stops the day from being generated. A slot with the same
    /// (date, start, end) key is a [`ClinicError::Conflict`].
    pub async fn create_slot(&self, slot: NewTimeSlot) -> ClinicResult<TimeSlot> {
        slot.validate()?;
        let key = slot.key();
        let slot_label = format!(
            "{} {} - {}",
            slot.date,
            slot.start_time.format(TIME_FORMAT),
            slot.end_time.format(TIME_FORMAT)
        );

        self.fill_day(slot.date).await?;
        if !self.store.insert_slot_if_absent(slot).await? {
            return Err(ClinicError::Conflict(format!(
                "A time slot already exists for {}",
                slot_label
            )));
        }

        let created = self
            .store
            .find_slots_by_date(key.0)
            .await?
            .into_iter()
            .find(|existing| (existing.date, existing.start_time, existing.end_time) == key)
            .ok_or_else(|| ClinicError::Store(eyre!("time slot {} missing after insert", slot_label)))?;

        info!("Created custom time slot {} ({})", created.id, slot_label);
        Ok(created)
    }

    /// Bookable slots of a day in start-time order, creating the day's
    /// slots first if none exist.
    pub async fn list_slots(&self, date: NaiveDate) -> ClinicResult<Vec<TimeSlot>> {
        let mut slots = self.store.find_slots_by_date(date).await?;
        if slots.is_empty() {
            debug!("No slots on record for {}, generating", date);
            slots = self.generate_for_date(date).await?;
        }

        slots.retain(TimeSlot::is_available);
        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }

    /// Takes one seat in the slot.
    ///
    /// Returns `Ok(None)` if the slot does not exist and
    /// [`ClinicError::SlotFull`] if it has no capacity left.
    pub async fn reserve(&self, slot_id: Uuid) -> ClinicResult<Option<TimeSlot>> {
        match self.store.reserve_seat(slot_id).await? {
            SeatReservation::Reserved(slot) => {
                debug!(
                    "Reserved seat in slot {} ({} booked)",
                    slot.id, slot.booked_slots
                );
                Ok(Some(slot))
            }
            SeatReservation::Full(slot) => {
                warn!("Slot {} on {} is full", slot.id, slot.date);
                Err(ClinicError::SlotFull(format!(
                    "Time slot {} on {} has no capacity left",
                    slot.display_time(),
                    slot.date
                )))
            }
            SeatReservation::Missing => Ok(None),
        }
    }

    /// Returns a seat to the slot. Missing slots are ignored.
    pub async fn release(&self, slot_id: Uuid) -> ClinicResult<Option<TimeSlot>> {
        let slot = self.store.release_seat(slot_id).await?;
        if slot.is_none() {
            warn!("Cannot release seat: slot {} no longer exists", slot_id);
        }
        Ok(slot)
    }

    async fn fill_day(&self, date: NaiveDate) -> ClinicResult<u32> {
        let mut created = 0;
        for slot in self.schedule.slots_for(date) {
            if self.store.insert_slot_if_absent(slot).await? {
                created += 1;
            }
        }
        Ok(created)
    }
}
