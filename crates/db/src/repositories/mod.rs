pub mod booking;
pub mod catalog;
pub mod patient;
pub mod time_slot;
