//! Business operations over the store traits.

pub mod booking;
pub mod catalog;
pub mod patients;
pub mod slots;
