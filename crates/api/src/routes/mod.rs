pub mod booking;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod patients;
pub mod slots;
