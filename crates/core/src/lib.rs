//! # Clinic Core
//!
//! Domain types and business rules for the clinic booking service: the slot
//! schedule, slot availability, booking records, patients and the catalog.
//!
//! Persistence is abstracted behind the traits in [`store`]; the services in
//! [`services`] are generic over them so the same rules run against
//! PostgreSQL in production and an in-memory store in tests.

pub mod errors;
pub mod models;
pub mod schedule;
pub mod services;
pub mod store;
