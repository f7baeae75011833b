//! Persistence for the clinic: a PostgreSQL store built on `sqlx` and an
//! in-memory store with the same semantics for tests and local tooling.

pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

pub use memory::InMemoryStore;
pub use store::PgStore;

pub type DbPool = Pool<Postgres>;

pub const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to the clinic database")?;

    info!("Connected to database with up to {} connections", MAX_CONNECTIONS);
    Ok(pool)
}
