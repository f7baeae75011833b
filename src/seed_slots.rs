//! Pre-generates time slots for a range of dates.
//!
//! ```text
//! seed-slots [--start YYYY-MM-DD] [--days N]
//! ```
//!
//! Defaults to today and `CLINIC_SLOT_HORIZON_DAYS`. Dates that already hold
//! slots are left untouched, so the command can be re-run safely.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clinic_api::config::{parse_log_level, schedule_from_env};
use clinic_core::services::slots::SlotService;
use clinic_db::{PgStore, create_pool, schema::initialize_database};
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Default, PartialEq)]
struct SeedArgs {
    start: Option<NaiveDate>,
    days: Option<u32>,
}

fn parse_args<I>(args: I) -> Result<SeedArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = SeedArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--start" => {
                let value = args.next().ok_or_else(|| eyre!("--start needs a date"))?;
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .wrap_err_with(|| format!("Invalid --start date '{}'", value))?;
                parsed.start = Some(date);
            }
            "--days" => {
                let value = args.next().ok_or_else(|| eyre!("--days needs a number"))?;
                let days: u32 = value
                    .parse()
                    .wrap_err_with(|| format!("Invalid --days value '{}'", value))?;
                if days == 0 {
                    bail!("--days must be at least 1");
                }
                parsed.days = Some(days);
            }
            other => bail!("Unknown argument '{}'", other),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let level = parse_log_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = parse_args(std::env::args().skip(1))?;
    let schedule = schedule_from_env()?;
    let start = args.start.unwrap_or_else(|| Utc::now().date_naive());
    let days = args.days.unwrap_or(schedule.horizon_days);

    let database_url =
        std::env::var("DATABASE_URL").wrap_err("DATABASE_URL environment variable must be set")?;
    let db_pool = create_pool(&database_url).await?;
    initialize_database(&db_pool).await?;

    let slots = SlotService::new(Arc::new(PgStore::new(db_pool)), schedule);
    let summary = slots.generate_range(start, days).await?;

    info!(
        "Seeded {} slots: {} days processed, {} closed, {} already populated",
        summary.slots_created,
        summary.days_processed,
        summary.closed_days,
        summary.already_populated_days
    );

    Ok(())
}
