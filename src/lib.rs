//! Daily Garmin training status to Notion sync.
//!
//! One run reads today's training status and readiness from Garmin Connect
//! and adds a row to a Notion database, unless a row for the same date and
//! status is already there.

pub mod config;
pub mod error;
pub mod garmin;
pub mod notion;
pub mod record;
pub mod status;

#[cfg(test)]
mod fakes;

use chrono::NaiveDate;

use config::StatsConfig;
use error::Result;
use garmin::client::GarminClient;
use garmin::FitnessClient;
use notion::client::NotionClient;
use notion::DocumentStore;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub date: NaiveDate,
    pub status: status::DailyStatus,
    pub inserted: bool,
}

/// Read `today` from `fitness` and record it in `store`.
pub async fn sync_day(
    fitness: &dyn FitnessClient,
    store: &dyn DocumentStore,
    config: &StatsConfig,
    today: NaiveDate,
) -> Result<SyncReport> {
    let daily = status::read_daily_status(fitness, today, &config.garmin.device).await?;
    let inserted =
        record::write_if_absent(store, &config.notion.database_id, today, &daily).await?;
    Ok(SyncReport {
        date: today,
        status: daily,
        inserted,
    })
}

/// Log in to Garmin, connect to Notion and sync `today`.
pub async fn run(config: &StatsConfig, today: NaiveDate) -> Result<SyncReport> {
    let garmin = GarminClient::login(&config.garmin, config.http_timeout).await?;
    let notion = NotionClient::new(&config.notion, config.http_timeout)?;
    sync_day(&garmin, &notion, config, today).await
}
