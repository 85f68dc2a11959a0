//! Garmin Connect integration.
//!
//! Reads the daily training status and training readiness metrics. The
//! payloads are loosely structured, so they are handed back as raw JSON and
//! picked apart by the accessors in `status.rs`.

pub mod client;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;

/// Garmin account settings.
#[derive(Clone)]
pub struct GarminConfig {
    pub email: String,
    pub password: String,
    pub device: DeviceSelector,
}

impl fmt::Debug for GarminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GarminConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("device", &self.device)
            .finish()
    }
}

/// Which device entry of the training status payload to read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceSelector {
    /// The entry flagged `primaryTrainingDevice`, else the first one.
    #[default]
    Primary,
    Id(String),
}

/// Read access to the fitness-tracking service.
#[async_trait]
pub trait FitnessClient: Send + Sync {
    /// Aggregated training status for `date`.
    async fn training_status(&self, date: NaiveDate) -> Result<serde_json::Value>;

    /// Training readiness for `date`; a JSON list, newest first.
    async fn training_readiness(&self, date: NaiveDate) -> Result<serde_json::Value>;
}
