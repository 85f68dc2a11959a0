//! Run configuration, read once from the process environment.
//!
//! An optional `.env` in the working directory is loaded first; variables
//! already set in the environment win over the file.

use std::time::Duration;

use crate::error::{Result, SyncError};
use crate::garmin::{DeviceSelector, GarminConfig};
use crate::notion::NotionConfig;

pub const GARMIN_EMAIL: &str = "GARMIN_EMAIL";
pub const GARMIN_PASSWORD: &str = "GARMIN_PASSWORD";
pub const GARMIN_DEVICE_ID: &str = "GARMIN_DEVICE_ID";
pub const NOTION_TOKEN: &str = "NOTION_TOKEN";
pub const NOTION_STATS_DB_ID: &str = "NOTION_STATS_DB_ID";
pub const HTTP_TIMEOUT_SECS: &str = "DAILY_STATS_HTTP_TIMEOUT_SECS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub garmin: GarminConfig,
    pub notion: NotionConfig,
    pub http_timeout: Duration,
}

impl StatsConfig {
    /// Load from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenv::dotenv() {
            Ok(path) => log::debug!("Loaded environment overrides from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(SyncError::Config(format!("Failed to read .env: {}", e))),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                SyncError::Config(format!("Required environment variable {} is not set", key))
            })
        };

        let email = require(GARMIN_EMAIL)?;
        let password = require(GARMIN_PASSWORD)?;
        let token = require(NOTION_TOKEN)?;
        let database_id = require(NOTION_STATS_DB_ID)?;

        let device = match get(GARMIN_DEVICE_ID) {
            Some(id) => DeviceSelector::Id(id),
            None => DeviceSelector::Primary,
        };

        let timeout_secs = match get(HTTP_TIMEOUT_SECS) {
            None => DEFAULT_HTTP_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(SyncError::Config(format!(
                        "{} must be a positive number of seconds, got '{}'",
                        HTTP_TIMEOUT_SECS, raw
                    )))
                }
            },
        };

        Ok(Self {
            garmin: GarminConfig {
                email,
                password,
                device,
            },
            notion: NotionConfig { token, database_id },
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            (GARMIN_EMAIL, "runner@example.com"),
            (GARMIN_PASSWORD, "hunter2"),
            (NOTION_TOKEN, "secret_abc"),
            (NOTION_STATS_DB_ID, "db-123"),
        ])
    }

    #[test]
    fn test_loads_required_with_defaults() {
        let vars = full_env();
        let config = StatsConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.garmin.email, "runner@example.com");
        assert_eq!(config.garmin.password, "hunter2");
        assert_eq!(config.garmin.device, DeviceSelector::Primary);
        assert_eq!(config.notion.token, "secret_abc");
        assert_eq!(config.notion.database_id, "db-123");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_required_names_variable() {
        for key in [GARMIN_EMAIL, GARMIN_PASSWORD, NOTION_TOKEN, NOTION_STATS_DB_ID] {
            let mut vars = full_env();
            vars.remove(key);
            let err = StatsConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
            match err {
                SyncError::Config(msg) => assert!(msg.contains(key), "{msg}"),
                other => panic!("expected config error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut vars = full_env();
        vars.insert(NOTION_TOKEN.to_string(), "   ".to_string());
        let err = StatsConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = full_env();
        vars.insert(GARMIN_DEVICE_ID.to_string(), "3485195778".to_string());
        vars.insert(HTTP_TIMEOUT_SECS.to_string(), "5".to_string());
        let config = StatsConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(
            config.garmin.device,
            DeviceSelector::Id("3485195778".to_string())
        );
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        for bad in ["0", "-1", "soon"] {
            let mut vars = full_env();
            vars.insert(HTTP_TIMEOUT_SECS.to_string(), bad.to_string());
            let err = StatsConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
            assert!(matches!(err, SyncError::Config(_)), "{bad}");
        }
    }
}
