//! Status Reader: pulls today's training status and readiness from Garmin
//! and reduces them to the three values written to Notion.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::garmin::{DeviceSelector, FitnessClient};

/// The values recorded for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStatus {
    /// e.g. "Maintaining"
    pub status: String,
    /// Readiness score in text form, e.g. "7"
    pub score: String,
    /// e.g. "Low aerobic"
    pub description: String,
}

pub async fn read_daily_status(
    client: &dyn FitnessClient,
    today: NaiveDate,
    device: &DeviceSelector,
) -> Result<DailyStatus> {
    let status_payload = client.training_status(today).await?;
    let phrase = status_feedback_phrase(&status_payload, device)?;

    let readiness_payload = client.training_readiness(today).await?;
    let entry = first_readiness_entry(&readiness_payload)?;
    let score = readiness_score(entry)?;
    let feedback = readiness_feedback(entry)?;

    let daily = DailyStatus {
        status: status_text(phrase),
        score,
        description: description(feedback),
    };
    log::info!(
        "Garmin {}: status={} readiness={} ({})",
        today,
        daily.status,
        daily.score,
        daily.description
    );
    Ok(daily)
}

// ---------------------------------------------------------------------------
// Text transforms
// ---------------------------------------------------------------------------

/// First letter uppercased, the rest lowercased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// "MAINTAINING_load" -> "Maintaining"
pub fn status_text(phrase: &str) -> String {
    capitalize(phrase.split('_').next().unwrap_or_default())
}

/// "low_aerobic" -> "Low aerobic"
pub fn description(feedback_short: &str) -> String {
    capitalize(&feedback_short.replace('_', " "))
}

// ---------------------------------------------------------------------------
// Payload accessors
// ---------------------------------------------------------------------------

fn field<'a>(value: &'a Value, key: &str, path: &str) -> Result<&'a Value> {
    value
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| SyncError::missing(path))
}

/// `mostRecentTrainingStatus.latestTrainingStatusData.<device>.trainingStatusFeedbackPhrase`
pub fn status_feedback_phrase<'a>(
    payload: &'a Value,
    device: &DeviceSelector,
) -> Result<&'a str> {
    let recent = field(payload, "mostRecentTrainingStatus", "mostRecentTrainingStatus")?;
    let by_device = field(
        recent,
        "latestTrainingStatusData",
        "mostRecentTrainingStatus.latestTrainingStatusData",
    )?
    .as_object()
    .ok_or_else(|| SyncError::missing("mostRecentTrainingStatus.latestTrainingStatusData"))?;

    let (device_id, entry) = match device {
        DeviceSelector::Id(id) => by_device
            .get(id.as_str())
            .map(|entry| (id, entry))
            .ok_or_else(|| {
                SyncError::missing(format!(
                    "mostRecentTrainingStatus.latestTrainingStatusData.{}",
                    id
                ))
            })?,
        DeviceSelector::Primary => by_device
            .iter()
            .find(|(_, entry)| {
                entry
                    .get("primaryTrainingDevice")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .or_else(|| by_device.iter().next())
            .ok_or_else(|| {
                SyncError::missing("mostRecentTrainingStatus.latestTrainingStatusData.<device>")
            })?,
    };

    let path = format!(
        "mostRecentTrainingStatus.latestTrainingStatusData.{}.trainingStatusFeedbackPhrase",
        device_id
    );
    field(entry, "trainingStatusFeedbackPhrase", &path)?
        .as_str()
        .ok_or_else(|| SyncError::missing(path))
}

/// First element of the readiness list.
pub fn first_readiness_entry(payload: &Value) -> Result<&Value> {
    payload
        .as_array()
        .and_then(|entries| entries.first())
        .ok_or_else(|| SyncError::missing("trainingReadiness[0]"))
}

/// `score` as text; integers render without a fraction.
pub fn readiness_score(entry: &Value) -> Result<String> {
    match field(entry, "score", "trainingReadiness[0].score")? {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        _ => Err(SyncError::missing("trainingReadiness[0].score")),
    }
}

pub fn readiness_feedback(entry: &Value) -> Result<&str> {
    field(entry, "feedbackShort", "trainingReadiness[0].feedbackShort")?
        .as_str()
        .ok_or_else(|| SyncError::missing("trainingReadiness[0].feedbackShort"))
}
