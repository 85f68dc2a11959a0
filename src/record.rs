//! Record Writer: adds the day's row to the Notion stats database unless a
//! row for the same date and status is already there.
//!
//! The existence check matches on date and status only. A re-run on the
//! same day with a changed score is skipped, not updated.

use chrono::NaiveDate;

use crate::error::Result;
use crate::notion::{Condition, DocumentStore, Properties, PropertyValue, RowFilter};
use crate::status::DailyStatus;

pub const TRAINING_STATUS: &str = "Training Status";
pub const TODAYS_DATE: &str = "Today's Date";
pub const READINESS_SCORE: &str = "Readiness Score";
pub const READINESS_DESCRIPTION: &str = "Readiness Description";

/// Rows for `date` whose title equals `status`.
pub fn existing_row_filter(date: NaiveDate, status: &str) -> RowFilter {
    RowFilter::And(vec![
        RowFilter::property(TODAYS_DATE, Condition::DateEquals(date)),
        RowFilter::property(TRAINING_STATUS, Condition::TitleEquals(status.to_string())),
    ])
}

pub fn row_properties(date: NaiveDate, daily: &DailyStatus) -> Properties {
    vec![
        (
            TRAINING_STATUS.to_string(),
            PropertyValue::Title(daily.status.clone()),
        ),
        (TODAYS_DATE.to_string(), PropertyValue::Date(date)),
        (
            READINESS_SCORE.to_string(),
            PropertyValue::RichText(daily.score.clone()),
        ),
        (
            READINESS_DESCRIPTION.to_string(),
            PropertyValue::RichText(daily.description.clone()),
        ),
    ]
}

/// Returns `true` when a row was created.
pub async fn write_if_absent(
    store: &dyn DocumentStore,
    database_id: &str,
    date: NaiveDate,
    daily: &DailyStatus,
) -> Result<bool> {
    let existing = store
        .query_rows(database_id, &existing_row_filter(date, &daily.status))
        .await?;

    if !existing.is_empty() {
        log::info!(
            "Notion: {} row(s) already recorded for {} / {}, skipping",
            existing.len(),
            date,
            daily.status
        );
        return Ok(false);
    }

    let row = store
        .create_row(database_id, &row_properties(date, daily))
        .await?;
    log::info!("Notion: created row {} for {} / {}", row.id, date, daily.status);
    Ok(true)
}
