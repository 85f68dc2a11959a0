//! In-memory stand-ins for Garmin and Notion used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::{Result, SyncError};
use crate::garmin::FitnessClient;
use crate::notion::{Condition, DocumentStore, Properties, PropertyValue, Row, RowFilter};

pub struct FakeFitness {
    status: Value,
    readiness: Value,
    requested: Mutex<Vec<NaiveDate>>,
}

impl FakeFitness {
    pub fn new(status: Value, readiness: Value) -> Self {
        Self {
            status,
            readiness,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Minimal aggregated training status payload for one device.
    pub fn status_payload(device_id: &str, phrase: &str) -> Value {
        json!({
            "userId": 1001,
            "mostRecentTrainingStatus": {
                "userId": 1001,
                "latestTrainingStatusData": {
                    device_id: {
                        "calendarDate": "2026-10-16",
                        "trainingStatus": 4,
                        "trainingStatusFeedbackPhrase": phrase,
                        "primaryTrainingDevice": true
                    }
                }
            }
        })
    }

    pub fn requested_dates(&self) -> Vec<NaiveDate> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FitnessClient for FakeFitness {
    async fn training_status(&self, date: NaiveDate) -> Result<Value> {
        self.requested.lock().unwrap().push(date);
        Ok(self.status.clone())
    }

    async fn training_readiness(&self, date: NaiveDate) -> Result<Value> {
        self.requested.lock().unwrap().push(date);
        Ok(self.readiness.clone())
    }
}

/// A single Notion database held in memory.
pub struct InMemoryStore {
    database_id: String,
    rows: Mutex<Vec<Properties>>,
    fail_queries: bool,
    accept_unknown_queries: bool,
}

impl InMemoryStore {
    pub fn new(database_id: &str) -> Self {
        Self {
            database_id: database_id.to_string(),
            rows: Mutex::new(Vec::new()),
            fail_queries: false,
            accept_unknown_queries: false,
        }
    }

    /// Every query fails, as if Notion were unreachable.
    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Queries against other database ids return no rows instead of failing.
    pub fn accepting_unknown_queries(mut self) -> Self {
        self.accept_unknown_queries = true;
        self
    }

    pub fn rows(&self) -> Vec<Properties> {
        self.rows.lock().unwrap().clone()
    }
}

fn matches(filter: &RowFilter, row: &[(String, PropertyValue)]) -> bool {
    match filter {
        RowFilter::And(filters) => filters.iter().all(|f| matches(f, row)),
        RowFilter::Property {
            property,
            condition,
        } => row.iter().any(|(name, value)| {
            name == property
                && match (condition, value) {
                    (Condition::DateEquals(want), PropertyValue::Date(have)) => want == have,
                    (Condition::TitleEquals(want), PropertyValue::Title(have)) => want == have,
                    _ => false,
                }
        }),
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn query_rows(&self, database_id: &str, filter: &RowFilter) -> Result<Vec<Row>> {
        if self.fail_queries {
            return Err(SyncError::RemoteQuery("connection refused".to_string()));
        }
        if database_id != self.database_id {
            if self.accept_unknown_queries {
                return Ok(Vec::new());
            }
            return Err(SyncError::RemoteQuery(format!(
                "Could not find database with ID: {}",
                database_id
            )));
        }

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, row)| matches(filter, row))
            .map(|(i, _)| Row {
                id: format!("row-{}", i),
                url: None,
            })
            .collect())
    }

    async fn create_row(
        &self,
        database_id: &str,
        properties: &[(String, PropertyValue)],
    ) -> Result<Row> {
        if database_id != self.database_id {
            return Err(SyncError::RemoteWrite(format!(
                "Could not find database with ID: {}",
                database_id
            )));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(properties.to_vec());
        Ok(Row {
            id: format!("row-{}", rows.len() - 1),
            url: None,
        })
    }
}
