//! Notion database integration.
//!
//! Only the two operations the sync needs: query a database with a property
//! filter, and create a page (row) in it.

pub mod client;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::Result;

/// Notion integration settings.
#[derive(Clone)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &"<redacted>")
            .field("database_id", &self.database_id)
            .finish()
    }
}

/// Equality test on a single property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    DateEquals(NaiveDate),
    TitleEquals(String),
}

/// Database query filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    And(Vec<RowFilter>),
    Property { property: String, condition: Condition },
}

impl RowFilter {
    pub fn property(property: impl Into<String>, condition: Condition) -> Self {
        RowFilter::Property {
            property: property.into(),
            condition,
        }
    }

    /// Notion's compound filter object.
    pub fn to_json(&self) -> Value {
        match self {
            RowFilter::And(filters) => {
                json!({ "and": filters.iter().map(RowFilter::to_json).collect::<Vec<_>>() })
            }
            RowFilter::Property {
                property,
                condition,
            } => match condition {
                Condition::DateEquals(date) => json!({
                    "property": property,
                    "date": { "equals": date.format("%Y-%m-%d").to_string() }
                }),
                Condition::TitleEquals(text) => json!({
                    "property": property,
                    "title": { "equals": text }
                }),
            },
        }
    }
}

/// A typed property value for a new row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Title(String),
    Date(NaiveDate),
    RichText(String),
}

impl PropertyValue {
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Title(text) => json!({ "title": [{ "text": { "content": text } }] }),
            PropertyValue::Date(date) => {
                json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } })
            }
            PropertyValue::RichText(text) => {
                json!({ "rich_text": [{ "text": { "content": text } }] })
            }
        }
    }
}

/// Named property values of one row, in column order.
pub type Properties = Vec<(String, PropertyValue)>;

/// Page properties object keyed by property name.
pub fn properties_json(properties: &[(String, PropertyValue)]) -> Value {
    let map: Map<String, Value> = properties
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();
    Value::Object(map)
}

/// A database row as returned by query or create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Query/create access to a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query_rows(&self, database_id: &str, filter: &RowFilter) -> Result<Vec<Row>>;

    async fn create_row(
        &self,
        database_id: &str,
        properties: &[(String, PropertyValue)],
    ) -> Result<Row>;
}
