//! REST client for the Notion API.
//!
//! Uses reqwest with Bearer token auth and a pinned `Notion-Version`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{properties_json, DocumentStore, NotionConfig, PropertyValue, Row, RowFilter};
use crate::error::{Result, SyncError};

const NOTION_API_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

#[derive(Deserialize)]
struct QueryResponse {
    results: Vec<Row>,
}

/// Error body Notion returns on non-2xx responses.
#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct NotionClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(config: &NotionConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            token: config.token.clone(),
            base_url: NOTION_API_URL.to_string(),
        })
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> std::result::Result<reqwest::Response, String> {
        let resp = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(describe_api_error(status, &text));
        }

        Ok(resp)
    }
}

/// "400 validation_error: ..." from a Notion error body, or the raw text.
fn describe_api_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            code,
            message: Some(message),
        }) => match code {
            Some(code) => format!("{} {}: {}", status, code, message),
            None => format!("{}: {}", status, message),
        },
        _ => format!("{}: {}", status, body),
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn query_rows(&self, database_id: &str, filter: &RowFilter) -> Result<Vec<Row>> {
        let resp = self
            .post(
                &format!("databases/{}/query", database_id),
                json!({ "filter": filter.to_json() }),
            )
            .await
            .map_err(SyncError::RemoteQuery)?;

        let parsed: QueryResponse = resp
            .json()
            .await
            .map_err(|e| SyncError::RemoteQuery(format!("Failed to parse query response: {}", e)))?;

        Ok(parsed.results)
    }

    async fn create_row(
        &self,
        database_id: &str,
        properties: &[(String, PropertyValue)],
    ) -> Result<Row> {
        let page = json!({
            "parent": { "database_id": database_id },
            "properties": properties_json(properties),
        });

        let resp = self.post("pages", page).await.map_err(SyncError::RemoteWrite)?;

        resp.json()
            .await
            .map_err(|e| SyncError::RemoteWrite(format!("Failed to parse created page: {}", e)))
    }
}
