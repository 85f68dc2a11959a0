//! HTTP client for Garmin Connect.
//!
//! Logs in through the Garmin SSO widget with a cookie-holding reqwest
//! client, then reads metrics through the Connect web proxy using the
//! session cookies.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;

use super::{FitnessClient, GarminConfig};
use crate::error::{Result, SyncError};

const SSO_URL: &str = "https://sso.garmin.com/sso";
const SSO_EMBED_URL: &str = "https://sso.garmin.com/sso/embed";
const CONNECT_MODERN_URL: &str = "https://connect.garmin.com/modern/";
const CONNECT_PROXY_URL: &str = "https://connect.garmin.com/modern/proxy";
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko)";

pub struct GarminClient {
    client: reqwest::Client,
}

impl GarminClient {
    /// Sign in and establish a Connect session.
    pub async fn login(config: &GarminConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Auth(format!("Failed to build HTTP client: {}", e)))?;

        log::info!("Garmin: signing in as {}", config.email);

        client
            .get(SSO_EMBED_URL)
            .query(&embed_params())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SyncError::Auth(format!("SSO embed request failed: {}", e)))?;

        let signin_url = format!("{}/signin", SSO_URL);
        let signin_page = client
            .get(&signin_url)
            .query(&signin_params())
            .header(reqwest::header::REFERER, SSO_EMBED_URL)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SyncError::Auth(format!("SSO sign-in page request failed: {}", e)))?
            .text()
            .await
            .map_err(|e| SyncError::Auth(format!("Failed to read sign-in page: {}", e)))?;

        let csrf = extract_csrf(&signin_page)
            .ok_or_else(|| SyncError::Auth("No CSRF token on sign-in page".to_string()))?;

        let response = client
            .post(&signin_url)
            .query(&signin_params())
            .header(reqwest::header::REFERER, signin_url.as_str())
            .form(&[
                ("username", config.email.as_str()),
                ("password", config.password.as_str()),
                ("embed", "true"),
                ("_csrf", csrf.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SyncError::Auth(format!("SSO sign-in request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SyncError::Auth(format!("SSO sign-in returned {}", status)));
        }

        match page_title(&body) {
            Some(title) if title == "Success" => {}
            Some(title) => {
                return Err(SyncError::Auth(format!(
                    "SSO sign-in did not succeed (page title '{}')",
                    title
                )))
            }
            None => return Err(SyncError::Auth("Unexpected SSO sign-in response".to_string())),
        }

        let ticket = extract_ticket(&body)
            .ok_or_else(|| SyncError::Auth("No service ticket in SSO response".to_string()))?;

        client
            .get(CONNECT_MODERN_URL)
            .query(&[("ticket", ticket.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SyncError::Auth(format!("Connect session exchange failed: {}", e)))?;

        log::info!("Garmin: session established");
        Ok(Self { client })
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        let url = format!("{}/{}", CONNECT_PROXY_URL, path);
        let resp = self
            .client
            .get(&url)
            .header("NK", "NT")
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SyncError::Fetch(format!("{}: {}", path, e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SyncError::Fetch(format!("{} returned {}: {}", path, status, text)));
        }

        resp.json()
            .await
            .map_err(|e| SyncError::Fetch(format!("Failed to parse {} response: {}", path, e)))
    }
}

#[async_trait]
impl FitnessClient for GarminClient {
    async fn training_status(&self, date: NaiveDate) -> Result<serde_json::Value> {
        self.get_json(&training_status_path(date)).await
    }

    async fn training_readiness(&self, date: NaiveDate) -> Result<serde_json::Value> {
        self.get_json(&training_readiness_path(date)).await
    }
}

fn embed_params() -> Vec<(&'static str, &'static str)> {
    vec![
        ("id", "gauth-widget"),
        ("embedWidget", "true"),
        ("gauthHost", SSO_URL),
    ]
}

fn signin_params() -> Vec<(&'static str, &'static str)> {
    vec![
        ("id", "gauth-widget"),
        ("embedWidget", "true"),
        ("gauthHost", SSO_EMBED_URL),
        ("service", CONNECT_MODERN_URL),
        ("source", SSO_EMBED_URL),
        ("redirectAfterAccountLoginUrl", CONNECT_MODERN_URL),
        ("redirectAfterAccountCreationUrl", CONNECT_MODERN_URL),
    ]
}

pub(crate) fn training_status_path(date: NaiveDate) -> String {
    format!(
        "metrics-service/metrics/trainingstatus/aggregated/{}",
        date.format("%Y-%m-%d")
    )
}

pub(crate) fn training_readiness_path(date: NaiveDate) -> String {
    format!(
        "metrics-service/metrics/trainingreadiness/{}",
        date.format("%Y-%m-%d")
    )
}

fn capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn extract_csrf(html: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"name="_csrf"\s+value="([^"]+)""#).expect("valid csrf regex")
    });
    capture(re, html)
}

pub(crate) fn extract_ticket(html: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"ticket=([^"&]+)""#).expect("valid ticket regex"));
    capture(re, html)
}

pub(crate) fn page_title(html: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"<title>([^<]*)</title>").expect("valid title regex"));
    capture(re, html)
}
