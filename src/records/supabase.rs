use anyhow::{Context, Result};
use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use std::time::Duration;

use super::error::StoreError;
use super::types::DailyRecord;

pub const DEFAULT_TABLE: &str = "carbon_records";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Record store backed by a Supabase (PostgREST) table
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    endpoint: Url,
}

impl SupabaseStore {
    /// Build a client with the API key attached to every request.
    ///
    /// `base_url` is the project URL, e.g. `https://xyz.supabase.co`.
    pub fn new(base_url: &str, table: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let endpoint = table_endpoint(base_url, table)?;

        let mut key_value =
            HeaderValue::from_str(api_key).context("API key contains invalid characters")?;
        key_value.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .context("API key contains invalid characters")?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("apikey"), key_value);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("carbon-tally/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn append(&self, record: &DailyRecord) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(map_request_error)?;

        check_status(response).await.map(|_| ())
    }

    pub async fn fetch_for_user(&self, user_id: &str) -> Result<Vec<DailyRecord>, StoreError> {
        let url = user_query(&self.endpoint, user_id);
        self.fetch(url).await
    }

    pub async fn fetch_all(&self) -> Result<Vec<DailyRecord>, StoreError> {
        let url = all_query(&self.endpoint);
        self.fetch(url).await
    }

    async fn fetch(&self, url: Url) -> Result<Vec<DailyRecord>, StoreError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_request_error)?;

        let response = check_status(response).await?;
        response
            .json::<Vec<DailyRecord>>()
            .await
            .map_err(|e| StoreError::Corrupt(format!("unexpected response body: {}", e)))
    }
}

/// `{base}/rest/v1/{table}`
fn table_endpoint(base_url: &str, table: &str) -> Result<Url> {
    let raw = format!("{}/rest/v1/{}", base_url.trim().trim_end_matches('/'), table.trim());
    Url::parse(&raw).with_context(|| format!("Invalid Supabase URL: {}", base_url))
}

fn user_query(endpoint: &Url, user_id: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("user_id", &format!("eq.{}", user_id))
        .append_pair("order", "date.asc");
    url
}

fn all_query(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("order", "date.desc");
    url
}

fn map_request_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Network(format!("request timed out: {}", e))
    } else if e.is_connect() {
        StoreError::Network(format!("could not connect: {}", e))
    } else {
        StoreError::Network(e.to_string())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, body))
}

fn status_error(status: StatusCode, body: String) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Auth(format!(
            "HTTP {}. Check CARBON_TALLY_SUPABASE_KEY and the table's row-level security policy.",
            status.as_u16()
        )),
        _ => StoreError::Backend {
            status: status.as_u16(),
            body: body.trim().to_string(),
        },
    }
}
