//! Hosted table REST client
//!
//! HTTP client for a PostgREST endpoint (the REST layer used by hosted
//! Postgres services) exposing the `daily_metrics` table.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};

use super::{BackendError, BackendResult, MetricsBackend};
use crate::records::{MetricPatch, MetricRecord, NewMetricRecord, RecordId};

/// Configuration for the REST backend
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL (e.g., "https://xyzcompany.example.co")
    pub base_url: String,
    /// Anonymous or service key, sent as `apikey` and bearer token
    pub api_key: Option<String>,
    /// Table name
    pub table: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: None,
            table: "daily_metrics".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// REST backend for the hosted `daily_metrics` table
pub struct RestBackend {
    client: Client,
    config: RestConfig,
}

impl RestBackend {
    /// Create a new client with the given configuration
    pub fn new(config: RestConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| BackendError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn query_url(&self, date: NaiveDate) -> String {
        format!(
            "{}?select=*&metric_date=eq.{}&order=created_at.desc",
            self.table_url(),
            date.format("%Y-%m-%d")
        )
    }

    fn row_url(&self, id: &RecordId) -> String {
        format!(
            "{}?id=eq.{}",
            self.table_url(),
            urlencoding::encode(id.as_str())
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(BackendError::from_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(BackendError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    async fn rows(response: Response) -> BackendResult<Vec<MetricRecord>> {
        let body = response.text().await.map_err(BackendError::from_transport)?;
        decode_rows(&body)
    }
}

/// Decode a JSON array of rows
fn decode_rows(body: &str) -> BackendResult<Vec<MetricRecord>> {
    Ok(serde_json::from_str(body)?)
}

/// Take the single row a representation response should contain
fn single_row(rows: Vec<MetricRecord>, id: Option<&RecordId>) -> BackendResult<MetricRecord> {
    rows.into_iter().next().ok_or_else(|| match id {
        Some(id) => BackendError::NotFound(id.to_string()),
        None => BackendError::Decode("empty representation for inserted row".to_string()),
    })
}

#[async_trait]
impl MetricsBackend for RestBackend {
    fn name(&self) -> &str {
        "rest"
    }

    async fn fetch_by_date(&self, date: NaiveDate) -> BackendResult<Vec<MetricRecord>> {
        let url = self.query_url(date);
        tracing::debug!(%date, "Querying daily metrics");

        let response = self.send(self.client.get(&url)).await?;
        Self::rows(response).await
    }

    async fn insert(&self, record: NewMetricRecord) -> BackendResult<MetricRecord> {
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&[record]);

        let response = self.send(request).await?;
        single_row(Self::rows(response).await?, None)
    }

    async fn update(&self, id: &RecordId, patch: &MetricPatch) -> BackendResult<MetricRecord> {
        let request = self
            .client
            .patch(self.row_url(id))
            .header("Prefer", "return=representation")
            .json(patch);

        let response = self.send(request).await?;
        single_row(Self::rows(response).await?, Some(id))
    }

    async fn delete(&self, id: &RecordId) -> BackendResult<()> {
        let request = self
            .client
            .delete(self.row_url(id))
            .header("Prefer", "return=representation");

        let response = self.send(request).await?;
        single_row(Self::rows(response).await?, Some(id)).map(|_| ())
    }
}
