//! Anonymous usage metrics.
//!
//! After a record is created the console reports a one-line usage count,
//! e.g. `{"site": 1}`. [`MetricsDelivery`] posts it to the solution's
//! metrics endpoint in a single attempt; failures are logged and never
//! reach the user. [`NoopMetrics`] is used when no endpoint is configured.

use std::time::Duration;

use andon_core::types::{Timestamp, SOLUTION_ID};
use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

/// HTTP request timeout for a single metrics post.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The metrics endpoint returned a non-2xx status code.
    #[error("Metrics endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Wire format of one usage report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsageReport {
    pub solution: String,
    #[serde(rename = "UUID")]
    pub uuid: Uuid,
    pub time_stamp: Timestamp,
    pub data: serde_json::Value,
}

impl UsageReport {
    pub fn new(uuid: Uuid, data: serde_json::Value) -> Self {
        Self {
            solution: SOLUTION_ID.to_string(),
            uuid,
            time_stamp: chrono::Utc::now(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// Sink trait
// ---------------------------------------------------------------------------

/// Destination for usage metrics.
///
/// `send` never fails from the caller's point of view.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn send(&self, data: serde_json::Value);
}

/// Discards every metric.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

#[async_trait]
impl MetricsSink for NoopMetrics {
    async fn send(&self, data: serde_json::Value) {
        tracing::trace!(%data, "Metrics disabled, dropping usage report");
    }
}

// ---------------------------------------------------------------------------
// MetricsDelivery
// ---------------------------------------------------------------------------

/// Posts usage reports to an HTTP endpoint.
pub struct MetricsDelivery {
    client: reqwest::Client,
    url: String,
    uuid: Uuid,
}

impl MetricsDelivery {
    /// Create a delivery service for `url`, reporting as deployment `uuid`.
    pub fn new(url: impl Into<String>, uuid: Uuid) -> Result<Self, MetricsError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            uuid,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post one report and check the response status.
    pub async fn try_send(&self, data: serde_json::Value) -> Result<(), MetricsError> {
        let report = UsageReport::new(self.uuid, data);
        let response = self.client.post(&self.url).json(&report).send().await?;
        if !response.status().is_success() {
            return Err(MetricsError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl MetricsSink for MetricsDelivery {
    async fn send(&self, data: serde_json::Value) {
        if let Err(e) = self.try_send(data).await {
            tracing::warn!(url = %self.url, error = %e, "Usage metrics delivery failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
