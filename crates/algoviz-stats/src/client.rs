//! HTTP client for the stats backend.
//!
//! The backend is a small REST service that stores one row per completed
//! run and serves aggregates over them. Three endpoints are used:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `POST` | `/executions/record_execution/` | Store one completed run |
//! | `GET` | `/executions/performance_stats/?type=` | Aggregates per family |
//! | `GET` | `/algorithms/by_type/?type=` | Algorithm metadata |
//!
//! All calls go through a single `reqwest` client with a request timeout.

use std::time::Duration;

use algoviz_types::{AlgorithmInfo, ExecutionRecord, PerformanceStats, VisualizerKind};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StatsError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Client for the stats backend REST API.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: reqwest::Client,
    base_url: String,
}

impl StatsClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// A trailing slash on `base_url` is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Setup`] if the underlying HTTP client cannot
    /// be built (e.g. TLS backend initialisation fails).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatsError::Setup(format!("{e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The normalised base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store one completed run.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Request`] if the backend is unreachable, or
    /// [`StatsError::Status`] if it rejects the record.
    pub async fn record_execution(&self, record: &ExecutionRecord) -> Result<(), StatsError> {
        let url = format!("{}/executions/record_execution/", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| StatsError::Request(format!("{e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(StatsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            algorithm = record.algorithm,
            array_size = record.array_size,
            "execution recorded"
        );
        Ok(())
    }

    /// Fetch aggregate performance rows, optionally for one family.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] on transport, status, or decode failure.
    pub async fn performance_stats(
        &self,
        kind: Option<VisualizerKind>,
    ) -> Result<Vec<PerformanceStats>, StatsError> {
        let url = match kind {
            Some(kind) => format!(
                "{}/executions/performance_stats/?type={}",
                self.base_url,
                kind.as_str()
            ),
            None => format!("{}/executions/performance_stats/", self.base_url),
        };
        self.get_json(&url).await
    }

    /// Fetch algorithm metadata for one family.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] on transport, status, or decode failure.
    pub async fn algorithms_by_type(
        &self,
        kind: VisualizerKind,
    ) -> Result<Vec<AlgorithmInfo>, StatsError> {
        let url = format!("{}/algorithms/by_type/?type={}", self.base_url, kind.as_str());
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, StatsError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StatsError::Request(format!("{e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(StatsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StatsError::Decode(format!("{e}")))
    }
}
