//! Error types for the stats backend client.
//!
//! Reporting failures never fail a run: the execution controller logs a
//! [`StatsError`] and moves on. The read endpoints surface it to callers.

/// Errors that can occur while talking to the stats backend.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// The HTTP client could not be constructed.
    #[error("stats client setup failed: {0}")]
    Setup(String),

    /// The request never produced a response (connect, timeout, TLS).
    #[error("stats request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status (e.g. validation).
    #[error("stats backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for the log.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("stats response decode failed: {0}")]
    Decode(String),
}
