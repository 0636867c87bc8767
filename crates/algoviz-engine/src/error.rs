//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: algoviz_core::ConfigError,
    },

    /// The stats client could not be built.
    #[error("stats client error: {source}")]
    Stats {
        /// The underlying stats error.
        #[from]
        source: algoviz_stats::StatsError,
    },

    /// Observer API server failed to start or crashed.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: algoviz_observer::ServerError,
    },
}
