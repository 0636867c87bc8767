//! Result reporter selection.
//!
//! With the stats backend enabled, completed runs go to a [`StatsClient`]
//! and the observer proxies the backend's read endpoints through the same
//! client. With it disabled, runs are dropped by a [`NoopReporter`] and
//! the proxy endpoints answer `503`.

use std::sync::Arc;
use std::time::Duration;

use algoviz_core::config::StatsSection;
use algoviz_stats::{NoopReporter, ResultReporter, StatsClient};
use tracing::info;

use crate::error::EngineError;

/// The reporter for completed runs plus the client for the proxy, if any.
pub struct Reporting {
    /// Receives every completed run.
    pub reporter: Arc<dyn ResultReporter>,
    /// Backend client for the observer's stats proxy.
    pub client: Option<StatsClient>,
}

/// Build the reporting stack from the `stats` config section.
///
/// # Errors
///
/// Returns [`EngineError::Stats`] if the HTTP client cannot be built.
pub fn build(config: &StatsSection) -> Result<Reporting, EngineError> {
    if !config.enabled {
        info!("Stats backend disabled; completed runs will not be reported");
        return Ok(Reporting {
            reporter: Arc::new(NoopReporter),
            client: None,
        });
    }

    let client = StatsClient::new(&config.base_url, Duration::from_millis(config.timeout_ms))?;
    info!(
        base_url = client.base_url(),
        timeout_ms = config.timeout_ms,
        "Stats backend client ready"
    );
    Ok(Reporting {
        reporter: Arc::new(client.clone()),
        client: Some(client),
    })
}
