//! Configuration loading and typed config structures for AlgoViz.
//!
//! The canonical configuration lives in `algoviz-config.yaml`. Every
//! section and field has a default matching the stock deployment, so an
//! empty or partial file is valid. A handful of environment variables
//! override the file for container deployments.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible deployment.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration. Mirrors the structure of `algoviz-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlgoVizConfig {
    /// Observer HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Stats backend settings.
    #[serde(default)]
    pub stats: StatsSection,

    /// Sorting visualizer settings.
    #[serde(default)]
    pub sorting: SortingConfig,

    /// Searching visualizer settings.
    #[serde(default)]
    pub searching: SearchingConfig,

    /// Pathfinding visualizer settings.
    #[serde(default)]
    pub pathfinding: PathfindingConfig,
}

impl AlgoVizConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `ALGOVIZ_STATS_URL` overrides `stats.base_url`
    /// - `ALGOVIZ_HOST` overrides `server.host`
    /// - `ALGOVIZ_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No env overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `ALGOVIZ_PORT` is not a port.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("ALGOVIZ_STATS_URL") {
            self.stats.base_url = val;
        }
        if let Ok(val) = std::env::var("ALGOVIZ_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ALGOVIZ_PORT") {
            self.server.port = val.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("ALGOVIZ_PORT={val}: {e}"),
            })?;
        }
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sorting.min_value >= self.sorting.max_value {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "sorting.min_value ({}) must be below sorting.max_value ({})",
                    self.sorting.min_value, self.sorting.max_value
                ),
            });
        }
        if self.sorting.min_value < 0 {
            return Err(ConfigError::Invalid {
                reason: "sorting.min_value must be non-negative".to_owned(),
            });
        }
        self.pathfinding.validate()
    }
}

/// Observer HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Stats backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatsSection {
    /// Whether completed runs are submitted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Backend base URL.
    #[serde(default = "default_stats_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_stats_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_stats_url(),
            timeout_ms: default_stats_timeout_ms(),
        }
    }
}

/// Sorting visualizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SortingConfig {
    /// Number of elements generated per input.
    #[serde(default = "default_sorting_size")]
    pub array_size: usize,

    /// Smallest generated value (inclusive).
    #[serde(default = "default_sorting_min")]
    pub min_value: i64,

    /// Largest generated value (exclusive).
    #[serde(default = "default_sorting_max")]
    pub max_value: i64,

    /// Initial step delay in milliseconds.
    #[serde(default = "default_sorting_delay_ms")]
    pub default_delay_ms: u64,
}

impl Default for SortingConfig {
    fn default() -> Self {
        Self {
            array_size: default_sorting_size(),
            min_value: default_sorting_min(),
            max_value: default_sorting_max(),
            default_delay_ms: default_sorting_delay_ms(),
        }
    }
}

/// Searching visualizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchingConfig {
    /// Number of elements in the synthetic sorted input.
    #[serde(default = "default_searching_size")]
    pub array_size: usize,

    /// Initial search target.
    #[serde(default = "default_target")]
    pub default_target: i64,

    /// Initial step delay in milliseconds.
    #[serde(default = "default_searching_delay_ms")]
    pub default_delay_ms: u64,
}

impl Default for SearchingConfig {
    fn default() -> Self {
        Self {
            array_size: default_searching_size(),
            default_target: default_target(),
            default_delay_ms: default_searching_delay_ms(),
        }
    }
}

/// A `(row, col)` grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Cell {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

/// Pathfinding visualizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathfindingConfig {
    /// Grid rows.
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Grid columns.
    #[serde(default = "default_cols")]
    pub cols: usize,

    /// Start node.
    #[serde(default = "default_start")]
    pub start: Cell,

    /// End node.
    #[serde(default = "default_end")]
    pub end: Cell,

    /// Initial step delay in milliseconds.
    #[serde(default = "default_pathfinding_delay_ms")]
    pub default_delay_ms: u64,
}

impl PathfindingConfig {
    /// Check that start and end are distinct cells inside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Invalid {
                reason: format!("grid must be non-empty, got {}x{}", self.rows, self.cols),
            });
        }
        for (name, cell) in [("start", self.start), ("end", self.end)] {
            if cell.row >= self.rows || cell.col >= self.cols {
                return Err(ConfigError::Invalid {
                    reason: format!(
                        "pathfinding.{name} ({}, {}) is outside the {}x{} grid",
                        cell.row, cell.col, self.rows, self.cols
                    ),
                });
            }
        }
        if self.start == self.end {
            return Err(ConfigError::Invalid {
                reason: "pathfinding.start and pathfinding.end must differ".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            start: default_start(),
            end: default_end(),
            default_delay_ms: default_pathfinding_delay_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_stats_url() -> String {
    "https://django-backend-86sb.onrender.com".to_owned()
}

const fn default_stats_timeout_ms() -> u64 {
    5000
}

const fn default_sorting_size() -> usize {
    50
}

const fn default_sorting_min() -> i64 {
    10
}

const fn default_sorting_max() -> i64 {
    310
}

const fn default_sorting_delay_ms() -> u64 {
    100
}

const fn default_searching_size() -> usize {
    20
}

const fn default_target() -> i64 {
    50
}

const fn default_searching_delay_ms() -> u64 {
    200
}

const fn default_rows() -> usize {
    15
}

const fn default_cols() -> usize {
    25
}

const fn default_start() -> Cell {
    Cell { row: 7, col: 5 }
}

const fn default_end() -> Cell {
    Cell { row: 7, col: 20 }
}

const fn default_pathfinding_delay_ms() -> u64 {
    50
}

const fn default_true() -> bool {
    true
}
