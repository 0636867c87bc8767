//! Run metrics and the stats backend's wire records.
//!
//! [`RunMetrics`] is what the engine produces when a run completes.
//! [`ExecutionRecord`] is the body of `POST /executions/record_execution/`.
//! [`PerformanceStats`] and [`AlgorithmInfo`] are the rows returned by the
//! backend's read endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AlgorithmKind, VisualizerKind};
use crate::ids::RunId;

/// Final metrics of one completed run.
///
/// Created when a run starts, finalized when it ends, and never mutated
/// after that. Cancelled runs produce no `RunMetrics` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RunMetrics {
    /// The run these metrics belong to.
    pub run_id: RunId,
    /// The algorithm that ran.
    pub algorithm: AlgorithmKind,
    /// Array length, or grid cell count for pathfinding.
    pub input_size: u64,
    /// Wall-clock duration of the run including step delays.
    pub elapsed_ms: u64,
    /// Comparison count. For search and pathfinding this is the number of
    /// indices or nodes visited.
    pub comparisons: u64,
    /// Swap/write count. Always present; `0` for runs with no swap concept.
    pub swaps: u64,
    /// Indices or nodes visited (search and pathfinding).
    pub visits: u64,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

/// Request body for `POST /executions/record_execution/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExecutionRecord {
    /// Backend algorithm id (see [`AlgorithmKind::backend_id`]).
    pub algorithm: u32,
    /// Array length or grid cell count.
    pub array_size: u64,
    /// Elapsed milliseconds.
    pub execution_time: u64,
    /// Comparison count.
    pub comparisons: u64,
    /// Swap count.
    pub swaps: u64,
}

impl From<&RunMetrics> for ExecutionRecord {
    fn from(metrics: &RunMetrics) -> Self {
        Self {
            algorithm: metrics.algorithm.backend_id(),
            array_size: metrics.input_size,
            execution_time: metrics.elapsed_ms,
            comparisons: metrics.comparisons,
            swaps: if metrics.algorithm.counts_swaps() {
                metrics.swaps
            } else {
                0
            },
        }
    }
}

/// One aggregate row from `GET /executions/performance_stats/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PerformanceStats {
    /// Algorithm family (`sorting`, `searching`, `pathfinding`).
    ///
    /// The backend sometimes emits the raw ORM lookup key instead of the
    /// serializer field name, so both spellings are accepted.
    #[serde(default, alias = "algorithm__algorithm_type")]
    pub algorithm_type: String,
    /// Number of recorded executions.
    #[serde(default)]
    pub total_executions: u64,
    /// Mean execution time in milliseconds.
    #[serde(default)]
    pub avg_execution_time: Option<f64>,
    /// Mean comparison count.
    #[serde(default)]
    pub avg_comparisons: Option<f64>,
    /// Mean swap count.
    #[serde(default)]
    pub avg_swaps: Option<f64>,
}

/// Algorithm metadata from `GET /algorithms/by_type/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AlgorithmInfo {
    /// Backend primary key.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Prose description.
    #[serde(default)]
    pub description: String,
    /// Time complexity, e.g. `O(n log n)`.
    #[serde(default)]
    pub complexity_time: String,
    /// Space complexity.
    #[serde(default)]
    pub complexity_space: String,
    /// Algorithm family.
    pub algorithm_type: VisualizerKind,
    /// Reference implementation shown in the info panel.
    #[serde(default)]
    pub code_sample: String,
    /// Row creation time, when the backend includes it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Row update time, when the backend includes it.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AlgorithmInfo {
    /// The engine's algorithm for this row, if the id is in the fixed table.
    pub fn kind(&self) -> Option<AlgorithmKind> {
        AlgorithmKind::from_backend_id(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(algorithm: AlgorithmKind, swaps: u64) -> RunMetrics {
        RunMetrics {
            run_id: RunId::new(),
            algorithm,
            input_size: 50,
            elapsed_ms: 1234,
            comparisons: 1225,
            swaps,
            visits: 0,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn record_maps_fields() {
        let record = ExecutionRecord::from(&metrics(AlgorithmKind::MergeSort, 286));
        assert_eq!(
            record,
            ExecutionRecord {
                algorithm: 3,
                array_size: 50,
                execution_time: 1234,
                comparisons: 1225,
                swaps: 286,
            }
        );
    }

    #[test]
    fn record_forces_zero_swaps_for_search() {
        let record = ExecutionRecord::from(&metrics(AlgorithmKind::LinearSearch, 9));
        assert_eq!(record.swaps, 0);
        assert_eq!(record.algorithm, 4);
    }

    #[test]
    fn record_json_shape() {
        let record = ExecutionRecord::from(&metrics(AlgorithmKind::Dijkstra, 0));
        let json = serde_json::to_value(&record).unwrap_or_default();
        let keys: Vec<&str> = json
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(
            keys.len(),
            5,
            "record must carry exactly the backend's five fields: {keys:?}"
        );
        assert_eq!(json.get("swaps"), Some(&serde_json::json!(0)));
    }

    #[test]
    fn stats_accept_orm_key() {
        let row: Result<PerformanceStats, _> = serde_json::from_value(serde_json::json!({
            "algorithm__algorithm_type": "sorting",
            "total_executions": 12,
            "avg_execution_time": 5321.5,
            "avg_comparisons": 1100.0,
            "avg_swaps": null
        }));
        let row = row.ok();
        assert_eq!(row.as_ref().map(|r| r.algorithm_type.as_str()), Some("sorting"));
        assert_eq!(row.as_ref().map(|r| r.total_executions), Some(12));
        assert_eq!(row.and_then(|r| r.avg_swaps), None);
    }

    #[test]
    fn algorithm_info_resolves_kind() {
        let info: Result<AlgorithmInfo, _> = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Radix Sort",
            "description": "Digit-wise bucket sort",
            "complexity_time": "O(nk)",
            "complexity_space": "O(n + k)",
            "algorithm_type": "sorting",
            "code_sample": "",
            "created_at": "2025-01-02T03:04:05Z"
        }));
        let info = info.ok();
        assert_eq!(info.as_ref().and_then(AlgorithmInfo::kind), Some(AlgorithmKind::RadixSort));
        assert!(info.and_then(|i| i.created_at).is_some());
    }
}
