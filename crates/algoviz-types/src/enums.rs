//! Enumeration types for the AlgoViz engine.
//!
//! The backend identifies algorithms by a fixed integer table and groups
//! them by type (`sorting`, `searching`, `pathfinding`). Both mappings
//! live here so every crate agrees on them.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Visualizer kinds
// ---------------------------------------------------------------------------

/// The three visualizer families. Each owns one execution controller.
///
/// The serialized form matches the backend's `algorithm_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum VisualizerKind {
    /// Bubble, Quick, Merge and Radix Sort over an element sequence.
    Sorting,
    /// Linear and Binary Search over a sorted element sequence.
    Searching,
    /// Dijkstra shortest path over a node grid.
    Pathfinding,
}

impl VisualizerKind {
    /// All visualizer kinds, in presentation order.
    pub const ALL: [Self; 3] = [Self::Sorting, Self::Searching, Self::Pathfinding];

    /// Backend `algorithm_type` string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sorting => "sorting",
            Self::Searching => "searching",
            Self::Pathfinding => "pathfinding",
        }
    }

    /// The algorithms a visualizer of this kind can run.
    pub const fn algorithms(self) -> &'static [AlgorithmKind] {
        match self {
            Self::Sorting => &[
                AlgorithmKind::BubbleSort,
                AlgorithmKind::QuickSort,
                AlgorithmKind::MergeSort,
                AlgorithmKind::RadixSort,
            ],
            Self::Searching => &[AlgorithmKind::LinearSearch, AlgorithmKind::BinarySearch],
            Self::Pathfinding => &[AlgorithmKind::Dijkstra],
        }
    }
}

impl fmt::Display for VisualizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizerKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sorting" => Ok(Self::Sorting),
            "searching" => Ok(Self::Searching),
            "pathfinding" => Ok(Self::Pathfinding),
            other => Err(ParseKindError(other.to_owned())),
        }
    }
}

/// Returned when a string names no known visualizer or algorithm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind: {0}")]
pub struct ParseKindError(pub String);

// ---------------------------------------------------------------------------
// Algorithms
// ---------------------------------------------------------------------------

/// Every algorithm the engine can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AlgorithmKind {
    /// Adjacent-swap bubble sort.
    BubbleSort,
    /// Lomuto-partition quick sort with concurrently issued sub-partitions.
    QuickSort,
    /// Top-down merge sort.
    MergeSort,
    /// Least-significant-digit radix sort over 10 buckets.
    RadixSort,
    /// Left-to-right linear scan.
    LinearSearch,
    /// Midpoint bisection over a sorted sequence.
    BinarySearch,
    /// Dijkstra shortest path with uniform edge weight.
    Dijkstra,
}

impl AlgorithmKind {
    /// All algorithms, ordered by backend id.
    pub const ALL: [Self; 7] = [
        Self::BubbleSort,
        Self::QuickSort,
        Self::MergeSort,
        Self::LinearSearch,
        Self::BinarySearch,
        Self::Dijkstra,
        Self::RadixSort,
    ];

    /// The fixed backend primary key for this algorithm.
    pub const fn backend_id(self) -> u32 {
        match self {
            Self::BubbleSort => 1,
            Self::QuickSort => 2,
            Self::MergeSort => 3,
            Self::LinearSearch => 4,
            Self::BinarySearch => 5,
            Self::Dijkstra => 6,
            Self::RadixSort => 7,
        }
    }

    /// Reverse lookup of [`backend_id`](Self::backend_id).
    pub fn from_backend_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.backend_id() == id)
    }

    /// Human-readable label shown by the presentation layer.
    pub const fn label(self) -> &'static str {
        match self {
            Self::BubbleSort => "Bubble Sort",
            Self::QuickSort => "Quick Sort",
            Self::MergeSort => "Merge Sort",
            Self::RadixSort => "Radix Sort",
            Self::LinearSearch => "Linear Search",
            Self::BinarySearch => "Binary Search",
            Self::Dijkstra => "Dijkstra's Algorithm",
        }
    }

    /// Which visualizer runs this algorithm.
    pub const fn visualizer(self) -> VisualizerKind {
        match self {
            Self::BubbleSort | Self::QuickSort | Self::MergeSort | Self::RadixSort => {
                VisualizerKind::Sorting
            }
            Self::LinearSearch | Self::BinarySearch => VisualizerKind::Searching,
            Self::Dijkstra => VisualizerKind::Pathfinding,
        }
    }

    /// Whether the algorithm has a swap/write concept. Runs without one
    /// still report `swaps: 0`.
    pub const fn counts_swaps(self) -> bool {
        matches!(self.visualizer(), VisualizerKind::Sorting)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

/// Run state of a visualizer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RunStatus {
    /// No run is active; input may be edited.
    #[default]
    Idle,
    /// A run is active; input is locked.
    Running,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RunEnd {
    /// The algorithm reached its terminal condition; metrics were reported.
    Completed,
    /// The run observed its cancellation token; metrics were discarded.
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_ids_match_fixed_table() {
        assert_eq!(AlgorithmKind::BubbleSort.backend_id(), 1);
        assert_eq!(AlgorithmKind::QuickSort.backend_id(), 2);
        assert_eq!(AlgorithmKind::MergeSort.backend_id(), 3);
        assert_eq!(AlgorithmKind::LinearSearch.backend_id(), 4);
        assert_eq!(AlgorithmKind::BinarySearch.backend_id(), 5);
        assert_eq!(AlgorithmKind::Dijkstra.backend_id(), 6);
        assert_eq!(AlgorithmKind::RadixSort.backend_id(), 7);
    }

    #[test]
    fn backend_id_lookup_is_inverse() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(AlgorithmKind::from_backend_id(kind.backend_id()), Some(kind));
        }
        assert_eq!(AlgorithmKind::from_backend_id(0), None);
        assert_eq!(AlgorithmKind::from_backend_id(8), None);
    }

    #[test]
    fn every_algorithm_belongs_to_its_visualizer() {
        for kind in AlgorithmKind::ALL {
            assert!(kind.visualizer().algorithms().contains(&kind));
        }
        let total: usize = VisualizerKind::ALL
            .iter()
            .map(|v| v.algorithms().len())
            .sum();
        assert_eq!(total, AlgorithmKind::ALL.len());
    }

    #[test]
    fn only_sorts_count_swaps() {
        assert!(AlgorithmKind::RadixSort.counts_swaps());
        assert!(!AlgorithmKind::BinarySearch.counts_swaps());
        assert!(!AlgorithmKind::Dijkstra.counts_swaps());
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&AlgorithmKind::QuickSort).unwrap_or_default();
        assert_eq!(json, "\"quick_sort\"");
        let kind: Result<VisualizerKind, _> = serde_json::from_str("\"pathfinding\"");
        assert_eq!(kind.ok(), Some(VisualizerKind::Pathfinding));
    }

    #[test]
    fn visualizer_from_str() {
        assert_eq!("searching".parse::<VisualizerKind>(), Ok(VisualizerKind::Searching));
        assert!("graphs".parse::<VisualizerKind>().is_err());
    }
}
