//! The element sequence used by the sorting and searching visualizers.

use algoviz_types::{AlgorithmKind, SequenceView, StoreView};
use rand::Rng;

use crate::config::{SearchingConfig, SortingConfig};
use crate::error::ControlError;
use crate::store::StateStore;

/// How a [`SequenceStore`] produces fresh input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceGenerator {
    /// `len` values drawn uniformly from `[min, max)`.
    Random {
        /// Number of values.
        len: usize,
        /// Inclusive lower bound.
        min: i64,
        /// Exclusive upper bound.
        max: i64,
    },
    /// `start, start + step, start + 2*step, ...` for `len` values.
    Ascending {
        /// Number of values.
        len: usize,
        /// First value.
        start: i64,
        /// Increment.
        step: i64,
    },
}

impl SequenceGenerator {
    /// Produce one input sequence.
    pub fn generate(&self) -> Vec<i64> {
        match *self {
            Self::Random { len, min, max } => {
                if min >= max {
                    return vec![min; len];
                }
                let mut rng = rand::rng();
                (0..len).map(|_| rng.random_range(min..max)).collect()
            }
            Self::Ascending { len, start, step } => (0..len)
                .map(|i| {
                    i64::try_from(i)
                        .unwrap_or(i64::MAX)
                        .saturating_mul(step)
                        .saturating_add(start)
                })
                .collect(),
        }
    }
}

/// Mutable sequence plus its presentation markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStore {
    values: Vec<i64>,
    cursor: Option<usize>,
    found: Option<usize>,
    target: i64,
    generator: SequenceGenerator,
}

impl SequenceStore {
    /// A store filled from `generator`.
    pub fn new(generator: SequenceGenerator, target: i64) -> Self {
        Self {
            values: generator.generate(),
            cursor: None,
            found: None,
            target,
            generator,
        }
    }

    /// The sorting visualizer's store: random values.
    pub fn sorting(config: &SortingConfig) -> Self {
        Self::new(
            SequenceGenerator::Random {
                len: config.array_size,
                min: config.min_value,
                max: config.max_value,
            },
            0,
        )
    }

    /// The searching visualizer's store: `10, 15, 20, ...`.
    pub fn searching(config: &SearchingConfig) -> Self {
        Self::new(
            SequenceGenerator::Ascending {
                len: config.array_size,
                start: 10,
                step: 5,
            },
            config.default_target,
        )
    }

    /// A store holding exactly `values`. Regeneration still uses `generator`.
    pub fn with_values(values: Vec<i64>, target: i64, generator: SequenceGenerator) -> Self {
        Self {
            values,
            cursor: None,
            found: None,
            target,
            generator,
        }
    }

    /// The values in their current order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }

    /// Overwrite the value at `index`. Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, value: i64) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Exchange two values. Out-of-range indices are ignored.
    pub fn swap(&mut self, a: usize, b: usize) {
        let len = self.values.len();
        if a < len && b < len {
            self.values.swap(a, b);
        }
    }

    /// Index currently being examined.
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Move (or clear) the examination cursor.
    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = cursor;
    }

    /// Index where the last search found its target.
    pub const fn found(&self) -> Option<usize> {
        self.found
    }

    /// Record a search hit.
    pub fn mark_found(&mut self, index: usize) {
        self.found = Some(index);
    }

    /// The search target.
    pub const fn target(&self) -> i64 {
        self.target
    }

    /// Change the search target and clear any previous hit.
    pub fn set_target(&mut self, target: i64) {
        self.target = target;
        self.found = None;
    }

    /// Replace the values with user-supplied input.
    pub fn load_values(&mut self, values: Vec<i64>) {
        self.values = values;
        self.clear_markers();
    }

    fn clear_markers(&mut self) {
        self.cursor = None;
        self.found = None;
    }

    fn check_radix_input(&self) -> Result<(), ControlError> {
        if let Some(negative) = self.values.iter().find(|v| **v < 0) {
            return Err(ControlError::InvalidInput(format!(
                "radix sort needs non-negative values, found {negative}"
            )));
        }
        match self.values.iter().max() {
            Some(max) if *max > 0 => Ok(()),
            Some(_) => Err(ControlError::InvalidInput(
                "radix sort needs a positive maximum".to_owned(),
            )),
            None => Err(ControlError::InvalidInput(
                "radix sort needs at least one value".to_owned(),
            )),
        }
    }
}

impl StateStore for SequenceStore {
    fn input_size(&self) -> usize {
        self.values.len()
    }

    fn view(&self) -> StoreView {
        StoreView::Sequence(SequenceView {
            values: self.values.clone(),
            cursor: self.cursor,
            found: self.found,
            target: self.target,
        })
    }

    fn prepare(&mut self, algorithm: AlgorithmKind) -> Result<(), ControlError> {
        if algorithm == AlgorithmKind::RadixSort {
            self.check_radix_input()?;
        }
        self.clear_markers();
        Ok(())
    }

    fn regenerate(&mut self) {
        self.values = self.generator.generate();
        self.clear_markers();
    }
}
