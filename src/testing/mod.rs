//! Reference collaborators and data generators for tests.
//!
//! The splitters here are deliberately trivial: they exercise the builder's
//! control flow without implementing real clustering or independence
//! testing. They are used by the crate's own test suites and double as
//! examples of the collaborator contracts.

use rand::prelude::*;

use ndarray::Array2;

use crate::data::DataSlice;
use crate::learning::{ColPartition, ColSplitter, LeafFactory, RowPartition, RowSplitter};

// =============================================================================
// Leaves
// =============================================================================

/// Minimal leaf model: the mean over all values of the slice.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanLeaf {
    /// Original dataset column ids the leaf was fitted on.
    pub scope: Vec<usize>,
    /// Mean over every value of the slice, 0.0 for an empty slice.
    pub mean: f64,
    /// Number of rows the leaf was fitted on.
    pub n_rows: usize,
}

/// Fits [`MeanLeaf`] models.
#[derive(Debug, Default)]
pub struct MeanLeafFactory {
    created: usize,
}

impl MeanLeafFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaves created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl<C> LeafFactory<C> for MeanLeafFactory {
    type Leaf = MeanLeaf;

    fn create_leaf(&mut self, slice: &DataSlice<'_>, _ctx: &C, scope: &[usize]) -> MeanLeaf {
        self.created += 1;
        let n_values = slice.n_rows() * slice.n_cols();
        let sum: f64 = (0..slice.n_cols()).map(|c| slice.column(c).sum::<f64>()).sum();
        MeanLeaf {
            scope: scope.to_vec(),
            mean: if n_values == 0 { 0.0 } else { sum / n_values as f64 },
            n_rows: slice.n_rows(),
        }
    }
}

// =============================================================================
// Row splitters
// =============================================================================

/// Splits rows into two clusters around the mean of the first column.
///
/// Returns a single partition when all rows fall on one side. Proportions
/// are the cluster sizes relative to the slice.
#[derive(Debug, Default)]
pub struct ThresholdRowSplitter;

impl ThresholdRowSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl<C> RowSplitter<C> for ThresholdRowSplitter {
    fn split_rows<'a>(
        &mut self,
        slice: &DataSlice<'a>,
        _ctx: &C,
        scope: &[usize],
    ) -> Vec<RowPartition<'a>> {
        let n_rows = slice.n_rows();
        let mean = slice.column(0).sum::<f64>() / n_rows as f64;

        let (mut low, mut high) = (Vec::new(), Vec::new());
        for (row, value) in slice.column(0).enumerate() {
            if value <= mean {
                low.push(row);
            } else {
                high.push(row);
            }
        }

        [low, high]
            .into_iter()
            .filter(|rows| !rows.is_empty())
            .map(|rows| RowPartition {
                proportion: rows.len() as f64 / n_rows as f64,
                slice: slice.with_rows(&rows),
                scope: scope.to_vec(),
            })
            .collect()
    }
}

/// Splits rows at a fixed position with explicit proportions.
///
/// Useful for asserting weight/child alignment: the first partition covers
/// rows `[0, split_at)`, the second the rest. Degenerates to a single
/// partition when the cut falls outside the slice.
#[derive(Debug)]
pub struct FixedRowSplitter {
    pub split_at: usize,
    pub proportions: (f64, f64),
}

impl<C> RowSplitter<C> for FixedRowSplitter {
    fn split_rows<'a>(
        &mut self,
        slice: &DataSlice<'a>,
        _ctx: &C,
        scope: &[usize],
    ) -> Vec<RowPartition<'a>> {
        let n_rows = slice.n_rows();
        if self.split_at == 0 || self.split_at >= n_rows {
            return vec![RowPartition {
                slice: slice.clone(),
                scope: scope.to_vec(),
                proportion: 1.0,
            }];
        }

        let head: Vec<usize> = (0..self.split_at).collect();
        let tail: Vec<usize> = (self.split_at..n_rows).collect();
        vec![
            RowPartition {
                slice: slice.with_rows(&head),
                scope: scope.to_vec(),
                proportion: self.proportions.0,
            },
            RowPartition {
                slice: slice.with_rows(&tail),
                scope: scope.to_vec(),
                proportion: self.proportions.1,
            },
        ]
    }
}

/// Never finds row clusters: always returns the slice unchanged.
#[derive(Debug, Default)]
pub struct StubbornRowSplitter;

impl<C> RowSplitter<C> for StubbornRowSplitter {
    fn split_rows<'a>(
        &mut self,
        slice: &DataSlice<'a>,
        _ctx: &C,
        scope: &[usize],
    ) -> Vec<RowPartition<'a>> {
        vec![RowPartition {
            slice: slice.clone(),
            scope: scope.to_vec(),
            proportion: 1.0,
        }]
    }
}

// =============================================================================
// Column splitters
// =============================================================================

/// Splits the scope into two halves, pretending independence between them.
#[derive(Debug, Default)]
pub struct HalvingColSplitter;

impl HalvingColSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl<C> ColSplitter<C> for HalvingColSplitter {
    fn split_columns<'a>(
        &mut self,
        slice: &DataSlice<'a>,
        _ctx: &C,
        scope: &[usize],
    ) -> Vec<ColPartition<'a>> {
        if scope.len() < 2 {
            return vec![ColPartition {
                slice: slice.clone(),
                scope: scope.to_vec(),
            }];
        }

        let mid = scope.len() / 2;
        let left: Vec<usize> = (0..mid).collect();
        let right: Vec<usize> = (mid..scope.len()).collect();
        vec![
            ColPartition {
                slice: slice.slice_cols(&left),
                scope: left.iter().map(|&p| scope[p]).collect(),
            },
            ColPartition {
                slice: slice.slice_cols(&right),
                scope: right.iter().map(|&p| scope[p]).collect(),
            },
        ]
    }
}

/// Never finds independent column groups.
#[derive(Debug, Default)]
pub struct StubbornColSplitter;

impl<C> ColSplitter<C> for StubbornColSplitter {
    fn split_columns<'a>(
        &mut self,
        slice: &DataSlice<'a>,
        _ctx: &C,
        scope: &[usize],
    ) -> Vec<ColPartition<'a>> {
        vec![ColPartition {
            slice: slice.clone(),
            scope: scope.to_vec(),
        }]
    }
}

// =============================================================================
// Data generators
// =============================================================================

/// Random matrix with values uniform in `[0, 1)`, seeded for determinism.
pub fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.gen::<f64>())
}

/// Two-column matrix: column 0 constant, column 1 strictly increasing.
pub fn constant_and_varying(rows: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, 2), |(r, c)| if c == 0 { 5.0 } else { r as f64 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mean_leaf_fits_the_slice_mean() {
        let data = ndarray::array![[1.0, 3.0], [3.0, 5.0]];
        let slice = DataSlice::from_view(data.view());

        let mut factory = MeanLeafFactory::new();
        let leaf = LeafFactory::<()>::create_leaf(&mut factory, &slice, &(), &[0, 1]);

        assert_abs_diff_eq!(leaf.mean, 3.0);
        assert_eq!(leaf.n_rows, 2);
        assert_eq!(factory.created(), 1);
    }

    #[test]
    fn threshold_splitter_separates_two_populations() {
        let data = ndarray::array![[0.0], [0.1], [10.0], [10.1]];
        let slice = DataSlice::from_view(data.view());

        let mut splitter = ThresholdRowSplitter::new();
        let parts = RowSplitter::<()>::split_rows(&mut splitter, &slice, &(), &[0]);

        assert_eq!(parts.len(), 2);
        assert_abs_diff_eq!(parts[0].proportion, 0.5);
        assert_abs_diff_eq!(parts[1].proportion, 0.5);
        assert_eq!(parts[0].slice.n_rows(), 2);
    }

    #[test]
    fn threshold_splitter_returns_single_partition_for_constant_rows() {
        let data = ndarray::array![[2.0], [2.0], [2.0]];
        let slice = DataSlice::from_view(data.view());

        let mut splitter = ThresholdRowSplitter::new();
        let parts = RowSplitter::<()>::split_rows(&mut splitter, &slice, &(), &[0]);

        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn halving_splitter_maps_scopes_through() {
        let data = random_matrix(4, 3, 7);
        let slice = DataSlice::from_view(data.view());

        let mut splitter = HalvingColSplitter::new();
        let parts = ColSplitter::<()>::split_columns(&mut splitter, &slice, &(), &[2, 5, 9]);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].scope, vec![2]);
        assert_eq!(parts[1].scope, vec![5, 9]);
        assert_eq!(parts[0].slice.n_cols(), 1);
        assert_eq!(parts[1].slice.n_cols(), 2);
    }

    #[test]
    fn random_matrix_is_deterministic_per_seed() {
        assert_eq!(random_matrix(5, 2, 42), random_matrix(5, 2, 42));
        assert_ne!(random_matrix(5, 2, 42), random_matrix(5, 2, 43));
    }
}
