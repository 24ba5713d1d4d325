//! Operation selection for the structure builder.

use crate::data::DataSlice;

use super::params::StructureParams;

/// Structural operation chosen for one unit of pending work.
///
/// The set is closed: every variant has a handler in the builder, so there
/// is no unreachable-operation failure mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Fit a terminal distribution and stop expanding this branch.
    CreateLeaf,
    /// Ask the column splitter for independent column groups.
    SplitColumns,
    /// Ask the row splitter for row clusters.
    SplitRows,
    /// Treat every remaining column as independent.
    NaiveFactorization,
    /// Factor out the given zero-variance columns (scope-relative positions,
    /// ascending) before any further clustering.
    RemoveUninformativeFeatures(Vec<usize>),
}

/// Deterministic operation-selection policy.
///
/// A pure decision function: the same slice, scope and flags always produce
/// the same operation. Rules are checked in priority order; the first match
/// wins.
///
/// 1. Univariate scope: leaf if the slice is small enough or clustering is
///    exhausted; otherwise cluster rows only if `cluster_univariate` allows.
/// 2. Zero-variance columns: factor all columns out if every column is
///    constant, else remove just the constant ones.
/// 3. Row floor reached, or both split kinds exhausted: naive factorization.
/// 4. Only independence splitting exhausted: cluster rows.
/// 5. Only clustering exhausted: split columns.
/// 6. First task: the configured opening move (`cluster_first`).
/// 7. Default: split columns.
#[derive(Debug, Clone)]
pub struct OperationPolicy {
    /// Row-count floor below which a slice is no longer clustered.
    min_instances_slice: usize,
    /// Opening move for the very first task: rows before columns.
    cluster_first: bool,
    /// Whether univariate slices may still be row-clustered.
    cluster_univariate: bool,
}

impl OperationPolicy {
    /// Policy with the given row-count floor and default tie-breaks
    /// (cluster rows first, never cluster univariate slices).
    pub fn new(min_instances_slice: usize) -> Self {
        Self {
            min_instances_slice,
            cluster_first: true,
            cluster_univariate: false,
        }
    }

    /// Policy configured from [`StructureParams`].
    pub fn from_params(params: &StructureParams) -> Self {
        Self {
            min_instances_slice: params.min_instances_slice,
            cluster_first: params.cluster_first,
            cluster_univariate: params.cluster_univariate,
        }
    }

    /// Select the next operation for a slice.
    ///
    /// `no_clusters` / `no_independencies` record that the respective split
    /// was already attempted on this task lineage and yielded nothing.
    /// `is_first` marks the seed task of a learning run.
    pub fn next_operation(
        &self,
        slice: &DataSlice<'_>,
        scope: &[usize],
        no_clusters: bool,
        no_independencies: bool,
        is_first: bool,
    ) -> Operation {
        let minimal_instances = slice.n_rows() <= self.min_instances_slice;

        if scope.len() == 1 {
            if minimal_instances || no_clusters {
                return Operation::CreateLeaf;
            }
            return if self.cluster_univariate {
                Operation::SplitRows
            } else {
                Operation::CreateLeaf
            };
        }

        let uninformative = slice.zero_variance_cols(scope.len());
        if !uninformative.is_empty() {
            if uninformative.len() == slice.n_cols() {
                return Operation::NaiveFactorization;
            }
            return Operation::RemoveUninformativeFeatures(uninformative);
        }

        if minimal_instances || (no_clusters && no_independencies) {
            return Operation::NaiveFactorization;
        }

        if no_independencies {
            return Operation::SplitRows;
        }

        if no_clusters {
            return Operation::SplitColumns;
        }

        if is_first {
            return if self.cluster_first {
                Operation::SplitRows
            } else {
                Operation::SplitColumns
            };
        }

        Operation::SplitColumns
    }
}
