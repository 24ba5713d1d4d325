//! Error taxonomy for structure learning.

use thiserror::Error;

use crate::repr::ValidityError;

/// Errors raised by [`learn_structure`](super::learn_structure).
///
/// Preconditions (`EmptyDataset`, `ScopeOutOfBounds`) are configuration
/// defects caught before any work happens. `EmptySplit` and
/// `ScopeNotContained` indicate a buggy collaborator, not recoverable
/// input. `UnfilledSlot` and `Invalid` are internal invariant violations:
/// the builder must never return a tree that fails them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    /// The dataset has zero rows or zero columns.
    #[error("dataset must be non-empty, got {n_rows} rows x {n_cols} columns")]
    EmptyDataset { n_rows: usize, n_cols: usize },

    /// An initial scope entry does not name a dataset column.
    #[error("initial scope entry {column} is out of bounds for a dataset with {n_cols} columns")]
    ScopeOutOfBounds { column: usize, n_cols: usize },

    /// A splitter returned an empty partition list.
    #[error("{kind} splitter returned no partitions for scope {scope:?}")]
    EmptySplit {
        kind: &'static str,
        scope: Vec<usize>,
    },

    /// The column splitter returned a scope outside the incoming scope.
    #[error("column splitter returned scope {returned:?} not contained in {scope:?}")]
    ScopeNotContained {
        returned: Vec<usize>,
        scope: Vec<usize>,
    },

    /// A child placeholder was never resolved before the worklist drained.
    #[error("child slot {slot} was never filled")]
    UnfilledSlot { slot: usize },

    /// The finished tree failed structural validation.
    #[error("learned structure failed validation: {0}")]
    Invalid(#[from] ValidityError),
}
