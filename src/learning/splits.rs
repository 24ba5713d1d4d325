//! Collaborator contracts consumed by the structure builder.
//!
//! The builder does not know how rows are clustered, how columns are tested
//! for independence, or how leaf distributions are fitted. Those concerns
//! are supplied through the traits below; the builder only requires that
//! the returned partitions are views into the same dataset and that column
//! partitions stay within the incoming scope.
//!
//! The `ctx` argument is an opaque per-dataset descriptor, passed through
//! unexamined to every collaborator call.

use crate::data::DataSlice;

/// One row cluster produced by a [`RowSplitter`].
#[derive(Debug, Clone)]
pub struct RowPartition<'a> {
    /// Row subset of the incoming slice.
    pub slice: DataSlice<'a>,
    /// Scope of the cluster; row splits do not change scope.
    pub scope: Vec<usize>,
    /// Mixture proportion for this cluster. Proportions across a split need
    /// not sum to one.
    pub proportion: f64,
}

/// One column group produced by a [`ColSplitter`].
#[derive(Debug, Clone)]
pub struct ColPartition<'a> {
    /// Column subset of the incoming slice.
    pub slice: DataSlice<'a>,
    /// Scope of the group; must be a subset of the incoming scope.
    pub scope: Vec<usize>,
}

/// Clusters the rows of a slice into sub-populations.
///
/// Must return at least one partition. Returning a single partition signals
/// that no row structure was found; the builder reacts by escalating the
/// task's no-clusters flag instead of creating a node.
pub trait RowSplitter<C> {
    fn split_rows<'a>(
        &mut self,
        slice: &DataSlice<'a>,
        ctx: &C,
        scope: &[usize],
    ) -> Vec<RowPartition<'a>>;
}

/// Splits the columns of a slice into (approximately) independent groups.
///
/// Must return at least one partition, each with a scope contained in the
/// incoming scope. A single partition signals that no independent groups
/// were found.
pub trait ColSplitter<C> {
    fn split_columns<'a>(
        &mut self,
        slice: &DataSlice<'a>,
        ctx: &C,
        scope: &[usize],
    ) -> Vec<ColPartition<'a>>;
}

/// Fits a terminal distribution over a slice.
///
/// The leaf type is opaque to the builder; it is wrapped into a
/// [`LeafNode`](crate::repr::LeafNode) and placed into the tree unchanged.
pub trait LeafFactory<C> {
    type Leaf;

    fn create_leaf(&mut self, slice: &DataSlice<'_>, ctx: &C, scope: &[usize]) -> Self::Leaf;
}
