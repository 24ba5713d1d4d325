//! Worklist-driven structure builder.
//!
//! [`learn_structure`] drives a breadth-first worklist over (row, column)
//! slices of the dataset. Each iteration pops a task, asks the
//! [`OperationPolicy`] what to do with it, and either splices a new node
//! into the partially built tree or fits a leaf and terminates the branch.
//!
//! The tree is built out of order through an arena of pending nodes with
//! placeholder child slots; a task addresses its destination as
//! (parent node, slot index). When the worklist drains, every slot has been
//! filled exactly once and the arena is frozen into the final [`Node`].

use std::collections::VecDeque;
use std::time::Instant;

use ndarray::ArrayView2;

use crate::data::DataSlice;
use crate::repr::{assign_ids, is_valid, prune, LeafNode, Node, ProductNode, SumNode};

use super::error::StructureError;
use super::logger::LearnLogger;
use super::params::StructureParams;
use super::policy::{Operation, OperationPolicy};
use super::splits::{ColSplitter, LeafFactory, RowSplitter};

// =============================================================================
// Pending tree arena
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Sum,
    Product,
}

/// Resolved content of a child slot: either another arena node or a leaf.
#[derive(Debug)]
enum ChildRef<L> {
    Pending(usize),
    Leaf(LeafNode<L>),
}

/// An under-construction Sum or Product node.
///
/// `children` holds one entry per allocated slot; `None` is a placeholder
/// that a pending task will fill. For sums, `weights` is kept aligned with
/// `children` by construction.
#[derive(Debug)]
struct PendingNode<L> {
    kind: PendingKind,
    scope: Vec<usize>,
    weights: Vec<f64>,
    children: Vec<Option<ChildRef<L>>>,
}

impl<L> PendingNode<L> {
    fn placeholder() -> Self {
        Self {
            kind: PendingKind::Product,
            scope: Vec::new(),
            weights: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Arena of pending nodes, addressed by index.
struct Arena<L> {
    nodes: Vec<PendingNode<L>>,
}

impl<L> Arena<L> {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, kind: PendingKind, scope: Vec<usize>) -> usize {
        self.nodes.push(PendingNode {
            kind,
            scope,
            weights: Vec::new(),
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Allocate an empty child slot, returning its index.
    fn add_slot(&mut self, node: usize) -> usize {
        self.nodes[node].children.push(None);
        self.nodes[node].children.len() - 1
    }

    /// Allocate an empty child slot with an aligned mixture weight.
    fn add_weighted_slot(&mut self, node: usize, weight: f64) -> usize {
        self.nodes[node].weights.push(weight);
        self.add_slot(node)
    }

    /// Resolve a placeholder. Each slot is filled exactly once.
    fn fill(&mut self, node: usize, slot: usize, child: ChildRef<L>) {
        let entry = &mut self.nodes[node].children[slot];
        debug_assert!(entry.is_none(), "slot filled twice");
        *entry = Some(child);
    }

    /// Freeze the arena into an owned tree, starting from the single child
    /// of the synthetic root.
    fn freeze(mut self, root: usize) -> Result<Node<L>, StructureError> {
        let child = self.nodes[root].children[0]
            .take()
            .ok_or(StructureError::UnfilledSlot { slot: 0 })?;
        self.freeze_child(child)
    }

    fn freeze_child(&mut self, child: ChildRef<L>) -> Result<Node<L>, StructureError> {
        match child {
            ChildRef::Leaf(leaf) => Ok(Node::Leaf(leaf)),
            ChildRef::Pending(index) => {
                let mut pending =
                    std::mem::replace(&mut self.nodes[index], PendingNode::placeholder());
                let mut children = Vec::with_capacity(pending.children.len());
                for (slot, entry) in pending.children.drain(..).enumerate() {
                    let entry = entry.ok_or(StructureError::UnfilledSlot { slot })?;
                    children.push(self.freeze_child(entry)?);
                }
                Ok(match pending.kind {
                    PendingKind::Sum => Node::Sum(SumNode {
                        id: 0,
                        scope: pending.scope,
                        weights: pending.weights,
                        children,
                    }),
                    PendingKind::Product => Node::Product(ProductNode {
                        id: 0,
                        scope: pending.scope,
                        children,
                    }),
                })
            }
        }
    }
}

// =============================================================================
// Tasks
// =============================================================================

/// One unit of pending work: a data slice destined for a placeholder slot.
///
/// The two flags record per-lineage attempt history: "clustering already
/// yielded nothing" and "independence splitting already yielded nothing".
/// Each can only flip false to true once per lineage, which bounds the
/// re-enqueue paths.
struct Task<'a> {
    slice: DataSlice<'a>,
    parent: usize,
    slot: usize,
    scope: Vec<usize>,
    no_clusters: bool,
    no_independencies: bool,
}

// =============================================================================
// learn_structure
// =============================================================================

/// Learn a sum-product network structure over `data`.
///
/// Seeds a FIFO worklist with one task covering the whole dataset and
/// `initial_scope` (all columns in order when `None`), then drains it.
/// After the drain the synthetic root wrapper is discarded, ids are
/// assigned, the tree is pruned and validated.
///
/// Breadth-first order keeps the worklist bounded by the frontier width
/// (at most the eventual leaf count) instead of the total node count.
///
/// # Errors
///
/// See [`StructureError`] for the taxonomy; a validity failure after
/// pruning is a defect in tree construction, not a user input error.
pub fn learn_structure<C, R, K, F>(
    data: ArrayView2<'_, f64>,
    ctx: &C,
    split_rows: &mut R,
    split_columns: &mut K,
    create_leaf: &mut F,
    policy: &OperationPolicy,
    initial_scope: Option<Vec<usize>>,
) -> Result<Node<F::Leaf>, StructureError>
where
    R: RowSplitter<C>,
    K: ColSplitter<C>,
    F: LeafFactory<C>,
{
    let logger = LearnLogger::new(super::Verbosity::Silent);
    learn_with_logger(
        data,
        ctx,
        split_rows,
        split_columns,
        create_leaf,
        policy,
        initial_scope,
        &logger,
    )
}

#[allow(clippy::too_many_arguments)]
pub(super) fn learn_with_logger<C, R, K, F>(
    data: ArrayView2<'_, f64>,
    ctx: &C,
    split_rows: &mut R,
    split_columns: &mut K,
    create_leaf: &mut F,
    policy: &OperationPolicy,
    initial_scope: Option<Vec<usize>>,
    logger: &LearnLogger,
) -> Result<Node<F::Leaf>, StructureError>
where
    R: RowSplitter<C>,
    K: ColSplitter<C>,
    F: LeafFactory<C>,
{
    let start = Instant::now();

    let (n_rows, n_cols) = (data.nrows(), data.ncols());
    if n_rows == 0 || n_cols == 0 {
        return Err(StructureError::EmptyDataset { n_rows, n_cols });
    }

    let initial_scope = match initial_scope {
        Some(scope) => {
            if let Some(&column) = scope.iter().find(|&&c| c >= n_cols) {
                return Err(StructureError::ScopeOutOfBounds { column, n_cols });
            }
            scope
        }
        None => (0..n_cols).collect(),
    };

    // Synthetic root: a Product with a single placeholder child. The real
    // root is whatever ends up in that slot.
    let mut arena: Arena<F::Leaf> = Arena::new();
    let root = arena.push(PendingKind::Product, Vec::new());
    let seed_slot = arena.add_slot(root);

    let mut tasks: VecDeque<Task<'_>> = VecDeque::new();
    tasks.push_back(Task {
        slice: DataSlice::from_view(data),
        parent: root,
        slot: seed_slot,
        scope: initial_scope,
        no_clusters: false,
        no_independencies: false,
    });

    while let Some(task) = tasks.pop_front() {
        let is_first = task.parent == root;
        let operation = policy.next_operation(
            &task.slice,
            &task.scope,
            task.no_clusters,
            task.no_independencies,
            is_first,
        );
        logger.operation(&operation, task.slice.n_rows(), task.slice.n_cols(), tasks.len());

        match operation {
            Operation::RemoveUninformativeFeatures(positions) => {
                let node = arena.push(PendingKind::Product, task.scope.clone());
                arena.fill(task.parent, task.slot, ChildRef::Pending(node));

                let mut removed = vec![false; task.scope.len()];
                for &position in &positions {
                    removed[position] = true;
                }

                // One branch per constant column, forced straight toward a
                // leaf or naive factorization.
                for &position in &positions {
                    let slot = arena.add_slot(node);
                    tasks.push_back(Task {
                        slice: task.slice.slice_cols(&[position]),
                        parent: node,
                        slot,
                        scope: vec![task.scope[position]],
                        no_clusters: true,
                        no_independencies: true,
                    });
                }

                // The informative columns continue as one group. A single
                // remaining column is already univariate, so its follow-up
                // must not re-attempt splitting either.
                let rest: Vec<usize> = (0..task.scope.len()).filter(|&p| !removed[p]).collect();
                let rest_scope: Vec<usize> = rest.iter().map(|&p| task.scope[p]).collect();
                let rest_is_final = rest.len() == 1;
                let slot = arena.add_slot(node);
                tasks.push_back(Task {
                    slice: task.slice.slice_cols(&rest),
                    parent: node,
                    slot,
                    scope: rest_scope,
                    no_clusters: rest_is_final,
                    no_independencies: rest_is_final,
                });
            }

            Operation::SplitRows => {
                let split_start = Instant::now();
                let partitions = split_rows.split_rows(&task.slice, ctx, &task.scope);
                logger.split("row", partitions.len(), split_start.elapsed());

                if partitions.is_empty() {
                    logger.contract_violation("row splitter returned no partitions");
                    return Err(StructureError::EmptySplit {
                        kind: "row",
                        scope: task.scope,
                    });
                }
                if partitions.len() == 1 {
                    // No row structure found: escalate only the clustering
                    // flag and try again. The independence flag is
                    // deliberately left as-is.
                    tasks.push_back(Task {
                        no_clusters: true,
                        ..task
                    });
                    continue;
                }

                let node = arena.push(PendingKind::Sum, task.scope.clone());
                arena.fill(task.parent, task.slot, ChildRef::Pending(node));

                for partition in partitions {
                    let slot = arena.add_weighted_slot(node, partition.proportion);
                    tasks.push_back(Task {
                        slice: partition.slice,
                        parent: node,
                        slot,
                        scope: task.scope.clone(),
                        no_clusters: false,
                        no_independencies: false,
                    });
                }
            }

            Operation::SplitColumns => {
                let split_start = Instant::now();
                let partitions = split_columns.split_columns(&task.slice, ctx, &task.scope);
                logger.split("column", partitions.len(), split_start.elapsed());

                if partitions.is_empty() {
                    logger.contract_violation("column splitter returned no partitions");
                    return Err(StructureError::EmptySplit {
                        kind: "column",
                        scope: task.scope,
                    });
                }
                if partitions.len() == 1 {
                    // Mirror of the single-cluster case above: only the
                    // independence flag escalates.
                    tasks.push_back(Task {
                        no_independencies: true,
                        ..task
                    });
                    continue;
                }

                let node = arena.push(PendingKind::Product, task.scope.clone());
                arena.fill(task.parent, task.slot, ChildRef::Pending(node));

                for partition in partitions {
                    if !partition.scope.iter().all(|c| task.scope.contains(c)) {
                        logger.contract_violation("column splitter returned a scope outside the task scope");
                        return Err(StructureError::ScopeNotContained {
                            returned: partition.scope,
                            scope: task.scope,
                        });
                    }
                    let slot = arena.add_slot(node);
                    tasks.push_back(Task {
                        slice: partition.slice,
                        parent: node,
                        slot,
                        scope: partition.scope,
                        no_clusters: false,
                        no_independencies: false,
                    });
                }
            }

            Operation::NaiveFactorization => {
                let node = arena.push(PendingKind::Product, task.scope.clone());
                arena.fill(task.parent, task.slot, ChildRef::Pending(node));

                for position in 0..task.scope.len() {
                    let slot = arena.add_slot(node);
                    tasks.push_back(Task {
                        slice: task.slice.slice_cols(&[position]),
                        parent: node,
                        slot,
                        scope: vec![task.scope[position]],
                        no_clusters: true,
                        no_independencies: true,
                    });
                }
            }

            Operation::CreateLeaf => {
                let leaf_start = Instant::now();
                let model = create_leaf.create_leaf(&task.slice, ctx, &task.scope);
                logger.leaf(&task.scope, leaf_start.elapsed());

                arena.fill(
                    task.parent,
                    task.slot,
                    ChildRef::Leaf(LeafNode {
                        id: 0,
                        scope: task.scope,
                        model,
                    }),
                );
            }
        }
    }

    let mut node = arena.freeze(root)?;
    assign_ids(&mut node);
    let node = prune(node);
    is_valid(&node)?;

    logger.finished(node.n_nodes(), start.elapsed());
    Ok(node)
}

// =============================================================================
// StructureLearner
// =============================================================================

/// Owns the collaborators and configuration for repeated learning runs.
///
/// Thin wrapper over [`learn_structure`] in the style of a trainer: the
/// policy is derived from [`StructureParams`] and the logger from its
/// verbosity.
///
/// # Example
///
/// ```
/// use ndarray::Array2;
/// use sumproduct::learning::{StructureLearner, StructureParams};
/// use sumproduct::testing::{HalvingColSplitter, MeanLeafFactory, ThresholdRowSplitter};
///
/// let data = Array2::from_shape_fn((200, 2), |(r, c)| (r * 2 + c) as f64);
/// let params = StructureParams::builder().min_instances_slice(50).build().unwrap();
/// let mut learner = StructureLearner::new(
///     ThresholdRowSplitter::new(),
///     HalvingColSplitter::new(),
///     MeanLeafFactory::new(),
///     params,
/// );
/// let root = learner.learn(data.view(), &(), None).unwrap();
/// assert!(root.n_leaves() >= 2);
/// ```
pub struct StructureLearner<R, K, F> {
    row_splitter: R,
    col_splitter: K,
    leaf_factory: F,
    policy: OperationPolicy,
    params: StructureParams,
}

impl<R, K, F> StructureLearner<R, K, F> {
    /// Create a learner from collaborators and parameters.
    pub fn new(row_splitter: R, col_splitter: K, leaf_factory: F, params: StructureParams) -> Self {
        let policy = OperationPolicy::from_params(&params);
        Self {
            row_splitter,
            col_splitter,
            leaf_factory,
            policy,
            params,
        }
    }

    /// Get reference to parameters.
    pub fn params(&self) -> &StructureParams {
        &self.params
    }

    /// Learn a structure over `data`.
    ///
    /// `initial_scope` defaults to all columns in order.
    pub fn learn<C>(
        &mut self,
        data: ArrayView2<'_, f64>,
        ctx: &C,
        initial_scope: Option<Vec<usize>>,
    ) -> Result<Node<F::Leaf>, StructureError>
    where
        R: RowSplitter<C>,
        K: ColSplitter<C>,
        F: LeafFactory<C>,
    {
        let logger = LearnLogger::new(self.params.verbosity);
        learn_with_logger(
            data,
            ctx,
            &mut self.row_splitter,
            &mut self.col_splitter,
            &mut self.leaf_factory,
            &self.policy,
            initial_scope,
            &logger,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::{RowPartition, Verbosity};
    use crate::testing::{MeanLeafFactory, StubbornColSplitter, StubbornRowSplitter};
    use ndarray::Array2;

    #[test]
    fn empty_dataset_is_rejected() {
        let data = Array2::<f64>::zeros((0, 3));
        let policy = OperationPolicy::new(100);
        let result = learn_structure(
            data.view(),
            &(),
            &mut StubbornRowSplitter,
            &mut StubbornColSplitter,
            &mut MeanLeafFactory::new(),
            &policy,
            None,
        );
        assert_eq!(
            result.unwrap_err(),
            StructureError::EmptyDataset { n_rows: 0, n_cols: 3 }
        );
    }

    #[test]
    fn out_of_bounds_initial_scope_is_rejected() {
        let data = Array2::<f64>::zeros((10, 2));
        let policy = OperationPolicy::new(100);
        let result = learn_structure(
            data.view(),
            &(),
            &mut StubbornRowSplitter,
            &mut StubbornColSplitter,
            &mut MeanLeafFactory::new(),
            &policy,
            Some(vec![0, 5]),
        );
        assert_eq!(
            result.unwrap_err(),
            StructureError::ScopeOutOfBounds { column: 5, n_cols: 2 }
        );
    }

    struct NoPartitions;

    impl<C> RowSplitter<C> for NoPartitions {
        fn split_rows<'a>(
            &mut self,
            _slice: &DataSlice<'a>,
            _ctx: &C,
            _scope: &[usize],
        ) -> Vec<RowPartition<'a>> {
            Vec::new()
        }
    }

    #[test]
    fn contract_violation_warns_and_errors() {
        let data = Array2::from_shape_fn((200, 2), |(r, c)| (r * 2 + c) as f64);
        let policy = OperationPolicy::new(100);
        let logger = LearnLogger::new(Verbosity::Warning);

        let result = learn_with_logger(
            data.view(),
            &(),
            &mut NoPartitions,
            &mut StubbornColSplitter,
            &mut MeanLeafFactory::new(),
            &policy,
            None,
            &logger,
        );

        assert_eq!(
            result.unwrap_err(),
            StructureError::EmptySplit {
                kind: "row",
                scope: vec![0, 1]
            }
        );
    }

    #[test]
    fn single_row_dataset_terminates_with_leaves() {
        let data = Array2::from_shape_vec((1, 2), vec![1.0, 2.0]).unwrap();
        let policy = OperationPolicy::new(100);
        let root = learn_structure(
            data.view(),
            &(),
            &mut StubbornRowSplitter,
            &mut StubbornColSplitter,
            &mut MeanLeafFactory::new(),
            &policy,
            None,
        )
        .unwrap();

        // One row means every column is constant: naive factorization.
        assert_eq!(root.n_leaves(), 2);
    }
}
