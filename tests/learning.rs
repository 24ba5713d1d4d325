//! Structure learning integration tests.
//!
//! End-to-end scenarios over the worklist builder with the reference
//! collaborators from `sumproduct::testing`.

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use sumproduct::data::DataSlice;
use sumproduct::learning::{
    learn_structure, ColPartition, ColSplitter, OperationPolicy, RowPartition, RowSplitter,
    StructureError, StructureLearner, StructureParams,
};
use sumproduct::repr::{is_valid, Node};
use sumproduct::testing::{
    constant_and_varying, random_matrix, FixedRowSplitter, HalvingColSplitter, MeanLeafFactory,
    StubbornColSplitter, StubbornRowSplitter, ThresholdRowSplitter,
};

fn leaf_scopes(root: &Node<sumproduct::testing::MeanLeaf>) -> Vec<Vec<usize>> {
    fn walk(node: &Node<sumproduct::testing::MeanLeaf>, out: &mut Vec<Vec<usize>>) {
        if node.is_leaf() {
            out.push(node.scope().to_vec());
        }
        for child in node.children() {
            walk(child, out);
        }
    }
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

#[test]
fn constant_column_is_factored_out() {
    // Column 0 constant, column 1 varying, 1000 rows, floor 100: the first
    // decision removes the uninformative column, and both branches resolve
    // straight to leaves.
    let data = constant_and_varying(1000);
    let policy = OperationPolicy::new(100);

    let root = learn_structure(
        data.view(),
        &(),
        &mut ThresholdRowSplitter::new(),
        &mut HalvingColSplitter::new(),
        &mut MeanLeafFactory::new(),
        &policy,
        None,
    )
    .unwrap();

    match &root {
        Node::Product(p) => {
            assert_eq!(p.scope, vec![0, 1]);
            assert_eq!(p.children.len(), 2);
            assert!(p.children.iter().all(Node::is_leaf));
        }
        other => panic!("expected product root, got {other:?}"),
    }
    assert_eq!(leaf_scopes(&root), vec![vec![0], vec![1]]);
    assert!(is_valid(&root).is_ok());
}

#[test]
fn all_constant_columns_become_one_naive_factorization() {
    // Three constant columns: a single Product with one leaf per column.
    let data = Array2::from_shape_fn((50, 3), |(_, c)| c as f64);
    let policy = OperationPolicy::new(10);

    let root = learn_structure(
        data.view(),
        &(),
        &mut ThresholdRowSplitter::new(),
        &mut HalvingColSplitter::new(),
        &mut MeanLeafFactory::new(),
        &policy,
        None,
    )
    .unwrap();

    match &root {
        Node::Product(p) => {
            assert_eq!(p.children.len(), 3);
            assert!(p.children.iter().all(Node::is_leaf));
        }
        other => panic!("expected product root, got {other:?}"),
    }
    assert_eq!(leaf_scopes(&root), vec![vec![0], vec![1], vec![2]]);
}

#[test]
fn stubborn_splitters_terminate_in_naive_factorization() {
    // Both splitters always return a single partition. The task lineage
    // escalates no-clusters, then no-independencies, then falls back to
    // naive factorization over the full scope. Must not loop forever.
    let data = random_matrix(500, 2, 11);
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

    match &root {
        Node::Product(p) => {
            assert_eq!(p.scope, vec![0, 1]);
            assert_eq!(p.children.len(), 2);
        }
        other => panic!("expected product root, got {other:?}"),
    }

    // The re-enqueued task kept its slice: every leaf still sees all rows.
    for child in root.children() {
        match child {
            Node::Leaf(leaf) => assert_eq!(leaf.model.n_rows, 500),
            other => panic!("expected leaf, got {other:?}"),
        }
    }
}

#[test]
fn row_split_weights_align_with_children_in_order() {
    // A fixed two-way row split with proportions 0.3 / 0.7: the Sum node
    // must keep children and weights in split order.
    let data = random_matrix(40, 2, 3);
    let mut row_splitter = FixedRowSplitter {
        split_at: 12,
        proportions: (0.3, 0.7),
    };
    let policy = OperationPolicy::new(5);

    let root = learn_structure(
        data.view(),
        &(),
        &mut row_splitter,
        &mut HalvingColSplitter::new(),
        &mut MeanLeafFactory::new(),
        &policy,
        None,
    )
    .unwrap();

    match &root {
        Node::Sum(s) => {
            assert_eq!(s.children.len(), 2);
            assert_eq!(s.weights.len(), 2);
            assert_abs_diff_eq!(s.weights[0], 0.3);
            assert_abs_diff_eq!(s.weights[1], 0.7);

            // Children are column factorizations of the 12-row and 28-row
            // clusters, in that order.
            for (child, expected_rows) in s.children.iter().zip([12usize, 28]) {
                match child {
                    Node::Product(p) => {
                        for grandchild in &p.children {
                            match grandchild {
                                Node::Leaf(leaf) => assert_eq!(leaf.model.n_rows, expected_rows),
                                other => panic!("expected leaf, got {other:?}"),
                            }
                        }
                    }
                    other => panic!("expected product child, got {other:?}"),
                }
            }
        }
        other => panic!("expected sum root, got {other:?}"),
    }
    assert!(is_valid(&root).is_ok());
}

#[test]
fn failed_row_split_escalates_to_column_split() {
    // Rows never cluster, columns split in half: the first task re-enqueues
    // itself with no-clusters set, then resolves as a Product of leaves.
    let data = random_matrix(500, 2, 19);
    let policy = OperationPolicy::new(100);

    let root = learn_structure(
        data.view(),
        &(),
        &mut StubbornRowSplitter,
        &mut HalvingColSplitter::new(),
        &mut MeanLeafFactory::new(),
        &policy,
        None,
    )
    .unwrap();

    assert_eq!(leaf_scopes(&root), vec![vec![0], vec![1]]);
    for child in root.children() {
        match child {
            Node::Leaf(leaf) => assert_eq!(leaf.model.n_rows, 500),
            other => panic!("expected leaf, got {other:?}"),
        }
    }
}

#[test]
fn univariate_clustering_builds_a_mixture() {
    // One bimodal column with the univariate-clustering override: the root
    // becomes a Sum over two constant sub-populations.
    let mut values = vec![1.0; 5];
    values.extend(vec![10.0; 5]);
    let data = Array2::from_shape_vec((10, 1), values).unwrap();

    let params = StructureParams::builder()
        .min_instances_slice(4)
        .cluster_univariate(true)
        .build()
        .unwrap();
    let mut learner = StructureLearner::new(
        ThresholdRowSplitter::new(),
        StubbornColSplitter,
        MeanLeafFactory::new(),
        params,
    );

    let root = learner.learn(data.view(), &(), None).unwrap();

    match &root {
        Node::Sum(s) => {
            assert_eq!(s.children.len(), 2);
            assert_abs_diff_eq!(s.weights[0], 0.5);
            assert_abs_diff_eq!(s.weights[1], 0.5);
            assert!(s.children.iter().all(Node::is_leaf));
        }
        other => panic!("expected sum root, got {other:?}"),
    }
}

#[test]
fn small_dataset_goes_straight_to_naive_factorization() {
    // Row count at the floor: no splitting is attempted at all.
    let data = random_matrix(100, 3, 23);
    let policy = OperationPolicy::new(100);

    let root = learn_structure(
        data.view(),
        &(),
        &mut ThresholdRowSplitter::new(),
        &mut HalvingColSplitter::new(),
        &mut MeanLeafFactory::new(),
        &policy,
        None,
    )
    .unwrap();

    assert_eq!(leaf_scopes(&root), vec![vec![0], vec![1], vec![2]]);
}

#[test]
fn initial_scope_restricts_the_learned_network() {
    let data = random_matrix(50, 3, 31);
    let policy = OperationPolicy::new(100);

    let root = learn_structure(
        data.view(),
        &(),
        &mut StubbornRowSplitter,
        &mut StubbornColSplitter,
        &mut MeanLeafFactory::new(),
        &policy,
        Some(vec![0, 1]),
    )
    .unwrap();

    assert_eq!(root.scope(), &[0, 1]);
    assert_eq!(leaf_scopes(&root), vec![vec![0], vec![1]]);
}

#[test]
fn learner_is_deterministic_across_runs() {
    let data = random_matrix(300, 4, 7);
    let params = StructureParams::builder().min_instances_slice(50).build().unwrap();

    let mut learner = StructureLearner::new(
        ThresholdRowSplitter::new(),
        HalvingColSplitter::new(),
        MeanLeafFactory::new(),
        params,
    );

    assert_eq!(learner.params().min_instances_slice, 50);

    let first = learner.learn(data.view(), &(), None).unwrap();
    let second = learner.learn(data.view(), &(), None).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Contract violations
// =============================================================================

struct EmptyRowSplitter;

impl<C> RowSplitter<C> for EmptyRowSplitter {
    fn split_rows<'a>(
        &mut self,
        _slice: &DataSlice<'a>,
        _ctx: &C,
        _scope: &[usize],
    ) -> Vec<RowPartition<'a>> {
        Vec::new()
    }
}

struct OutOfScopeColSplitter;

impl<C> ColSplitter<C> for OutOfScopeColSplitter {
    fn split_columns<'a>(
        &mut self,
        slice: &DataSlice<'a>,
        _ctx: &C,
        scope: &[usize],
    ) -> Vec<ColPartition<'a>> {
        vec![
            ColPartition {
                slice: slice.slice_cols(&[0]),
                scope: vec![99],
            },
            ColPartition {
                slice: slice.slice_cols(&[1]),
                scope: vec![scope[1]],
            },
        ]
    }
}

#[test]
fn empty_row_split_is_a_contract_violation() {
    let data = random_matrix(500, 2, 5);
    let policy = OperationPolicy::new(100);

    let result = learn_structure(
        data.view(),
        &(),
        &mut EmptyRowSplitter,
        &mut HalvingColSplitter::new(),
        &mut MeanLeafFactory::new(),
        &policy,
        None,
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
fn out_of_scope_column_split_is_a_contract_violation() {
    let data = random_matrix(500, 2, 5);
    let policy = OperationPolicy::new(100);

    let result = learn_structure(
        data.view(),
        &(),
        &mut StubbornRowSplitter,
        &mut OutOfScopeColSplitter,
        &mut MeanLeafFactory::new(),
        &policy,
        None,
    );

    assert_eq!(
        result.unwrap_err(),
        StructureError::ScopeNotContained {
            returned: vec![99],
            scope: vec![0, 1]
        }
    );
}
