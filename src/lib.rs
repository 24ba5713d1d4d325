//! sumproduct: structure learning for sum-product networks.
//!
//! Builds a hierarchical probabilistic model (a tree of alternating mixture
//! and factorization nodes with leaf distributions at the fringe) from a
//! tabular dataset, by recursively deciding at every row/column subset which
//! structural operation to apply next.
//!
//! # Key Types
//!
//! - [`learn_structure`] / [`StructureLearner`] - The worklist-driven builder
//! - [`OperationPolicy`] / [`Operation`] - Deterministic operation selection
//! - [`Node`] - The learned network (Sum / Product / Leaf)
//! - [`StructureParams`] - Configuration builder
//! - [`RowSplitter`], [`ColSplitter`], [`LeafFactory`] - Collaborator
//!   contracts for clustering, independence splitting and leaf fitting
//!
//! # Learning
//!
//! Supply the three collaborators and call [`learn_structure`] over an
//! `ndarray` view of the dataset; the result is a single validated, pruned,
//! ID-assigned [`Node`]. See the [`learning`] module for details.
//!
//! The concrete clustering and independence-test algorithms are out of
//! scope; the [`testing`] module ships trivial reference implementations
//! of the contracts.

pub mod data;
pub mod learning;
pub mod repr;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Core entry points
pub use learning::{learn_structure, StructureLearner};

// Policy and configuration
pub use learning::{Operation, OperationPolicy, StructureParams, Verbosity};

// Collaborator contracts
pub use learning::{ColPartition, ColSplitter, LeafFactory, RowPartition, RowSplitter};

// Errors
pub use learning::{ParamsError, StructureError};

// Network representation
pub use repr::{assign_ids, is_valid, prune, LeafNode, Node, NodeId, ProductNode, SumNode, ValidityError};

// Data views
pub use data::DataSlice;
