//! Structural validity checks for sum-product networks.
//!
//! A network is valid when every sum is *complete* (all children share the
//! sum's scope) and every product is *decomposable* (children cover disjoint
//! parts of the product's scope, together covering all of it).

use std::collections::BTreeSet;

use thiserror::Error;

use super::node::{Node, NodeId};

/// Reasons a network can fail structural validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidityError {
    /// A node has an empty scope.
    #[error("node {id} has an empty scope")]
    EmptyScope { id: NodeId },

    /// A sum or product node has no children.
    #[error("node {id} has no children")]
    NoChildren { id: NodeId },

    /// A sum node's weight list is not aligned with its children.
    #[error("sum node {id} has {children} children but {weights} weights")]
    WeightChildMismatch {
        id: NodeId,
        children: usize,
        weights: usize,
    },

    /// A sum node carries a non-positive mixture weight.
    #[error("sum node {id} has non-positive weight {weight} at position {position}")]
    NonPositiveWeight {
        id: NodeId,
        position: usize,
        weight: f64,
    },

    /// A sum child does not cover its parent's scope (incompleteness).
    #[error("sum node {id} has a child with scope {child_scope:?}, expected {scope:?}")]
    IncompleteSum {
        id: NodeId,
        scope: Vec<usize>,
        child_scope: Vec<usize>,
    },

    /// Product children do not partition the parent scope (indecomposability).
    #[error("product node {id} children cover {covered:?}, expected a disjoint partition of {scope:?}")]
    IndecomposableProduct {
        id: NodeId,
        scope: Vec<usize>,
        covered: Vec<usize>,
    },
}

/// Check structural validity of the network rooted at `node`.
///
/// Returns the first violation found in a depth-first walk, or `Ok(())`
/// when the whole network is complete and decomposable.
pub fn is_valid<L>(node: &Node<L>) -> Result<(), ValidityError> {
    if node.scope().is_empty() {
        return Err(ValidityError::EmptyScope { id: node.id() });
    }

    match node {
        Node::Leaf(_) => Ok(()),
        Node::Sum(sum) => {
            if sum.children.is_empty() {
                return Err(ValidityError::NoChildren { id: sum.id });
            }
            if sum.weights.len() != sum.children.len() {
                return Err(ValidityError::WeightChildMismatch {
                    id: sum.id,
                    children: sum.children.len(),
                    weights: sum.weights.len(),
                });
            }
            for (position, &weight) in sum.weights.iter().enumerate() {
                if !(weight > 0.0) {
                    return Err(ValidityError::NonPositiveWeight {
                        id: sum.id,
                        position,
                        weight,
                    });
                }
            }

            let scope_set: BTreeSet<usize> = sum.scope.iter().copied().collect();
            for child in &sum.children {
                let child_set: BTreeSet<usize> = child.scope().iter().copied().collect();
                if child_set != scope_set {
                    return Err(ValidityError::IncompleteSum {
                        id: sum.id,
                        scope: sum.scope.clone(),
                        child_scope: child.scope().to_vec(),
                    });
                }
                is_valid(child)?;
            }
            Ok(())
        }
        Node::Product(product) => {
            if product.children.is_empty() {
                return Err(ValidityError::NoChildren { id: product.id });
            }

            let scope_set: BTreeSet<usize> = product.scope.iter().copied().collect();
            let mut covered: BTreeSet<usize> = BTreeSet::new();
            let mut disjoint = true;
            for child in &product.children {
                for &col in child.scope() {
                    disjoint &= covered.insert(col);
                }
            }
            if !disjoint || covered != scope_set {
                return Err(ValidityError::IndecomposableProduct {
                    id: product.id,
                    scope: product.scope.clone(),
                    covered: covered.into_iter().collect(),
                });
            }

            for child in &product.children {
                is_valid(child)?;
            }
            Ok(())
        }
    }
}
