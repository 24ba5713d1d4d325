//! Sum-product network representation.
//!
//! This module provides:
//! - [`Node`]: The recursive network structure (Sum / Product / Leaf)
//! - [`assign_ids`] / [`prune`]: Post-construction transforms
//! - [`is_valid`]: Structural validity checks

mod node;
mod transform;
mod validity;

pub use node::{LeafNode, Node, NodeId, ProductNode, SumNode};
pub use transform::{assign_ids, prune};
pub use validity::{is_valid, ValidityError};
