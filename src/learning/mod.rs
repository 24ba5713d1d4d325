//! Structure learning: operation policy and worklist builder.
//!
//! This module provides the core of the crate:
//!
//! - [`OperationPolicy`] / [`Operation`]: deterministic selection of the
//!   next structural operation for a data slice
//! - [`learn_structure`] / [`StructureLearner`]: the breadth-first worklist
//!   that assembles, prunes and validates the network
//! - [`RowSplitter`], [`ColSplitter`], [`LeafFactory`]: collaborator
//!   contracts for the clustering, independence-splitting and leaf-fitting
//!   algorithms this crate does not implement
//! - [`StructureParams`]: configuration with builder-pattern validation
//! - [`LearnLogger`], [`Verbosity`]: structured progress output

mod builder;
mod error;
mod logger;
mod params;
mod policy;
mod splits;

pub use builder::{learn_structure, StructureLearner};
pub use error::StructureError;
pub use logger::{LearnLogger, Verbosity};
pub use params::{ParamsError, StructureParams};
pub use policy::{Operation, OperationPolicy};
pub use splits::{ColPartition, ColSplitter, LeafFactory, RowPartition, RowSplitter};
