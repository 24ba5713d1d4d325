//! Structure learning configuration with builder pattern.
//!
//! [`StructureParams`] bundles the knobs shared by the policy and the
//! builder. The `bon` builder validates at build time.
//!
//! # Example
//!
//! ```
//! use sumproduct::learning::StructureParams;
//!
//! // All defaults.
//! let params = StructureParams::builder().build().unwrap();
//! assert_eq!(params.min_instances_slice, 100);
//!
//! // Customized.
//! let params = StructureParams::builder()
//!     .min_instances_slice(250)
//!     .cluster_first(false)
//!     .build()
//!     .unwrap();
//! assert!(!params.cluster_first);
//! ```

use bon::Builder;
use thiserror::Error;

use super::logger::Verbosity;

/// Errors from structure-parameter validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// The row-count floor must be at least 1.
    #[error("min_instances_slice must be at least 1, got 0")]
    InvalidMinInstances,
}

/// Configuration for a structure learning run.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct StructureParams {
    /// Row-count floor: slices at or below this many rows are no longer
    /// clustered. Default: 100.
    #[builder(default = 100)]
    pub min_instances_slice: usize,

    /// Opening move for the first task: cluster rows before splitting
    /// columns. Default: true.
    #[builder(default = true)]
    pub cluster_first: bool,

    /// Allow row clustering on univariate slices. Default: false.
    #[builder(default = false)]
    pub cluster_univariate: bool,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the parameters.
impl<S: structure_params_builder::IsComplete> StructureParamsBuilder<S> {
    /// Build and validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError`] if `min_instances_slice` is zero.
    pub fn build(self) -> Result<StructureParams, ParamsError> {
        let params = self.__build_internal();
        params.validate()?;
        Ok(params)
    }
}

impl StructureParams {
    fn validate(&self) -> Result<(), ParamsError> {
        if self.min_instances_slice == 0 {
            return Err(ParamsError::InvalidMinInstances);
        }
        Ok(())
    }
}

impl Default for StructureParams {
    fn default() -> Self {
        Self::builder().build().expect("default params are valid")
    }
}
