//! Dataset views for structure learning.
//!
//! The learner never copies data: every unit of work operates on a
//! [`DataSlice`], a read-only row/column view into the original dataset.

mod slice;

pub use slice::DataSlice;
