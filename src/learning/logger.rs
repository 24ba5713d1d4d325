//! Verbosity-gated progress output for structure learning.

use std::time::Duration;

use crate::learning::policy::Operation;

/// Verbosity levels for learning output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output (default).
    #[default]
    Silent,
    /// Warnings only.
    Warning,
    /// High-level progress (run summary).
    Info,
    /// Per-task operations, split fan-out and timings.
    Debug,
}

/// Structured progress logger for the structure builder.
///
/// All output goes to stdout and is suppressed below the configured
/// verbosity, so the default `Silent` level costs nothing but a branch.
#[derive(Debug)]
pub struct LearnLogger {
    verbosity: Verbosity,
}

impl LearnLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Log a collaborator contract violation, just before it surfaces as
    /// an error.
    pub fn contract_violation(&self, message: &str) {
        if self.verbosity >= Verbosity::Warning {
            println!("warning: {message}");
        }
    }

    /// Log the operation chosen for a popped task.
    pub fn operation(&self, op: &Operation, n_rows: usize, n_cols: usize, remaining: usize) {
        if self.verbosity >= Verbosity::Debug {
            println!("op {op:?} on slice {n_rows}x{n_cols} (remaining tasks {remaining})");
        }
    }

    /// Log the fan-out and duration of a row or column split.
    pub fn split(&self, kind: &str, n_partitions: usize, elapsed: Duration) {
        if self.verbosity >= Verbosity::Debug {
            println!(
                "  found {n_partitions} {kind} partitions (in {:.5}s)",
                elapsed.as_secs_f64()
            );
        }
    }

    /// Log the creation of a leaf.
    pub fn leaf(&self, scope: &[usize], elapsed: Duration) {
        if self.verbosity >= Verbosity::Debug {
            println!(
                "  created leaf for scope {scope:?} (in {:.5}s)",
                elapsed.as_secs_f64()
            );
        }
    }

    /// Log the end of a learning run.
    pub fn finished(&self, n_nodes: usize, elapsed: Duration) {
        if self.verbosity >= Verbosity::Info {
            println!(
                "learned structure with {n_nodes} nodes in {:.3}s",
                elapsed.as_secs_f64()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels_are_ordered() {
        assert!(Verbosity::Silent < Verbosity::Warning);
        assert!(Verbosity::Warning < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
    }

    #[test]
    fn default_is_silent() {
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }
}
