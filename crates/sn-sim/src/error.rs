//! Simulation error type.

use thiserror::Error;

/// Errors produced by `sn-sim`.  Unreachable targets are not errors; they
/// are counted in [`SimOutcome::skipped`](crate::SimOutcome::skipped).
#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("cannot sample {requested} {what}: only {available} eligible nodes")]
    InsufficientNodes {
        what:      &'static str,
        requested: usize,
        available: usize,
    },
}

/// Shorthand result type for `sn-sim`.
pub type SimResult<T> = Result<T, SimError>;
