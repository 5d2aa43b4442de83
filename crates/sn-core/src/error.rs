//! Toolkit error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `From`, so `?` works across crate boundaries.

use thiserror::Error;

/// The base error type shared by the `sn-*` crates.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("coordinate ({lat}, {lon}) is outside the WGS-84 range")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Shorthand result type for `sn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
