//! `sn-core` — foundational types for the street-network toolkit.
//!
//! This crate is a dependency of every other `sn-*` crate.  It has no `sn-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                |
//! |-----------|---------------------------------------------------------|
//! | [`ids`]   | `OsmNodeId`, `NodeIdx`, `EdgeIdx`, `AgentId`            |
//! | [`geo`]   | `GeoPoint`, haversine distance, degree envelopes        |
//! | [`rng`]   | `SimRng` (seeded, reproducible sampling)                |
//! | [`error`] | `CoreError` (coordinate validation), `CoreResult`       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{AgentId, EdgeIdx, NodeIdx, OsmNodeId};
pub use rng::SimRng;
