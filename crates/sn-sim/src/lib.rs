//! `sn-sim` — seeded nurse-route simulation over a street graph.
//!
//! # Run pipeline
//!
//! ```text
//! hub mode:
//!   ① Hubs     — sample distinct eligible nodes          (SimRng(seed))
//!   ② Agents   — split agents evenly over hubs, home = hub node
//!   ③ Targets  — global sample, or radius clusters per hub (SimRng(seed + 1))
//!   ④ Assign   — round-robin over agents in creation order
//!   ⑤ Paths    — one shortest-path tree per agent (parallel with `parallel`)
//!   ⑥ Metrics  — length/time along lowest-slot edges, fleet percentiles
//!
//! legacy mode:
//!   each agent gets a random home and draws routes_per_agent destinations
//!   from a shared candidate pool, retrying failed or repeated draws.
//! ```
//!
//! Same seed and same graph give the same hubs, agents, targets,
//! assignments and routes.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Computes per-agent search trees on Rayon's thread pool. |

pub mod assign;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod placement;
pub mod sampling;
pub mod sim;
pub mod targets;


pub use config::{SimConfig, SimMode};
pub use error::{SimError, SimResult};
pub use metrics::{percentile, FleetStats, Summary};
pub use model::{Agent, Hub, RouteRecord, Target};
pub use sampling::{eligible_nodes, split_evenly};
pub use sim::{RouteSimulator, SimOutcome};
