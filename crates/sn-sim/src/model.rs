//! Simulation entities.

use sn_core::{AgentId, NodeIdx};

/// A node agents start from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hub {
    pub node:   NodeIdx,
    /// Number of agents based here.
    pub agents: usize,
}

/// One simulated nurse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    pub id:   AgentId,
    /// Routing origin of every route this agent drives.
    pub home: NodeIdx,
    /// Index into the run's hubs; `None` in legacy mode.
    pub hub:  Option<usize>,
}

impl Agent {
    /// External label, 1-based: `nurse_1`, `nurse_2`, …
    pub fn label(&self) -> String {
        format!("nurse_{}", self.id.0 + 1)
    }
}

/// One patient location.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub node: NodeIdx,
    /// Hub the target was clustered around, if clustering was used.
    pub hub:  Option<usize>,
}

/// A realized route.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteRecord {
    /// Sequential, starting at 1.
    pub id:          u32,
    pub agent:       AgentId,
    pub origin:      NodeIdx,
    pub destination: NodeIdx,
    /// Origin to destination inclusive.
    pub path:        Vec<NodeIdx>,
    pub length_km:   f64,
    pub travel_min:  f64,
}
