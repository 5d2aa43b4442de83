//! Simulation parameters.

use crate::{SimError, SimResult};

/// How targets are produced and handed out.
#[derive(Clone, Debug, PartialEq)]
pub enum SimMode {
    /// Hubs with evenly distributed agents; a fixed number of targets chosen
    /// globally, or around each hub when `cluster_radius_m` is positive.
    Hub {
        hubs:             usize,
        targets:          usize,
        cluster_radius_m: Option<f64>,
    },
    /// Every agent has its own random home and draws `routes_per_agent`
    /// destinations from a shared candidate pool.
    Legacy {
        routes_per_agent: usize,
        max_attempts:     usize,
        /// Candidate pool size is `agents × routes_per_agent × candidate_factor`.
        candidate_factor: usize,
    },
}

impl SimMode {
    /// Legacy mode with the default attempt budget and candidate factor.
    pub fn legacy(routes_per_agent: usize) -> Self {
        SimMode::Legacy { routes_per_agent, max_attempts: 1000, candidate_factor: 4 }
    }

    /// Clustering radius, if clustering is active.
    pub fn cluster_radius(&self) -> Option<f64> {
        match self {
            SimMode::Hub { cluster_radius_m: Some(r), .. } if *r > 0.0 => Some(*r),
            _ => None,
        }
    }
}

impl Default for SimMode {
    fn default() -> Self {
        SimMode::legacy(5)
    }
}

/// Top-level configuration for one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Seeds every random stream in the run.
    pub seed:   u64,
    /// Number of agents ("nurses").
    pub agents: usize,
    pub mode:   SimMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42, agents: 2, mode: SimMode::default() }
    }
}

impl SimConfig {
    /// Reject parameter combinations that cannot produce a meaningful run.
    pub fn validate(&self) -> SimResult<()> {
        if self.agents == 0 {
            return Err(SimError::Config("at least one agent is required".into()));
        }
        match &self.mode {
            SimMode::Hub { hubs, cluster_radius_m, .. } => {
                if *hubs == 0 {
                    return Err(SimError::Config("at least one hub is required".into()));
                }
                if let Some(r) = cluster_radius_m {
                    if !r.is_finite() || *r < 0.0 {
                        return Err(SimError::Config(format!("invalid cluster radius {r}")));
                    }
                }
            }
            SimMode::Legacy { max_attempts, candidate_factor, .. } => {
                if *max_attempts == 0 || *candidate_factor == 0 {
                    return Err(SimError::Config(
                        "max_attempts and candidate_factor must be positive".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}
