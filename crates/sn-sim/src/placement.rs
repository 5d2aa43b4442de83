//! Hub placement and agent distribution.

use log::info;

use sn_core::{AgentId, NodeIdx, SimRng};
use sn_graph::StreetGraph;

use crate::model::{Agent, Hub};
use crate::sampling::{sample_nodes, split_evenly};
use crate::SimResult;

/// Sample `hubs` distinct nodes from `eligible` and spread `agents` across
/// them as evenly as possible.
pub fn place_hubs(
    rng: &mut SimRng,
    eligible: &[NodeIdx],
    hubs: usize,
    agents: usize,
) -> SimResult<Vec<Hub>> {
    let nodes = sample_nodes(rng, eligible, hubs, "hubs")?;
    Ok(nodes
        .into_iter()
        .zip(split_evenly(agents, hubs))
        .map(|(node, agents)| Hub { node, agents })
        .collect())
}

/// Create agents hub by hub, with sequential ids.  Each agent's home is its
/// hub's node.
pub fn create_agents(hubs: &[Hub]) -> Vec<Agent> {
    let mut agents = Vec::with_capacity(hubs.iter().map(|h| h.agents).sum());
    for (hub_idx, hub) in hubs.iter().enumerate() {
        for _ in 0..hub.agents {
            agents.push(Agent {
                id:   AgentId(agents.len() as u32),
                home: hub.node,
                hub:  Some(hub_idx),
            });
        }
    }
    agents
}

/// One agent per origin, for legacy mode.
pub fn agents_at(origins: &[NodeIdx]) -> Vec<Agent> {
    origins
        .iter()
        .enumerate()
        .map(|(i, &home)| Agent { id: AgentId(i as u32), home, hub: None })
        .collect()
}

pub(crate) fn log_hubs(graph: &StreetGraph, hubs: &[Hub]) {
    for (i, hub) in hubs.iter().enumerate() {
        info!(
            "hub {i}: node {} at {} with {} agent(s)",
            graph.node_id(hub.node),
            graph.node_pos(hub.node),
            hub.agents
        );
    }
}
