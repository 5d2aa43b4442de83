//! The [`RouteSimulator`]: placement → targets → assignment → paths → stats.

use std::collections::BTreeSet;

use log::{info, warn};

use sn_core::{NodeIdx, SimRng};
use sn_graph::{select_weight, Router, ShortestPathTree, StreetGraph, WeightAttr};

use crate::assign::assign_targets;
use crate::config::{SimConfig, SimMode};
use crate::metrics::{path_totals, FleetStats};
use crate::model::{Agent, Hub, RouteRecord, Target};
use crate::placement::{agents_at, create_agents, log_hubs, place_hubs};
use crate::sampling::{eligible_nodes, sample_nodes};
use crate::targets::{select_clustered, select_global};
use crate::SimResult;

/// Everything one run produced.
#[derive(Debug)]
pub struct SimOutcome {
    pub weight:  WeightAttr,
    /// Empty in legacy mode.
    pub hubs:    Vec<Hub>,
    pub agents:  Vec<Agent>,
    /// Empty in legacy mode, where destinations are drawn per agent.
    pub targets: Vec<Target>,
    pub routes:  Vec<RouteRecord>,
    /// Assigned targets that produced no route (unreachable, or the agent's
    /// search failed).
    pub skipped: usize,
    pub stats:   FleetStats,
}

/// A route before its id is known.
struct Leg {
    destination: NodeIdx,
    path:        Vec<NodeIdx>,
    length_km:   f64,
    travel_min:  f64,
}

struct AgentRoutes {
    legs:    Vec<Leg>,
    skipped: usize,
}

/// Seeded route simulator, generic over the routing engine.
///
/// # Example
///
/// ```rust,ignore
/// let sim = RouteSimulator::new(SimConfig::default(), DijkstraRouter);
/// let outcome = sim.run(&graph)?;
/// println!("{} routes", outcome.routes.len());
/// ```
pub struct RouteSimulator<R: Router> {
    config: SimConfig,
    router: R,
}

impl<R: Router> RouteSimulator<R> {
    pub fn new(config: SimConfig, router: R) -> Self {
        Self { config, router }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run the configured mode over a normalized graph.
    ///
    /// Fails only on invalid configuration or when more nodes are requested
    /// than the graph can supply; the graph is only read.
    pub fn run(&self, graph: &StreetGraph) -> SimResult<SimOutcome> {
        self.config.validate()?;
        let weight = select_weight(graph);
        let eligible = eligible_nodes(graph);
        info!(
            "simulating {} agent(s) over {} eligible node(s), weight = {weight}",
            self.config.agents,
            eligible.len()
        );

        let outcome = match self.config.mode {
            SimMode::Hub { hubs, targets, .. } => {
                self.run_hubs(graph, weight, &eligible, hubs, targets)?
            }
            SimMode::Legacy { routes_per_agent, max_attempts, candidate_factor } => self
                .run_legacy(graph, weight, &eligible, routes_per_agent, max_attempts, candidate_factor)?,
        };
        info!(
            "produced {} route(s), skipped {} target(s)",
            outcome.routes.len(),
            outcome.skipped
        );
        Ok(outcome)
    }

    // ── Hub mode ──────────────────────────────────────────────────────────

    fn run_hubs(
        &self,
        graph: &StreetGraph,
        weight: WeightAttr,
        eligible: &[NodeIdx],
        hub_count: usize,
        target_count: usize,
    ) -> SimResult<SimOutcome> {
        let seed = self.config.seed;
        let mut hub_rng = SimRng::new(seed);
        let mut target_rng = SimRng::new(seed.wrapping_add(1));

        let hubs = place_hubs(&mut hub_rng, eligible, hub_count, self.config.agents)?;
        log_hubs(graph, &hubs);
        let agents = create_agents(&hubs);

        let targets = match self.config.mode.cluster_radius() {
            Some(radius) => {
                select_clustered(&mut target_rng, graph, eligible, &hubs, target_count, radius)
            }
            None => select_global(&mut target_rng, eligible, target_count)?,
        };
        let assignment = assign_targets(&agents, &targets);

        let per_agent = self.route_all(graph, weight, &agents, &assignment);
        Ok(finish(weight, hubs, agents, targets, per_agent))
    }

    /// One search per agent; optionally in parallel, always in agent order.
    fn route_all(
        &self,
        graph: &StreetGraph,
        weight: WeightAttr,
        agents: &[Agent],
        assignment: &[Vec<NodeIdx>],
    ) -> Vec<AgentRoutes> {
        #[cfg(feature = "parallel")]
        let results = {
            use rayon::prelude::*;

            agents
                .par_iter()
                .zip(assignment.par_iter())
                .map(|(agent, dests)| self.route_agent(graph, weight, agent, dests))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results = agents
            .iter()
            .zip(assignment)
            .map(|(agent, dests)| self.route_agent(graph, weight, agent, dests))
            .collect();

        results
    }

    fn route_agent(
        &self,
        graph: &StreetGraph,
        weight: WeightAttr,
        agent: &Agent,
        dests: &[NodeIdx],
    ) -> AgentRoutes {
        let Some(tree) = self.tree_for(graph, weight, agent) else {
            return AgentRoutes { legs: Vec::new(), skipped: dests.len() };
        };
        let mut legs = Vec::with_capacity(dests.len());
        let mut skipped = 0;
        for &dest in dests {
            match leg(graph, &tree, dest) {
                Some(l) => legs.push(l),
                None => {
                    info!(
                        "{}: no path from {} to {}, skipping",
                        agent.label(),
                        graph.node_id(agent.home),
                        graph.node_id(dest)
                    );
                    skipped += 1;
                }
            }
        }
        AgentRoutes { legs, skipped }
    }

    fn tree_for(
        &self,
        graph: &StreetGraph,
        weight: WeightAttr,
        agent: &Agent,
    ) -> Option<ShortestPathTree> {
        match self.router.tree(graph, agent.home, weight) {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!("{}: shortest-path search failed: {e}", agent.label());
                None
            }
        }
    }

    // ── Legacy mode ───────────────────────────────────────────────────────

    fn run_legacy(
        &self,
        graph: &StreetGraph,
        weight: WeightAttr,
        eligible: &[NodeIdx],
        routes_per_agent: usize,
        max_attempts: usize,
        candidate_factor: usize,
    ) -> SimResult<SimOutcome> {
        let seed = self.config.seed;
        let agent_count = self.config.agents;

        let origins = sample_nodes(&mut SimRng::new(seed), eligible, agent_count, "agents")?;
        let agents = agents_at(&origins);

        let wanted = agent_count
            .saturating_mul(routes_per_agent)
            .saturating_mul(candidate_factor);
        let mut rng = SimRng::new(seed.wrapping_add(1));
        let candidates = sample_nodes(&mut rng, eligible, wanted, "candidates")?;

        // Draws share one stream, so agents are processed strictly in order.
        let mut per_agent = Vec::with_capacity(agents.len());
        for agent in &agents {
            per_agent.push(self.legacy_agent(
                graph,
                weight,
                agent,
                &candidates,
                &mut rng,
                routes_per_agent,
                max_attempts,
            ));
        }
        Ok(finish(weight, Vec::new(), agents, Vec::new(), per_agent))
    }

    #[allow(clippy::too_many_arguments)]
    fn legacy_agent(
        &self,
        graph: &StreetGraph,
        weight: WeightAttr,
        agent: &Agent,
        candidates: &[NodeIdx],
        rng: &mut SimRng,
        wanted: usize,
        max_attempts: usize,
    ) -> AgentRoutes {
        let Some(tree) = self.tree_for(graph, weight, agent) else {
            return AgentRoutes { legs: Vec::new(), skipped: wanted };
        };
        let mut legs = Vec::with_capacity(wanted);
        let mut used = BTreeSet::new();
        let mut attempts = 0;
        while legs.len() < wanted && attempts < max_attempts {
            attempts += 1;
            let Some(&dest) = rng.choose(candidates) else { break };
            if dest == agent.home || used.contains(&dest) {
                continue;
            }
            if let Some(l) = leg(graph, &tree, dest) {
                used.insert(dest);
                legs.push(l);
            }
        }
        let skipped = wanted - legs.len();
        if skipped > 0 {
            warn!(
                "{}: {} of {wanted} route(s) after {attempts} draw(s)",
                agent.label(),
                legs.len()
            );
        }
        AgentRoutes { legs, skipped }
    }
}

/// Route from the tree's source to `dest`, if one exists.
fn leg(graph: &StreetGraph, tree: &ShortestPathTree, dest: NodeIdx) -> Option<Leg> {
    let path = tree.path_to(graph, dest)?;
    let (length_m, travel_s) = path_totals(graph, &path);
    Some(Leg {
        destination: dest,
        path,
        length_km: length_m / 1000.0,
        travel_min: travel_s / 60.0,
    })
}

/// Number routes 1.. in agent order, then assignment order.
fn finish(
    weight: WeightAttr,
    hubs: Vec<Hub>,
    agents: Vec<Agent>,
    targets: Vec<Target>,
    per_agent: Vec<AgentRoutes>,
) -> SimOutcome {
    let mut routes = Vec::new();
    let mut skipped = 0;
    for (agent, result) in agents.iter().zip(per_agent) {
        skipped += result.skipped;
        for leg in result.legs {
            routes.push(RouteRecord {
                id:          routes.len() as u32 + 1,
                agent:       agent.id,
                origin:      agent.home,
                destination: leg.destination,
                path:        leg.path,
                length_km:   leg.length_km,
                travel_min:  leg.travel_min,
            });
        }
    }
    let stats = FleetStats::from_routes(&routes);
    SimOutcome { weight, hubs, agents, targets, routes, skipped, stats }
}
