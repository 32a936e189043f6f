//! Communication network builder
//!
//! One node per member, one undirected edge per pair of members who
//! communicated in the window. Edge weight is the number of communications
//! between the pair; the direction split and the type-weighted intensity ride
//! along on the edge for reporting.
//!
//! Policy:
//! - Members with no communications are still nodes (isolated)
//! - Self-communications add nothing
//! - A cross-team communication to someone outside the team adds no edge
//! - Group communications fan out pairwise over sender, receiver and
//!   participants; with fewer than two resolvable members they add no edge

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::MemberId;
use crate::scoring::WeightTable;
use crate::snapshot::TeamSnapshot;

/// A member in the communication graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberNode {
    pub member_id: MemberId,
    pub name: String,
}

/// Aggregated communication between two members.
///
/// `low` is the member with the smaller id, `high` the other one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Communications between the pair (the edge weight)
    pub count: usize,
    /// Sent by `low` to `high`
    pub low_to_high: usize,
    /// Sent by `high` to `low`
    pub high_to_low: usize,
    /// Sum of type-weighted, duration-scaled intensities
    pub intensity: f64,
}

impl Interaction {
    pub fn weight(&self) -> f64 {
        self.count as f64
    }

    /// Both members initiated at least once
    pub fn is_reciprocated(&self) -> bool {
        self.low_to_high > 0 && self.high_to_low > 0
    }
}

/// Undirected, weighted communication graph of one team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamGraph {
    graph: UnGraph<MemberNode, Interaction>,
    /// Member id -> node; nodes are added in ascending id order
    index: FxHashMap<MemberId, NodeIndex>,
}

impl TeamGraph {
    /// Build the graph for a validated snapshot
    pub fn build(snapshot: &TeamSnapshot<'_>, config: &EngineConfig) -> Self {
        let mut members: Vec<_> = snapshot.members().iter().collect();
        members.sort_by_key(|m| m.id);

        let mut graph: UnGraph<MemberNode, Interaction> =
            UnGraph::with_capacity(members.len(), members.len() * 2);
        let mut index: FxHashMap<MemberId, NodeIndex> = FxHashMap::default();
        for member in members {
            let node = graph.add_node(MemberNode {
                member_id: member.id,
                name: member.name.clone(),
            });
            index.insert(member.id, node);
        }

        let mut team_graph = Self { graph, index };
        let table = WeightTable::new(&config.weights, &config.durations);

        for comm in snapshot.communications() {
            let participants = snapshot.participants(comm);
            if participants.len() < 2 {
                continue;
            }
            let intensity = table.intensity(comm, &config.energy);
            for (i, &a) in participants.iter().enumerate() {
                for &b in &participants[i + 1..] {
                    let sender = if a == comm.sender_id { Some(a) } else { None };
                    team_graph.record(a, b, sender, intensity);
                }
            }
        }

        debug!(
            "Network: {} nodes, {} edges",
            team_graph.node_count(),
            team_graph.edge_count()
        );

        team_graph
    }

    fn record(&mut self, a: MemberId, b: MemberId, sender: Option<MemberId>, intensity: f64) {
        let (Some(&na), Some(&nb)) = (self.index.get(&a), self.index.get(&b)) else {
            return;
        };
        let edge = match self.graph.find_edge(na, nb) {
            Some(edge) => edge,
            None => self.graph.add_edge(na, nb, Interaction::default()),
        };
        let low = a.min(b);
        let interaction = &mut self.graph[edge];
        interaction.count += 1;
        interaction.intensity += intensity;
        match sender {
            Some(s) if s == low => interaction.low_to_high += 1,
            Some(_) => interaction.high_to_low += 1,
            None => {}
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The underlying petgraph graph
    pub fn graph(&self) -> &UnGraph<MemberNode, Interaction> {
        &self.graph
    }

    /// Member ids in node order (ascending)
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.graph
            .node_indices()
            .map(|n| self.graph[n].member_id)
            .collect()
    }

    pub fn member_id(&self, node: usize) -> Option<MemberId> {
        self.graph
            .node_weight(NodeIndex::new(node))
            .map(|m| m.member_id)
    }

    pub fn member_name(&self, member_id: MemberId) -> Option<&str> {
        self.index
            .get(&member_id)
            .map(|&n| self.graph[n].name.as_str())
    }

    pub fn contains(&self, member_id: MemberId) -> bool {
        self.index.contains_key(&member_id)
    }

    /// Number of distinct members this member communicated with
    pub fn degree(&self, member_id: MemberId) -> usize {
        self.index
            .get(&member_id)
            .map_or(0, |&n| self.graph.neighbors(n).count())
    }

    pub fn interaction(&self, a: MemberId, b: MemberId) -> Option<&Interaction> {
        let na = *self.index.get(&a)?;
        let nb = *self.index.get(&b)?;
        self.graph.find_edge(na, nb).map(|e| &self.graph[e])
    }

    /// Every edge as (lower member id, higher member id, interaction), sorted
    pub fn edges(&self) -> Vec<(MemberId, MemberId, &Interaction)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| {
                let a = self.graph[e.source()].member_id;
                let b = self.graph[e.target()].member_id;
                (a.min(b), a.max(b), e.weight())
            })
            .collect();
        edges.sort_by_key(|&(a, b, _)| (a, b));
        edges
    }

    /// Index-based adjacency, neighbors ascending
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        self.graph
            .node_indices()
            .map(|n| {
                let mut neighbors: Vec<usize> =
                    self.graph.neighbors(n).map(|m| m.index()).collect();
                neighbors.sort_unstable();
                neighbors
            })
            .collect()
    }

    /// Index-based adjacency weighted by communication count
    pub fn weighted_adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj: Vec<Vec<(usize, f64)>> = vec![vec![]; self.node_count()];
        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            let weight = edge.weight().weight();
            adj[a].push((b, weight));
            adj[b].push((a, weight));
        }
        for neighbors in &mut adj {
            neighbors.sort_by_key(|&(w, _)| w);
        }
        adj
    }
}
