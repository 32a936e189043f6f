//! Network-level structure: density, connectivity and bottlenecks

use petgraph::algo::connected_components;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::errors::EngineResult;
use crate::models::MemberId;
use crate::network::builder::TeamGraph;
use crate::network::graph_algo::{articulation_points, betweenness_centrality, degree_centrality};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub num_nodes: usize,
    pub num_edges: usize,
    /// Edges / possible edges, n(n-1)/2 (0-1)
    pub density: f64,
    /// One component covering every member; trivially true for 0 or 1 members
    pub is_connected: bool,
    pub component_count: usize,
    /// Highest degree, lowest id on ties; `None` when nobody communicated
    pub most_central_member_id: Option<MemberId>,
    /// Degree centrality of the most central member (0-1)
    pub centrality_score: f64,
    /// Articulation points plus outlier-betweenness members, ascending
    pub potential_bottlenecks: Vec<MemberId>,
    /// Members whose removal splits their component, ascending
    pub articulation_points: Vec<MemberId>,
    pub avg_betweenness: f64,
    pub avg_degree: f64,
    pub isolated_member_ids: Vec<MemberId>,
}

pub struct NetworkAnalyzer<'a> {
    config: &'a EngineConfig,
}

impl<'a> NetworkAnalyzer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, graph: &TeamGraph) -> EngineResult<NetworkSummary> {
        let n = graph.node_count();
        let e = graph.edge_count();
        let ids = graph.member_ids();
        let adj = graph.adjacency();

        let density = if n < 2 {
            0.0
        } else {
            (2.0 * e as f64 / (n * (n - 1)) as f64).clamp(0.0, 1.0)
        };

        let component_count = connected_components(graph.graph());
        let is_connected = component_count <= 1;

        let degrees: Vec<usize> = adj.iter().map(Vec::len).collect();
        let degree = degree_centrality(&adj);

        // Max degree, first (lowest id) wins ties
        let most_central = (0..n)
            .filter(|&v| degrees[v] > 0)
            .fold(None, |best: Option<usize>, v| match best {
                Some(b) if degrees[b] >= degrees[v] => Some(b),
                _ => Some(v),
            });

        let betweenness = betweenness_centrality(&adj, true)?;
        let avg_betweenness = mean(&betweenness);

        let articulation: Vec<usize> = articulation_points(&adj)?;
        let bottlenecks = if n < 3 {
            Vec::new()
        } else {
            let threshold = avg_betweenness
                + self.config.network.bottleneck_std_multiplier * std_dev(&betweenness);
            (0..n)
                .filter(|&v| {
                    let outlier = betweenness[v] > threshold && betweenness[v] > 0.0;
                    let cut = self.config.network.include_articulation_points
                        && articulation.binary_search(&v).is_ok();
                    outlier || cut
                })
                .map(|v| ids[v])
                .collect()
        };

        let isolated_member_ids: Vec<MemberId> =
            (0..n).filter(|&v| degrees[v] == 0).map(|v| ids[v]).collect();

        let summary = NetworkSummary {
            num_nodes: n,
            num_edges: e,
            density,
            is_connected,
            component_count,
            most_central_member_id: most_central.map(|v| ids[v]),
            centrality_score: most_central.map_or(0.0, |v| degree[v]),
            potential_bottlenecks: bottlenecks,
            articulation_points: articulation.iter().map(|&v| ids[v]).collect(),
            avg_betweenness,
            avg_degree: if n == 0 { 0.0 } else { 2.0 * e as f64 / n as f64 },
            isolated_member_ids,
        };

        debug!(
            "Network analysis: density={:.3}, components={}, {} bottlenecks",
            summary.density,
            summary.component_count,
            summary.potential_bottlenecks.len()
        );

        Ok(summary)
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}
