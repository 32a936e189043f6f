// Graph algorithms for the team communication network
//
// All functions work on plain index-based adjacency lists so they can be tested
// on small hand-built topologies without going through the builder. Node index
// i is the i-th member in ascending member-id order (see builder.rs), which is
// what makes "lowest id wins" tie-breaks fall out of "lowest index wins".
//
// PARALLELIZATION:
// - Betweenness Centrality: BFS from each source in parallel
// - Closeness Centrality: BFS from each source in parallel
// Everything else is cheap enough on team-sized graphs to run sequentially.
//
// ERROR HANDLING:
// Algorithms return EngineResult<T> instead of silently ignoring invalid data.
// A neighbor index outside the graph is an InvalidParameter, never a panic.

use std::collections::VecDeque;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::errors::{EngineError, EngineResult};

const UNVISITED: usize = usize::MAX;

// ============================================================================
// VALIDATION HELPERS
// ============================================================================

/// Validate that every neighbor index references a node in the graph.
fn validate_adjacency(adj: &[Vec<usize>]) -> EngineResult<()> {
    let n = adj.len();
    for (node, neighbors) in adj.iter().enumerate() {
        if let Some(&bad) = neighbors.iter().find(|&&w| w >= n) {
            return Err(EngineError::InvalidParameter(format!(
                "node {} has neighbor {} but the graph has {} nodes",
                node, bad, n
            )));
        }
    }
    Ok(())
}

fn validate_weighted(adj: &[Vec<(usize, f64)>]) -> EngineResult<()> {
    let n = adj.len();
    for (node, neighbors) in adj.iter().enumerate() {
        for &(w, weight) in neighbors {
            if w >= n {
                return Err(EngineError::InvalidParameter(format!(
                    "node {} has neighbor {} but the graph has {} nodes",
                    node, w, n
                )));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::InvalidParameter(format!(
                    "edge {}-{} has invalid weight {}",
                    node, w, weight
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// SHORTEST PATHS (BFS)
// ============================================================================
//
// Paths are measured in hops. Edge weights count how often two members talk,
// which is a strength, not a distance, so it never shortens a path.
// ============================================================================

/// Unweighted petgraph view of an adjacency list. Node `i` keeps index `i`.
///
/// Callers validate `adj` first.
pub fn hop_graph(adj: &[Vec<usize>]) -> UnGraph<(), ()> {
    let edge_count = adj.iter().map(Vec::len).sum::<usize>() / 2;
    let mut graph = UnGraph::with_capacity(adj.len(), edge_count);
    for _ in 0..adj.len() {
        graph.add_node(());
    }
    for (v, neighbors) in adj.iter().enumerate() {
        for &w in neighbors.iter().filter(|&&w| w > v) {
            graph.add_edge(NodeIndex::new(v), NodeIndex::new(w), ());
        }
    }
    graph
}

/// Hop distance from `source` to every node; `None` for unreachable nodes.
pub fn shortest_path_lengths<N, E>(
    graph: &UnGraph<N, E>,
    source: NodeIndex,
) -> Vec<Option<usize>> {
    let mut distance: Vec<Option<usize>> = vec![None; graph.node_count()];
    if source.index() >= graph.node_count() {
        return distance;
    }
    distance[source.index()] = Some(0);

    // Bfs yields nodes in visiting order, so a node's distance is known
    // before its neighbors are reached through it.
    let mut bfs = Bfs::new(graph, source);
    while let Some(v) = bfs.next(graph) {
        let next = distance[v.index()].map_or(0, |d| d + 1);
        for w in graph.neighbors(v) {
            if distance[w.index()].is_none() {
                distance[w.index()] = Some(next);
            }
        }
    }
    distance
}

// ============================================================================
// DEGREE CENTRALITY
// ============================================================================

/// Degree divided by (n - 1). Single-node graphs get 0.
pub fn degree_centrality(adj: &[Vec<usize>]) -> Vec<f64> {
    let n = adj.len();
    if n <= 1 {
        return vec![0.0; n];
    }
    let denom = (n - 1) as f64;
    adj.iter().map(|neighbors| neighbors.len() as f64 / denom).collect()
}

// ============================================================================
// BETWEENNESS CENTRALITY (Brandes Algorithm)
// ============================================================================
//
// What is Betweenness Centrality?
// How often a member lies on the shortest path between two OTHER members.
// High betweenness = the person information has to flow through.
//
// Formula:
//   BC(v) = Σ (σ_st(v) / σ_st) for all pairs s,t where s≠v≠t
//
// Where:
//   σ_st = total number of shortest paths from s to t
//   σ_st(v) = number of those paths that pass through v
//
// Brandes Algorithm:
// 1. For each source node, run BFS to count shortest paths
// 2. Accumulate dependencies by backtracking from the farthest nodes
// 3. Sum up contributions from all source nodes
//
// The graph is undirected, so every pair is seen once from each end: the sum
// is halved. Normalizing divides by the (n-1)(n-2)/2 pairs not involving v.
// Unreachable pairs contribute nothing.
//
// Time complexity: O(V * E)
// ============================================================================

/// Calculate Betweenness Centrality using Brandes' algorithm (PARALLELIZED).
///
/// # Arguments
/// * `adj` - Undirected adjacency list (each edge listed from both ends)
/// * `normalized` - Divide by (n-1)(n-2)/2 to get values in [0, 1]
///
/// # Errors
/// - `InvalidParameter` if any neighbor index is out of bounds
pub fn betweenness_centrality(adj: &[Vec<usize>], normalized: bool) -> EngineResult<Vec<f64>> {
    let n = adj.len();
    if n == 0 {
        return Ok(vec![]);
    }
    validate_adjacency(adj)?;

    // PARALLEL: each source computes its partial contributions independently
    let partial_scores: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|source| {
            let mut partial: Vec<f64> = vec![0.0; n];

            // Nodes in order of non-decreasing distance from source
            let mut stack: Vec<usize> = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<usize>> = vec![vec![]; n];

            let mut num_paths: Vec<f64> = vec![0.0; n];
            num_paths[source] = 1.0;

            let mut distance: Vec<usize> = vec![UNVISITED; n];
            distance[source] = 0;

            let mut queue: VecDeque<usize> = VecDeque::new();
            queue.push_back(source);

            while let Some(v) = queue.pop_front() {
                stack.push(v);
                for &w in &adj[v] {
                    if distance[w] == UNVISITED {
                        distance[w] = distance[v] + 1;
                        queue.push_back(w);
                    }
                    if distance[w] == distance[v] + 1 {
                        num_paths[w] += num_paths[v];
                        predecessors[w].push(v);
                    }
                }
            }

            // Dependency accumulation (backtrack from farthest nodes)
            let mut dependency: Vec<f64> = vec![0.0; n];
            while let Some(w) = stack.pop() {
                for &v in &predecessors[w] {
                    dependency[v] += (num_paths[v] / num_paths[w]) * (1.0 + dependency[w]);
                }
                if w != source {
                    partial[w] += dependency[w];
                }
            }

            partial
        })
        .collect();

    let mut betweenness: Vec<f64> = vec![0.0; n];
    for partial in partial_scores {
        for (i, score) in partial.into_iter().enumerate() {
            betweenness[i] += score;
        }
    }

    // Undirected: each pair was counted from both ends
    let mut scale = 0.5;
    if normalized {
        if n > 2 {
            scale /= ((n - 1) * (n - 2)) as f64 / 2.0;
        } else {
            scale = 0.0;
        }
    }
    for score in &mut betweenness {
        *score *= scale;
    }

    Ok(betweenness)
}

// ============================================================================
// CLOSENESS CENTRALITY
// ============================================================================
//
// Inverse of the average hop distance to every REACHABLE member:
//
//   CC(v) = r / Σ d(v, u)     over the r members u reachable from v
//
// Unreachable members are left out of the average rather than counted as an
// infinite distance, so a small island can still score high. A member who
// reaches nobody has no closeness at all (None), not a closeness of zero.
// ============================================================================

/// Calculate Closeness Centrality for all nodes (PARALLELIZED).
///
/// # Errors
/// - `InvalidParameter` if any neighbor index is out of bounds
pub fn closeness_centrality(adj: &[Vec<usize>]) -> EngineResult<Vec<Option<f64>>> {
    validate_adjacency(adj)?;
    let graph = hop_graph(adj);

    let closeness = (0..adj.len())
        .into_par_iter()
        .map(|source| {
            let (reachable, total) = shortest_path_lengths(&graph, NodeIndex::new(source))
                .into_iter()
                .flatten()
                .filter(|&d| d > 0)
                .fold((0usize, 0usize), |(r, t), d| (r + 1, t + d));
            if reachable == 0 {
                None
            } else {
                Some(reachable as f64 / total as f64)
            }
        })
        .collect();

    Ok(closeness)
}

// ============================================================================
// EIGENVECTOR CENTRALITY
// ============================================================================
//
// A member is central when their contacts are central. Power iteration on
// A + I (the identity shift keeps the iteration from oscillating on bipartite
// graphs such as stars, and does not change the eigenvectors):
//
//   x ← (A + I) x,  x ← x / ‖x‖₂      until Σ|Δx| < n × tolerance
//
// Graphs without edges have no meaningful eigenvector: every score is 0.
// ============================================================================

/// Calculate Eigenvector Centrality (L2-normalized).
///
/// Returns the last estimate if `max_iterations` is reached before converging.
///
/// # Errors
/// - `InvalidParameter` if tolerance <= 0 or a neighbor index is out of bounds
pub fn eigenvector_centrality(
    adj: &[Vec<usize>],
    max_iterations: usize,
    tolerance: f64,
) -> EngineResult<Vec<f64>> {
    let n = adj.len();
    if tolerance <= 0.0 {
        return Err(EngineError::InvalidParameter(format!(
            "tolerance must be positive, got {}",
            tolerance
        )));
    }
    validate_adjacency(adj)?;
    if adj.iter().all(|neighbors| neighbors.is_empty()) {
        return Ok(vec![0.0; n]);
    }

    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..max_iterations {
        let mut next: Vec<f64> = adj
            .iter()
            .enumerate()
            .map(|(v, neighbors)| scores[v] + neighbors.iter().map(|&w| scores[w]).sum::<f64>())
            .collect();

        let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut next {
                *x /= norm;
            }
        }

        let diff: f64 = scores.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        scores = next;
        if diff < n as f64 * tolerance {
            break;
        }
    }

    Ok(scores)
}

// ============================================================================
// ARTICULATION POINTS (Tarjan low-link)
// ============================================================================
//
// A member whose removal splits their component in two: the classic
// single-point-of-failure in a communication network.
//
// DFS assigns each node a discovery time; low[v] is the earliest discovery
// time reachable from v's subtree using at most one back edge.
// - A non-root v is an articulation point if some child c has low[c] >= disc[v]
//   (c's subtree cannot get around v)
// - The DFS root is one if it has two or more DFS children
//
// The DFS is iterative so deep path-like graphs cannot overflow the stack.
//
// Time complexity: O(V + E)
// ============================================================================

/// Indices of articulation points, ascending.
///
/// # Errors
/// - `InvalidParameter` if any neighbor index is out of bounds
pub fn articulation_points(adj: &[Vec<usize>]) -> EngineResult<Vec<usize>> {
    validate_adjacency(adj)?;

    let n = adj.len();
    let mut disc = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut is_articulation = vec![false; n];
    let mut timer = 0usize;

    for root in 0..n {
        if disc[root] != UNVISITED {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;

        let mut root_children = 0usize;
        // (node, DFS parent, next neighbor position)
        let mut stack: Vec<(usize, usize, usize)> = vec![(root, UNVISITED, 0)];

        while let Some(frame) = stack.last_mut() {
            let (v, parent) = (frame.0, frame.1);
            if frame.2 < adj[v].len() {
                let w = adj[v][frame.2];
                frame.2 += 1;
                if disc[w] == UNVISITED {
                    disc[w] = timer;
                    low[w] = timer;
                    timer += 1;
                    if v == root {
                        root_children += 1;
                    }
                    stack.push((w, v, 0));
                } else if w != parent {
                    low[v] = low[v].min(disc[w]);
                }
            } else {
                stack.pop();
                if let Some(&(p, _, _)) = stack.last() {
                    low[p] = low[p].min(low[v]);
                    if p != root && low[v] >= disc[p] {
                        is_articulation[p] = true;
                    }
                }
            }
        }

        if root_children > 1 {
            is_articulation[root] = true;
        }
    }

    Ok((0..n).filter(|&v| is_articulation[v]).collect())
}

// ============================================================================
// LOUVAIN (Modularity-based Community Detection)
// ============================================================================
//
// What is Modularity?
// A score measuring how good a community partition is.
// High modularity = dense connections within communities, sparse between.
//
// Formula:
//   Q = Σ_c [ in_c / 2m - γ (tot_c / 2m)² ]
//
// Where:
//   2m    = sum of all weighted degrees
//   in_c  = weight of edges inside c, counted from both ends
//   tot_c = sum of weighted degrees of the nodes in c
//   γ     = resolution (higher = more, smaller communities)
//
// Louvain Algorithm:
// 1. Each node starts in its own community
// 2. Local moving: visit nodes and move each to the neighboring community with
//    the largest modularity gain, until a sweep moves nothing
// 3. Aggregate every community into a super-node (internal edges become a
//    self-loop) and repeat on the smaller graph
// 4. Stop when a level moves nothing
//
// DETERMINISM:
// The node visiting order of each sweep is shuffled with a ChaCha8 RNG seeded
// from the caller's seed. Gain ties keep the node where it is; among other
// candidates the lowest community id wins. Same graph + same seed = same
// partition, on every platform.
//
// Time complexity: O(E) per sweep, typically a handful of sweeps and levels
// ============================================================================

/// One level of the Louvain hierarchy: weighted adjacency including self-loops.
///
/// `links[i][j]` (i != j) is the weight between i and j, stored from both ends.
/// `links[i][i]` is a self-loop, which contributes twice to i's degree.
struct LevelGraph {
    links: Vec<FxHashMap<usize, f64>>,
    degrees: Vec<f64>,
    total_degree: f64,
}

impl LevelGraph {
    fn from_adjacency(adj: &[Vec<(usize, f64)>]) -> Self {
        let mut links: Vec<FxHashMap<usize, f64>> = vec![FxHashMap::default(); adj.len()];
        for (v, neighbors) in adj.iter().enumerate() {
            for &(w, weight) in neighbors {
                if v != w {
                    *links[v].entry(w).or_insert(0.0) += weight;
                }
            }
        }
        Self::with_links(links)
    }

    fn with_links(links: Vec<FxHashMap<usize, f64>>) -> Self {
        let degrees: Vec<f64> = links
            .iter()
            .enumerate()
            .map(|(v, neighbors)| {
                neighbors
                    .iter()
                    .map(|(&w, &weight)| if w == v { 2.0 * weight } else { weight })
                    .sum()
            })
            .collect();
        let total_degree = degrees.iter().sum();
        Self {
            links,
            degrees,
            total_degree,
        }
    }

    fn len(&self) -> usize {
        self.links.len()
    }

    /// Collapse each community into one node
    fn aggregate(&self, communities: &[usize], count: usize) -> Self {
        let mut links: Vec<FxHashMap<usize, f64>> = vec![FxHashMap::default(); count];
        for (v, neighbors) in self.links.iter().enumerate() {
            let cv = communities[v];
            for (&w, &weight) in neighbors {
                let cw = communities[w];
                if cv != cw {
                    *links[cv].entry(cw).or_insert(0.0) += weight;
                } else if v == w {
                    *links[cv].entry(cv).or_insert(0.0) += weight;
                } else {
                    // Internal edge, seen once from each end
                    *links[cv].entry(cv).or_insert(0.0) += weight / 2.0;
                }
            }
        }
        Self::with_links(links)
    }
}

/// Modularity gain of putting `node` into a community, up to a constant factor.
///
/// ΔQ ∝ k_i,in - γ · tot_c · k_i / 2m
///
/// `community_total` must exclude the node itself.
fn modularity_gain(
    weight_to_community: f64,
    community_total: f64,
    node_degree: f64,
    total_degree: f64,
    resolution: f64,
) -> f64 {
    weight_to_community - resolution * community_total * node_degree / total_degree
}

/// Phase 1: local moving. Returns the community of each node and whether
/// anything moved.
fn local_moving(
    graph: &LevelGraph,
    resolution: f64,
    max_sweeps: usize,
    rng: &mut ChaCha8Rng,
) -> (Vec<usize>, bool) {
    let n = graph.len();
    let mut communities: Vec<usize> = (0..n).collect();
    let mut totals: Vec<f64> = graph.degrees.clone();
    let mut any_moved = false;

    if graph.total_degree <= 0.0 {
        return (communities, false);
    }

    let mut order: Vec<usize> = (0..n).collect();
    for _ in 0..max_sweeps {
        order.shuffle(rng);
        let mut moved = false;

        for &node in &order {
            let current = communities[node];
            let k_i = graph.degrees[node];

            // Weight from node into each neighboring community (self-loop excluded)
            let mut weight_to: FxHashMap<usize, f64> = FxHashMap::default();
            for (&w, &weight) in &graph.links[node] {
                if w != node {
                    *weight_to.entry(communities[w]).or_insert(0.0) += weight;
                }
            }

            totals[current] -= k_i;

            let mut best = current;
            let mut best_gain = modularity_gain(
                weight_to.get(&current).copied().unwrap_or(0.0),
                totals[current],
                k_i,
                graph.total_degree,
                resolution,
            );

            let mut candidates: Vec<usize> = weight_to.keys().copied().collect();
            candidates.sort_unstable();
            for candidate in candidates {
                if candidate == current {
                    continue;
                }
                let gain = modularity_gain(
                    weight_to[&candidate],
                    totals[candidate],
                    k_i,
                    graph.total_degree,
                    resolution,
                );
                if gain > best_gain {
                    best_gain = gain;
                    best = candidate;
                }
            }

            totals[best] += k_i;
            if best != current {
                communities[node] = best;
                moved = true;
            }
        }

        if !moved {
            break;
        }
        any_moved = true;
    }

    (communities, any_moved)
}

/// Renumber communities 0, 1, 2, ... in order of first appearance.
fn renumber(communities: &mut [usize]) -> usize {
    let mut mapping: FxHashMap<usize, usize> = FxHashMap::default();
    for c in communities.iter_mut() {
        let next_id = mapping.len();
        *c = *mapping.entry(*c).or_insert(next_id);
    }
    mapping.len()
}

/// Multi-level Louvain community detection.
///
/// Returns community assignments (index = node, value = community id).
/// Community ids are numbered by the lowest node index they contain, so
/// community 0 always holds node 0. Isolated nodes end up as singletons.
///
/// # Arguments
/// * `adj` - Undirected weighted adjacency (each edge listed from both ends)
/// * `resolution` - Higher = more/smaller communities (must be positive)
/// * `seed` - Seeds the node visiting order
/// * `max_levels` - Maximum aggregation levels
/// * `max_sweeps` - Maximum local-moving sweeps per level
///
/// # Errors
/// - `InvalidParameter` if resolution <= 0, or on an out-of-bounds neighbor or
///   negative weight
pub fn louvain(
    adj: &[Vec<(usize, f64)>],
    resolution: f64,
    seed: u64,
    max_levels: usize,
    max_sweeps: usize,
) -> EngineResult<Vec<usize>> {
    let n = adj.len();
    if n == 0 {
        return Ok(vec![]);
    }
    if resolution <= 0.0 {
        return Err(EngineError::InvalidParameter(format!(
            "resolution must be positive, got {}",
            resolution
        )));
    }
    validate_weighted(adj)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut membership: Vec<usize> = (0..n).collect();
    let mut graph = LevelGraph::from_adjacency(adj);

    for _ in 0..max_levels {
        let (mut communities, moved) = local_moving(&graph, resolution, max_sweeps, &mut rng);
        if !moved {
            break;
        }
        let count = renumber(&mut communities);
        for m in membership.iter_mut() {
            *m = communities[*m];
        }
        if count == graph.len() {
            break;
        }
        graph = graph.aggregate(&communities, count);
    }

    renumber(&mut membership);
    Ok(membership)
}

/// Modularity of a partition of an undirected weighted graph.
///
/// Graphs without edges have modularity 0.
///
/// # Errors
/// - `InvalidParameter` if `communities` does not cover every node
pub fn modularity(
    adj: &[Vec<(usize, f64)>],
    communities: &[usize],
    resolution: f64,
) -> EngineResult<f64> {
    if communities.len() != adj.len() {
        return Err(EngineError::InvalidParameter(format!(
            "partition covers {} nodes but the graph has {}",
            communities.len(),
            adj.len()
        )));
    }
    validate_weighted(adj)?;

    let count = communities.iter().max().map_or(0, |&c| c + 1);
    let mut internal = vec![0.0; count];
    let mut totals = vec![0.0; count];
    let mut total_degree = 0.0;

    for (v, neighbors) in adj.iter().enumerate() {
        for &(w, weight) in neighbors {
            let contribution = if v == w { 2.0 * weight } else { weight };
            totals[communities[v]] += contribution;
            total_degree += contribution;
            if communities[v] == communities[w] {
                internal[communities[v]] += contribution;
            }
        }
    }

    if total_degree <= 0.0 {
        return Ok(0.0);
    }

    Ok(internal
        .iter()
        .zip(&totals)
        .map(|(in_c, tot_c)| in_c / total_degree - resolution * (tot_c / total_degree).powi(2))
        .sum())
}

// ============================================================================
// UNIT TESTS
// - Edge cases (empty, single node, isolated nodes)
// - Known graph topologies (star, path, complete, two cliques)
// - Determinism of seeded community detection
// ============================================================================
