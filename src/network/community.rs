//! Community detection: sub-groups and silos inside a team

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CommunityConfig, EngineConfig};
use crate::errors::EngineResult;
use crate::models::MemberId;
use crate::network::builder::TeamGraph;
use crate::network::graph_algo::{louvain, modularity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// 1-based, in order of each community's smallest member id
    pub community_id: usize,
    /// Ascending
    pub member_ids: Vec<MemberId>,
    pub member_names: Vec<String>,
    pub size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityPartition {
    pub communities: Vec<Community>,
    pub num_communities: usize,
    pub modularity: f64,
    /// Modularity above the silo threshold
    pub is_siloed: bool,
    pub interpretation: String,
    /// Seed the partition was computed with
    pub seed: u64,
}

impl CommunityPartition {
    /// Community id of a member
    pub fn community_of(&self, member_id: MemberId) -> Option<usize> {
        self.communities
            .iter()
            .find(|c| c.member_ids.contains(&member_id))
            .map(|c| c.community_id)
    }
}

pub struct CommunityDetector<'a> {
    config: &'a EngineConfig,
}

impl<'a> CommunityDetector<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, graph: &TeamGraph) -> EngineResult<CommunityPartition> {
        let settings = &self.config.community;
        let adj = graph.weighted_adjacency();
        let assignment = louvain(
            &adj,
            settings.resolution,
            settings.seed,
            settings.max_levels,
            settings.max_sweeps,
        )?;
        let q = modularity(&adj, &assignment, settings.resolution)?;

        let count = assignment.iter().max().map_or(0, |&c| c + 1);
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (node, &c) in assignment.iter().enumerate() {
            groups[c].push(node);
        }

        let communities: Vec<Community> = groups
            .into_iter()
            .enumerate()
            .map(|(i, nodes)| {
                let member_ids: Vec<MemberId> =
                    nodes.iter().filter_map(|&v| graph.member_id(v)).collect();
                let member_names = member_ids
                    .iter()
                    .filter_map(|&id| graph.member_name(id).map(str::to_string))
                    .collect();
                Community {
                    community_id: i + 1,
                    size: member_ids.len(),
                    member_ids,
                    member_names,
                }
            })
            .collect();

        let num_communities = communities.len();
        debug!(
            "Communities: {} found, modularity={:.3}, seed={}",
            num_communities, q, settings.seed
        );

        Ok(CommunityPartition {
            num_communities,
            is_siloed: q > settings.siloed_modularity,
            interpretation: interpret(num_communities, q, settings),
            modularity: q,
            communities,
            seed: settings.seed,
        })
    }
}

fn interpret(num_communities: usize, modularity: f64, settings: &CommunityConfig) -> String {
    match num_communities {
        0 => "No members to group.".to_string(),
        1 => "Team is well integrated with no distinct sub-groups.".to_string(),
        n if modularity > settings.high_modularity => format!(
            "Team splits into {} distinct silos (high modularity: {:.2}). Cross-group activities would help.",
            n, modularity
        ),
        n if modularity > settings.moderate_modularity => format!(
            "Team has {} sub-groups but keeps good cross-communication (moderate modularity: {:.2}).",
            n, modularity
        ),
        n => format!(
            "Team has {} informal groupings with strong cross-communication (low modularity: {:.2}).",
            n, modularity
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Communication, CommunicationType, Member, ScoringWindow};
    use crate::snapshot::TeamSnapshot;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 2, 9, 0, 0).unwrap()
    }

    fn detect_with(
        config: &EngineConfig,
        n: u64,
        pairs: &[(MemberId, MemberId)],
    ) -> CommunityPartition {
        let members: Vec<Member> = (1..=n).map(|id| Member::new(id, format!("m{id}"), 1)).collect();
        let comms: Vec<Communication> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| {
                Communication::direct(i as u64, a, b, 1, CommunicationType::Meeting, start())
            })
            .collect();
        let window = ScoringWindow::new(start(), start() + Duration::days(1)).unwrap();
        let snapshot = TeamSnapshot::new(&members, &comms, window).unwrap();
        let graph = TeamGraph::build(&snapshot, config);
        CommunityDetector::new(config).detect(&graph).unwrap()
    }

    fn detect(n: u64, pairs: &[(MemberId, MemberId)]) -> CommunityPartition {
        detect_with(&EngineConfig::default(), n, pairs)
    }

    const TWO_CLIQUES: [(MemberId, MemberId); 13] = [
        (1, 2),
        (1, 3),
        (1, 4),
        (2, 3),
        (2, 4),
        (3, 4),
        (5, 6),
        (5, 7),
        (5, 8),
        (6, 7),
        (6, 8),
        (7, 8),
        (4, 5),
    ];

    #[test]
    fn test_two_cliques_split() {
        let partition = detect(8, &TWO_CLIQUES);
        assert_eq!(partition.num_communities, 2);
        assert_eq!(partition.communities[0].member_ids, vec![1, 2, 3, 4]);
        assert_eq!(partition.communities[1].member_ids, vec![5, 6, 7, 8]);
        assert_eq!(partition.communities[0].member_names[0], "m1");
        assert_eq!(partition.community_of(6), Some(2));
        // 2 × (12/26 - (13/26)²) ≈ 0.423
        assert!((partition.modularity - 0.4230769).abs() < 1e-6);
        assert!(partition.is_siloed);
        assert!(partition.interpretation.contains("moderate"));
    }

    #[test]
    fn test_isolated_members_are_singletons() {
        let partition = detect(4, &[(1, 2)]);
        assert_eq!(partition.num_communities, 3);
        assert_eq!(partition.communities[1].member_ids, vec![3]);
        assert_eq!(partition.communities[2].member_ids, vec![4]);
    }

    #[test]
    fn test_complete_graph_is_integrated() {
        let pairs = [(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)];
        let partition = detect(4, &pairs);
        assert_eq!(partition.num_communities, 1);
        assert!(!partition.is_siloed);
        assert!(partition.interpretation.contains("well integrated"));
    }

    #[test]
    fn test_same_seed_same_partition() {
        let mut config = EngineConfig::default();
        config.community.seed = 1234;
        let first = detect_with(&config, 8, &TWO_CLIQUES);
        let second = detect_with(&config, 8, &TWO_CLIQUES);
        assert_eq!(first, second);
        assert_eq!(first.seed, 1234);
    }

    #[test]
    fn test_empty_team() {
        let partition = detect(0, &[]);
        assert_eq!(partition.num_communities, 0);
        assert_eq!(partition.modularity, 0.0);
        assert_eq!(partition.interpretation, "No members to group.");
    }

    #[test]
    fn test_interpretation_bands() {
        let settings = CommunityConfig::default();
        assert!(interpret(3, 0.6, &settings).contains("silos"));
        assert!(interpret(3, 0.35, &settings).contains("moderate"));
        assert!(interpret(3, 0.1, &settings).contains("low modularity"));
    }
}
