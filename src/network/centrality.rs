//! Per-member centrality and role classification
//!
//! | role | ranked by | eligible when |
//! |------|-----------|---------------|
//! | connector | betweenness | betweenness >= 0.05 and betweenness / degree >= 0.5 |
//! | influencer | degree | degree >= 0.5 |
//! | hub | closeness | closeness >= 0.6 |
//!
//! Thresholds and the list length (top 3) come from `RoleThresholds`. Ties
//! rank the lower member id first. Isolated members have no closeness and
//! never rank as hubs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, RoleThresholds};
use crate::errors::EngineResult;
use crate::models::MemberId;
use crate::network::analyzer::{mean, std_dev};
use crate::network::builder::TeamGraph;
use crate::network::graph_algo::{
    betweenness_centrality, closeness_centrality, degree_centrality, eigenvector_centrality,
};

/// Centrality values of one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberCentrality {
    pub member_id: MemberId,
    pub name: String,
    /// Degree / (n - 1)
    pub degree: f64,
    /// Normalized betweenness (0-1)
    pub betweenness: f64,
    /// `None` for members who reach nobody
    pub closeness: Option<f64>,
    pub eigenvector: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMember {
    pub member_id: MemberId,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyRoles {
    /// Bridge otherwise distant parts of the team
    pub connectors: Vec<RankedMember>,
    /// Talk directly with most of the team
    pub influencers: Vec<RankedMember>,
    /// Reach everyone in few hops
    pub hubs: Vec<RankedMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentralityReport {
    /// One entry per member, ascending id
    pub members: Vec<MemberCentrality>,
    pub key_roles: KeyRoles,
    pub insights: Vec<String>,
}

impl CentralityReport {
    pub fn member(&self, member_id: MemberId) -> Option<&MemberCentrality> {
        self.members.iter().find(|m| m.member_id == member_id)
    }
}

pub struct CentralityAnalyzer<'a> {
    config: &'a EngineConfig,
}

impl<'a> CentralityAnalyzer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, graph: &TeamGraph) -> EngineResult<CentralityReport> {
        let adj = graph.adjacency();
        let ids = graph.member_ids();

        let degree = degree_centrality(&adj);
        let betweenness = betweenness_centrality(&adj, true)?;
        let closeness = closeness_centrality(&adj)?;
        let eigenvector = eigenvector_centrality(
            &adj,
            self.config.centrality.eigenvector_max_iterations,
            self.config.centrality.eigenvector_tolerance,
        )?;

        let members: Vec<MemberCentrality> = ids
            .iter()
            .enumerate()
            .map(|(v, &id)| MemberCentrality {
                member_id: id,
                name: graph.member_name(id).unwrap_or_default().to_string(),
                degree: degree[v],
                betweenness: betweenness[v],
                closeness: closeness[v],
                eigenvector: eigenvector[v],
            })
            .collect();

        let key_roles = classify_roles(&members, &self.config.roles);
        let insights = self.insights(&members);

        debug!(
            "Centrality: {} connectors, {} influencers, {} hubs",
            key_roles.connectors.len(),
            key_roles.influencers.len(),
            key_roles.hubs.len()
        );

        Ok(CentralityReport {
            members,
            key_roles,
            insights,
        })
    }

    fn insights(&self, members: &[MemberCentrality]) -> Vec<String> {
        let mut insights = Vec::new();
        let betweenness: Vec<f64> = members.iter().map(|m| m.betweenness).collect();

        let max_betweenness = betweenness.iter().copied().fold(0.0, f64::max);
        if max_betweenness > self.config.centrality.over_centralization_betweenness {
            insights.push(
                "Communication is highly centralized around one person; consider spreading coordination duties."
                    .to_string(),
            );
        }

        let isolated = members.iter().filter(|m| m.degree == 0.0).count();
        if isolated > 0 && members.len() > 1 {
            insights.push(format!(
                "{} member(s) are isolated with no connections.",
                isolated
            ));
        }

        let avg = mean(&betweenness);
        if members.len() > 3
            && avg > 0.0
            && std_dev(&betweenness) / avg < self.config.centrality.distributed_cv
        {
            insights.push(
                "Communication responsibility is well distributed across the team.".to_string(),
            );
        }

        if insights.is_empty() {
            insights.push("Network structure appears healthy.".to_string());
        }
        insights
    }
}

/// Rank eligible members by `score`, highest first, lower id on ties
fn rank<F, S>(
    members: &[MemberCentrality],
    top_k: usize,
    eligible: F,
    score: S,
) -> Vec<RankedMember>
where
    F: Fn(&MemberCentrality) -> bool,
    S: Fn(&MemberCentrality) -> f64,
{
    let mut ranked: Vec<RankedMember> = members
        .iter()
        .filter(|&m| eligible(m))
        .map(|m| RankedMember {
            member_id: m.member_id,
            name: m.name.clone(),
            score: score(m),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
    ranked.truncate(top_k);
    ranked
}

pub fn classify_roles(members: &[MemberCentrality], thresholds: &RoleThresholds) -> KeyRoles {
    let connectors = rank(
        members,
        thresholds.top_k,
        |m| {
            m.degree > 0.0
                && m.betweenness >= thresholds.connector_min_betweenness
                && m.betweenness / m.degree >= thresholds.connector_min_bridge_ratio
        },
        |m| m.betweenness,
    );
    let influencers = rank(
        members,
        thresholds.top_k,
        |m| m.degree >= thresholds.influencer_min_degree && m.degree > 0.0,
        |m| m.degree,
    );
    let hubs = rank(
        members,
        thresholds.top_k,
        |m| m.closeness.is_some_and(|c| c >= thresholds.hub_min_closeness),
        |m| m.closeness.unwrap_or(0.0),
    );

    KeyRoles {
        connectors,
        influencers,
        hubs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Communication, CommunicationType, Member, ScoringWindow};
    use crate::snapshot::TeamSnapshot;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 4, 9, 0, 0).unwrap()
    }

    fn report(n: u64, pairs: &[(MemberId, MemberId)]) -> CentralityReport {
        let members: Vec<Member> = (1..=n).map(|id| Member::new(id, format!("m{id}"), 1)).collect();
        let comms: Vec<Communication> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| {
                Communication::direct(i as u64, a, b, 1, CommunicationType::VideoCall, start())
            })
            .collect();
        let config = EngineConfig::default();
        let window = ScoringWindow::new(start(), start() + Duration::days(1)).unwrap();
        let snapshot = TeamSnapshot::new(&members, &comms, window).unwrap();
        let graph = TeamGraph::build(&snapshot, &config);
        CentralityAnalyzer::new(&config).analyze(&graph).unwrap()
    }

    fn ids(ranked: &[RankedMember]) -> Vec<MemberId> {
        ranked.iter().map(|r| r.member_id).collect()
    }

    #[test]
    fn test_star_roles() {
        let report = report(6, &[(1, 2), (1, 3), (1, 4), (1, 5), (1, 6)]);
        let center = report.member(1).unwrap();
        assert!(approx_eq(center.degree, 1.0));
        assert!(approx_eq(center.betweenness, 1.0));
        assert!(approx_eq(center.closeness.unwrap(), 1.0));

        assert_eq!(ids(&report.key_roles.connectors), vec![1]);
        assert_eq!(ids(&report.key_roles.influencers), vec![1]);
        assert_eq!(ids(&report.key_roles.hubs), vec![1]);
        assert!(report.insights[0].contains("centralized"));
    }

    #[test]
    fn test_isolated_member_values() {
        let report = report(3, &[(1, 2)]);
        let isolated = report.member(3).unwrap();
        assert_eq!(isolated.degree, 0.0);
        assert_eq!(isolated.betweenness, 0.0);
        assert_eq!(isolated.closeness, None);
        assert!(!ids(&report.key_roles.hubs).contains(&3));
        assert!(report.insights.iter().any(|i| i.starts_with("1 member(s) are isolated")));
    }

    #[test]
    fn test_complete_graph_ties_by_id_and_top_k() {
        let pairs = [
            (1, 2),
            (1, 3),
            (1, 4),
            (1, 5),
            (2, 3),
            (2, 4),
            (2, 5),
            (3, 4),
            (3, 5),
            (4, 5),
        ];
        let report = report(5, &pairs);
        // Everyone is tied: top 3 by id
        assert_eq!(ids(&report.key_roles.influencers), vec![1, 2, 3]);
        assert_eq!(ids(&report.key_roles.hubs), vec![1, 2, 3]);
        // Nobody bridges anything
        assert!(report.key_roles.connectors.is_empty());
    }

    #[test]
    fn test_bridge_member_is_connector() {
        // Two triangles joined through 3-4
        let pairs = [(1, 2), (2, 3), (1, 3), (4, 5), (5, 6), (4, 6), (3, 4)];
        let report = report(6, &pairs);
        assert_eq!(ids(&report.key_roles.connectors), vec![3, 4]);
    }

    #[test]
    fn test_well_distributed_cycle() {
        // 5-cycle: identical betweenness for everyone
        let report = report(5, &[(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)]);
        assert!(report
            .insights
            .iter()
            .any(|i| i.contains("well distributed")));
    }

    #[test]
    fn test_no_members() {
        let report = report(0, &[]);
        assert!(report.members.is_empty());
        assert!(report.key_roles.connectors.is_empty());
        assert_eq!(report.insights, vec!["Network structure appears healthy.".to_string()]);
    }

    #[test]
    fn test_role_thresholds_are_configurable() {
        let members = vec![
            MemberCentrality {
                member_id: 7,
                name: "x".into(),
                degree: 0.4,
                betweenness: 0.3,
                closeness: Some(0.55),
                eigenvector: 0.1,
            },
            MemberCentrality {
                member_id: 3,
                name: "y".into(),
                degree: 0.4,
                betweenness: 0.1,
                closeness: Some(0.65),
                eigenvector: 0.1,
            },
        ];
        let defaults = classify_roles(&members, &RoleThresholds::default());
        assert_eq!(ids(&defaults.connectors), vec![7]);
        assert!(defaults.influencers.is_empty());
        assert_eq!(ids(&defaults.hubs), vec![3]);

        let relaxed = RoleThresholds {
            influencer_min_degree: 0.4,
            hub_min_closeness: 0.5,
            top_k: 1,
            ..RoleThresholds::default()
        };
        let roles = classify_roles(&members, &relaxed);
        // Tied on degree: lower id first
        assert_eq!(ids(&roles.influencers), vec![3]);
        assert_eq!(ids(&roles.hubs), vec![3]);
    }
}
