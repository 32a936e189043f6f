//! Engine entry points
//!
//! Orchestrates a team analysis:
//! 1. Validate the inputs and filter them to the window (`TeamSnapshot`)
//! 2. Score Energy, Engagement and Exploration, then combine them
//! 3. Build the communication graph once
//! 4. Run the network, centrality and community analyses on it
//!
//! Independent stages run in parallel with `rayon::join`. Nothing is shared
//! between calls, so different teams or windows can be analyzed concurrently.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::errors::EngineResult;
use crate::models::{Communication, Member, ScoringWindow, TeamId};
use crate::network::{
    CentralityAnalyzer, CentralityReport, CommunityDetector, CommunityPartition, NetworkAnalyzer,
    NetworkSummary, TeamGraph,
};
use crate::scoring::{
    combine, get_rating, get_recommendations, EnergyCalculator, EnergyResult,
    EngagementCalculator, EngagementResult, ExplorationCalculator, ExplorationResult,
    OverallScore, Rating,
};
use crate::snapshot::TeamSnapshot;

/// Rating of each sub-score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScoreRatings {
    pub energy: Rating,
    pub engagement: Rating,
    pub exploration: Rating,
}

/// Energy, Engagement, Exploration and their combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeEsReport {
    pub window: ScoringWindow,
    pub energy: EnergyResult,
    pub engagement: EngagementResult,
    pub exploration: ExplorationResult,
    pub overall: OverallScore,
    pub ratings: SubScoreRatings,
    pub recommendations: Vec<String>,
}

/// Everything the engine knows about a team for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub team_id: Option<TeamId>,
    pub member_count: usize,
    pub three_es: ThreeEsReport,
    pub network: NetworkSummary,
    pub centrality: CentralityReport,
    pub communities: CommunityPartition,
}

/// Score a team's Energy, Engagement and Exploration and combine them.
///
/// # Errors
/// - `DataConsistency` for malformed input
/// - `InsufficientData` for a team without members
/// - `InvalidConfig` for overall weights that do not sum to 1.0
pub fn compute_three_es(
    members: &[Member],
    communications: &[Communication],
    window: ScoringWindow,
    config: &EngineConfig,
) -> EngineResult<ThreeEsReport> {
    let snapshot = TeamSnapshot::new(members, communications, window)?;
    three_es_for(&snapshot, config)
}

fn three_es_for(snapshot: &TeamSnapshot<'_>, config: &EngineConfig) -> EngineResult<ThreeEsReport> {
    let (energy, (engagement, exploration)) = rayon::join(
        || EnergyCalculator::new(config).calculate(snapshot),
        || {
            rayon::join(
                || EngagementCalculator::new(config).calculate(snapshot),
                || ExplorationCalculator::new(config).calculate(snapshot),
            )
        },
    );

    let overall = combine(&energy, &engagement, &exploration, config)?;
    let ratings = SubScoreRatings {
        energy: get_rating(energy.energy_score, &config.ratings),
        engagement: get_rating(engagement.engagement_score, &config.ratings),
        exploration: get_rating(exploration.exploration_score, &config.ratings),
    };
    let recommendations = get_recommendations(
        energy.energy_score,
        engagement.engagement_score,
        exploration.exploration_score,
        &config.recommendations,
    );

    Ok(ThreeEsReport {
        window: snapshot.window(),
        energy,
        engagement,
        exploration,
        overall,
        ratings,
        recommendations,
    })
}

/// Build the communication graph of a team for a window.
///
/// # Errors
/// - `DataConsistency` for malformed input
pub fn build_network(
    members: &[Member],
    communications: &[Communication],
    window: ScoringWindow,
    config: &EngineConfig,
) -> EngineResult<TeamGraph> {
    let snapshot = TeamSnapshot::new(members, communications, window)?;
    Ok(TeamGraph::build(&snapshot, config))
}

pub fn analyze_network(graph: &TeamGraph, config: &EngineConfig) -> EngineResult<NetworkSummary> {
    NetworkAnalyzer::new(config).analyze(graph)
}

pub fn compute_centrality(
    graph: &TeamGraph,
    config: &EngineConfig,
) -> EngineResult<CentralityReport> {
    CentralityAnalyzer::new(config).analyze(graph)
}

pub fn detect_communities(
    graph: &TeamGraph,
    config: &EngineConfig,
) -> EngineResult<CommunityPartition> {
    CommunityDetector::new(config).detect(graph)
}

/// Full report: the three Es plus every network analysis, from one snapshot.
///
/// # Errors
/// Any error of `compute_three_es` or the network analyses.
pub fn analyze_team(
    members: &[Member],
    communications: &[Communication],
    window: ScoringWindow,
    config: &EngineConfig,
) -> EngineResult<TeamReport> {
    let snapshot = TeamSnapshot::new(members, communications, window)?;
    let graph = TeamGraph::build(&snapshot, config);

    let (three_es, (network, (centrality, communities))) = rayon::join(
        || three_es_for(&snapshot, config),
        || {
            rayon::join(
                || analyze_network(&graph, config),
                || {
                    rayon::join(
                        || compute_centrality(&graph, config),
                        || detect_communities(&graph, config),
                    )
                },
            )
        },
    );

    let report = TeamReport {
        team_id: snapshot.team_id(),
        member_count: snapshot.member_count(),
        three_es: three_es?,
        network: network?,
        centrality: centrality?,
        communities: communities?,
    };

    info!(
        "Team report: {} members, {} communications, overall {:.1}, {} communities",
        report.member_count,
        snapshot.communications().len(),
        report.three_es.overall.overall_score,
        report.communities.num_communities
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::models::CommunicationType;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
    }

    fn window() -> ScoringWindow {
        ScoringWindow::new(start(), start() + Duration::days(14)).unwrap()
    }

    fn team() -> Vec<Member> {
        (1..=4).map(|id| Member::new(id, format!("m{id}"), 3)).collect()
    }

    fn comms() -> Vec<Communication> {
        let pairs = [(1, 2), (2, 1), (2, 3), (3, 4), (4, 1), (1, 3)];
        let mut comms: Vec<Communication> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| {
                Communication::direct(
                    i as u64,
                    a,
                    b,
                    3,
                    CommunicationType::FaceToFace,
                    start() + Duration::hours(i as i64),
                )
                .with_duration(20.0)
            })
            .collect();
        comms.push(
            Communication::direct(99, 4, 700, 3, CommunicationType::Email, start())
                .cross_team(Some(8)),
        );
        comms
    }

    #[test]
    fn test_three_es_in_range() {
        let report =
            compute_three_es(&team(), &comms(), window(), &EngineConfig::default()).unwrap();
        for score in [
            report.energy.energy_score,
            report.engagement.engagement_score,
            report.exploration.exploration_score,
            report.overall.overall_score,
        ] {
            assert!((0.0..=100.0).contains(&score));
        }
        assert_eq!(report.exploration.cross_team_communications, 1);
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn test_empty_team_is_insufficient_data() {
        let err = compute_three_es(&[], &[], window(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { .. }));
    }

    #[test]
    fn test_unknown_member_is_data_consistency() {
        let mut comms = comms();
        comms.push(Communication::direct(50, 9, 1, 3, CommunicationType::Chat, start()));
        let config = EngineConfig::default();
        assert!(matches!(
            compute_three_es(&team(), &comms, window(), &config),
            Err(EngineError::DataConsistency { .. })
        ));
        assert!(build_network(&team(), &comms, window(), &config).is_err());
    }

    #[test]
    fn test_analyze_team_matches_individual_calls() {
        let config = EngineConfig::default();
        let report = analyze_team(&team(), &comms(), window(), &config).unwrap();
        let graph = build_network(&team(), &comms(), window(), &config).unwrap();

        assert_eq!(report.team_id, Some(3));
        assert_eq!(report.member_count, 4);
        assert_eq!(report.network, analyze_network(&graph, &config).unwrap());
        assert_eq!(report.centrality, compute_centrality(&graph, &config).unwrap());
        assert_eq!(report.communities, detect_communities(&graph, &config).unwrap());
        assert_eq!(
            report.three_es,
            compute_three_es(&team(), &comms(), window(), &config).unwrap()
        );
    }

    #[test]
    fn test_report_serializes_with_contract_field_names() {
        let report =
            analyze_team(&team(), &comms(), window(), &EngineConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["three_es"]["energy"]["energy_score"].is_number());
        assert!(json["three_es"]["engagement"]["gini_coefficient"].is_number());
        assert!(json["network"]["density"].is_number());
        assert!(json["network"]["most_central_member_id"].is_number());
        assert!(json["communities"]["modularity"].is_number());
    }
}
