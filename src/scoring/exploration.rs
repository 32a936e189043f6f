//! Exploration: how much the team reaches outside itself
//!
//! ```text
//! r           = cross-team communications / all communications
//! Exploration = 100 × (1 - e^(-k r)) / (1 - e^(-k))
//! ```
//!
//! Concave in `r`: the first cross-team contacts move the score most.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{MemberId, TeamId};
use crate::scoring::curves::{clamp_ratio, clamp_score, concave_ratio};
use crate::snapshot::TeamSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorationResult {
    /// 0-100
    pub exploration_score: f64,
    pub cross_team_communications: usize,
    pub total_communications: usize,
    /// Cross-team share of all communications (0-1)
    pub exploration_ratio: f64,
    /// Members who sent at least one cross-team communication
    pub members_exploring: usize,
    /// `members_exploring / members` (0-1)
    pub member_exploration_rate: f64,
    /// Distinct external teams contacted, where recorded
    pub external_teams_contacted: usize,
    pub member_count: usize,
}

pub struct ExplorationCalculator<'a> {
    config: &'a EngineConfig,
}

impl<'a> ExplorationCalculator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, snapshot: &TeamSnapshot<'_>) -> ExplorationResult {
        let member_count = snapshot.member_count();
        let comms = snapshot.communications();
        if member_count == 0 || comms.is_empty() {
            return ExplorationResult {
                member_count,
                ..Default::default()
            };
        }

        let mut cross_team = 0usize;
        let mut explorers: FxHashSet<MemberId> = FxHashSet::default();
        let mut external_teams: FxHashSet<TeamId> = FxHashSet::default();

        for comm in comms.iter().filter(|c| c.is_cross_team) {
            cross_team += 1;
            explorers.insert(comm.sender_id);
            if let Some(team) = comm.external_team_id {
                external_teams.insert(team);
            }
        }

        let total = comms.len();
        let ratio = clamp_ratio(cross_team as f64 / total as f64);
        let exploration_score =
            clamp_score(100.0 * concave_ratio(ratio, self.config.exploration.curvature));

        debug!(
            "Exploration: {}/{} cross-team, {} explorers -> {:.1}",
            cross_team,
            total,
            explorers.len(),
            exploration_score
        );

        ExplorationResult {
            exploration_score,
            cross_team_communications: cross_team,
            total_communications: total,
            exploration_ratio: ratio,
            members_exploring: explorers.len(),
            member_exploration_rate: clamp_ratio(explorers.len() as f64 / member_count as f64),
            external_teams_contacted: external_teams.len(),
            member_count,
        }
    }
}
