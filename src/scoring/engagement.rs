//! Engagement: how evenly the team takes part
//!
//! ```text
//! participation = members who sent at least once / members
//! balance       = 1 - Gini(sent counts, silent members included)
//! two_way       = reciprocated member pairs / (n(n-1)/2)
//! Engagement    = 100 × (wp·participation + wb·balance + wt·two_way)
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::MemberId;
use crate::scoring::curves::{clamp_ratio, clamp_score};
use crate::snapshot::TeamSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementResult {
    /// 0-100
    pub engagement_score: f64,
    /// Share of members who sent at least one communication (0-1)
    pub participation_rate: f64,
    /// 1 - Gini coefficient (0-1, higher is more even)
    pub balance_score: f64,
    /// Gini coefficient of per-member sent counts (0 = perfectly even)
    pub gini_coefficient: f64,
    /// Share of member pairs that communicated in both directions (0-1)
    pub two_way_communication_score: f64,
    pub active_members: usize,
    pub member_count: usize,
}

/// Gini coefficient of non-negative values.
///
/// Mean absolute difference over twice the mean, computed on the sorted
/// values in O(n log n):
///
/// ```text
/// G = (2 Σ i·x_(i)) / (n Σ x) - (n + 1) / n      (i = 1..n, ascending)
/// ```
///
/// Empty input or an all-zero distribution yields 0.
pub fn gini_coefficient(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, x)| (i + 1) as f64 * x)
        .sum();
    let n = n as f64;
    clamp_ratio(2.0 * weighted / (n * total) - (n + 1.0) / n)
}

pub struct EngagementCalculator<'a> {
    config: &'a EngineConfig,
}

impl<'a> EngagementCalculator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, snapshot: &TeamSnapshot<'_>) -> EngagementResult {
        let member_count = snapshot.member_count();
        let comms = snapshot.communications();
        if member_count == 0 || comms.is_empty() {
            return EngagementResult {
                member_count,
                ..Default::default()
            };
        }

        let mut sent: FxHashMap<MemberId, usize> =
            snapshot.members().iter().map(|m| (m.id, 0)).collect();
        let mut directed: FxHashSet<(MemberId, MemberId)> = FxHashSet::default();

        for comm in comms {
            *sent.entry(comm.sender_id).or_insert(0) += 1;
            for other in snapshot.participants(comm).into_iter().skip(1) {
                directed.insert((comm.sender_id, other));
            }
        }

        let active_members = sent.values().filter(|&&count| count > 0).count();
        let participation_rate = clamp_ratio(active_members as f64 / member_count as f64);

        let counts: Vec<f64> = sent.values().map(|&c| c as f64).collect();
        let gini = gini_coefficient(&counts);
        let balance_score = clamp_ratio(1.0 - gini);

        let reciprocated = directed
            .iter()
            .filter(|(a, b)| a < b && directed.contains(&(*b, *a)))
            .count();
        let possible_pairs = member_count * member_count.saturating_sub(1) / 2;
        let two_way_communication_score = if possible_pairs == 0 {
            0.0
        } else {
            clamp_ratio(reciprocated as f64 / possible_pairs as f64)
        };

        let w = &self.config.engagement;
        let engagement_score = clamp_score(
            100.0
                * (w.participation_weight * participation_rate
                    + w.balance_weight * balance_score
                    + w.two_way_weight * two_way_communication_score),
        );

        debug!(
            "Engagement: participation={:.2}, gini={:.3}, two-way={:.2} -> {:.1}",
            participation_rate, gini, two_way_communication_score, engagement_score
        );

        EngagementResult {
            engagement_score,
            participation_rate,
            balance_score,
            gini_coefficient: gini,
            two_way_communication_score,
            active_members,
            member_count,
        }
    }
}
