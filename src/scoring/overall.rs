//! Weighted combination of the three sub-scores

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{EngineConfig, OverallWeights};
use crate::errors::{EngineError, EngineResult};
use crate::scoring::curves::clamp_score;
use crate::scoring::energy::EnergyResult;
use crate::scoring::engagement::EngagementResult;
use crate::scoring::exploration::ExplorationResult;
use crate::scoring::rating::{get_rating, Rating};

const COMPUTATION: &str = "overall score";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallScore {
    /// 0-100
    pub overall_score: f64,
    pub rating: Rating,
    pub weights: OverallWeights,
}

/// Combine sub-scores with the configured weights.
///
/// # Errors
/// - `InvalidConfig` when the weights do not sum to 1.0
/// - `InsufficientData` when any sub-score was computed over zero members
///   or is not a number
pub fn combine(
    energy: &EnergyResult,
    engagement: &EngagementResult,
    exploration: &ExplorationResult,
    config: &EngineConfig,
) -> EngineResult<OverallScore> {
    let weights = &config.overall;
    if !weights.is_valid() {
        return Err(EngineError::InvalidConfig(format!(
            "overall weights must sum to 1.0, got {:.3}",
            weights.energy + weights.engagement + weights.exploration
        )));
    }

    let parts = [
        ("energy", energy.energy_score, energy.member_count),
        ("engagement", engagement.engagement_score, engagement.member_count),
        ("exploration", exploration.exploration_score, exploration.member_count),
    ];
    for (name, score, members) in parts {
        if members == 0 {
            return Err(EngineError::insufficient_data(
                COMPUTATION,
                format!("{} was computed for a team with no members", name),
            ));
        }
        if score.is_nan() {
            return Err(EngineError::insufficient_data(
                COMPUTATION,
                format!("{} score is undefined", name),
            ));
        }
    }

    let overall_score = clamp_score(
        energy.energy_score * weights.energy
            + engagement.engagement_score * weights.engagement
            + exploration.exploration_score * weights.exploration,
    );
    let rating = get_rating(overall_score, &config.ratings);

    info!(
        "Team score: {:.1} ({}) - Energy: {:.1}, Engagement: {:.1}, Exploration: {:.1}",
        overall_score,
        rating,
        energy.energy_score,
        engagement.engagement_score,
        exploration.exploration_score
    );

    Ok(OverallScore {
        overall_score,
        rating,
        weights: weights.clone(),
    })
}
