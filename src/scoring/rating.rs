//! Qualitative ratings and recommendations derived from scores

use serde::{Deserialize, Serialize};

use crate::config::{RatingThresholds, RecommendationThresholds};

/// Qualitative band of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::NeedsImprovement => "Needs Improvement",
            Rating::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a score onto its rating band; each boundary is inclusive from below
pub fn get_rating(score: f64, thresholds: &RatingThresholds) -> Rating {
    if score >= thresholds.excellent {
        Rating::Excellent
    } else if score >= thresholds.good {
        Rating::Good
    } else if score >= thresholds.fair {
        Rating::Fair
    } else if score >= thresholds.needs_improvement {
        Rating::NeedsImprovement
    } else {
        Rating::Poor
    }
}

const ALL_STRONG: &str =
    "Team communication is strong across the board. Keep monitoring and keep the current habits.";

/// Actionable advice for the three sub-scores.
///
/// Each threshold triple is `[fair, good, excellent]`. Never empty.
pub fn get_recommendations(
    energy: f64,
    engagement: f64,
    exploration: f64,
    thresholds: &RecommendationThresholds,
) -> Vec<String> {
    let [energy_fair, energy_good, energy_excellent] = thresholds.energy;
    let [engagement_fair, engagement_good, engagement_excellent] = thresholds.engagement;
    let [exploration_fair, exploration_good, exploration_excellent] = thresholds.exploration;

    let rules: [(bool, &str); 9] = [
        (
            energy < energy_fair,
            "Energy is low. Make room for more face-to-face conversations and regular team touchpoints.",
        ),
        (
            (energy_fair..energy_good).contains(&energy),
            "Communicate more often. Short daily check-ins or stand-ups help.",
        ),
        (
            engagement < engagement_fair,
            "Engagement is uneven. Make sure every member gets a voice in discussions.",
        ),
        (
            engagement < engagement_fair,
            "A few people dominate the conversation. Encourage replies and two-way exchanges.",
        ),
        (
            (engagement_fair..engagement_good).contains(&engagement),
            "Engagement is reasonable. More peer-to-peer side conversations would lift it further.",
        ),
        (
            exploration < exploration_fair,
            "The team rarely reaches outside itself. Encourage members to talk with other teams and share what they learn.",
        ),
        (
            exploration < exploration_fair,
            "Set up cross-functional sessions with neighbouring teams.",
        ),
        (
            (exploration_fair..exploration_good).contains(&exploration),
            "Grow cross-team contact through shared events, demos or rotating pairings.",
        ),
        (
            energy >= energy_excellent
                && engagement >= engagement_excellent
                && exploration >= exploration_excellent,
            "Excellent collaboration on all three dimensions. Keep iterating on what works.",
        ),
    ];

    let recommendations: Vec<String> = rules
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect();

    if recommendations.is_empty() {
        vec![ALL_STRONG.to_string()]
    } else {
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_boundaries() {
        let t = RatingThresholds::default();
        assert_eq!(get_rating(100.0, &t), Rating::Excellent);
        assert_eq!(get_rating(80.0, &t), Rating::Excellent);
        assert_eq!(get_rating(79.9, &t), Rating::Good);
        assert_eq!(get_rating(60.0, &t), Rating::Good);
        assert_eq!(get_rating(40.0, &t), Rating::Fair);
        assert_eq!(get_rating(20.0, &t), Rating::NeedsImprovement);
        assert_eq!(get_rating(19.99, &t), Rating::Poor);
        assert_eq!(get_rating(0.0, &t), Rating::Poor);
    }

    #[test]
    fn test_rating_labels() {
        assert_eq!(Rating::NeedsImprovement.to_string(), "Needs Improvement");
        assert_eq!(
            serde_json::to_string(&Rating::NeedsImprovement).unwrap(),
            "\"needs_improvement\""
        );
    }

    #[test]
    fn test_weak_team_gets_targeted_advice() {
        let recs = get_recommendations(10.0, 10.0, 10.0, &RecommendationThresholds::default());
        assert_eq!(recs.len(), 5);
        assert!(recs[0].starts_with("Energy is low"));
        assert!(!recs.iter().any(|r| r.starts_with("Excellent")));
    }

    #[test]
    fn test_middling_scores() {
        let recs = get_recommendations(50.0, 50.0, 40.0, &RecommendationThresholds::default());
        assert_eq!(recs.len(), 3);
    }

    #[test]
    fn test_strong_team_is_never_empty() {
        let t = RecommendationThresholds::default();
        let excellent = get_recommendations(90.0, 90.0, 90.0, &t);
        assert_eq!(excellent.len(), 1);
        assert!(excellent[0].starts_with("Excellent"));

        // Good but not excellent everywhere: no rule fires, fallback applies
        let good = get_recommendations(70.0, 70.0, 60.0, &t);
        assert_eq!(good, vec![ALL_STRONG.to_string()]);
    }
}
