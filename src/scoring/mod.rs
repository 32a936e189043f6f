//! Three E's team scoring
//!
//! Scores a team's communication on three 0-100 dimensions and blends
//! them into an overall score.
//!
//! # Scoring Formula
//!
//! ```text
//! Overall = Energy × 0.35 + Engagement × 0.40 + Exploration × 0.25
//!
//! Energy      = 100 × (1 - e^(-x / 0.5))
//!   x         = Σ type_weight × duration_factor × modifiers / (members × days)
//! Engagement  = 100 × (0.45 participation + 0.45 (1 - Gini) + 0.10 two_way)
//! Exploration = 100 × (1 - e^(-4r)) / (1 - e^(-4)),  r = cross-team share
//! ```
//!
//! # Communication Weights (richest first)
//!
//! - Face-to-face: 1.00
//! - Meeting: 0.85
//! - Video call: 0.70
//! - Phone: 0.55
//! - Chat: 0.35
//! - Email: 0.20
//! - Other: 0.10
//! - Group: ×0.6, cross-team: ×0.5
//!
//! Every constant above is a default from [`crate::config::EngineConfig`].
//!
//! # Degenerate Input
//!
//! No communications scores 0 on every dimension. A team with no members
//! also scores 0, but the overall combiner refuses it with
//! `InsufficientData`.

mod curves;
mod energy;
mod engagement;
mod exploration;
mod overall;
mod rating;
mod weights;

pub use curves::{clamp_ratio, clamp_score, concave_ratio, duration_factor, saturate};
pub use energy::{EnergyCalculator, EnergyResult};
pub use engagement::{gini_coefficient, EngagementCalculator, EngagementResult};
pub use exploration::{ExplorationCalculator, ExplorationResult};
pub use overall::{combine, OverallScore};
pub use rating::{get_rating, get_recommendations, Rating};
pub use weights::WeightTable;
