//! Engine configuration support
//!
//! Every policy constant the engine uses lives here, so tests and operators
//! can target each threshold directly instead of chasing inline literals.
//! Loaded from `teampulse.toml` or `.teampulserc.json`; anything missing
//! falls back to the defaults below.
//!
//! # Configuration Format
//!
//! ```toml
//! # teampulse.toml
//!
//! [weights]
//! face_to_face = 1.0
//! email = 0.2
//! group_modifier = 0.6
//!
//! [overall]
//! energy = 0.35
//! engagement = 0.40
//! exploration = 0.25
//!
//! [roles]
//! top_k = 3
//! hub_min_closeness = 0.6
//!
//! [community]
//! seed = 42
//! resolution = 1.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::{EngineError, EngineResult};
use crate::models::CommunicationType;

/// Preferred configuration file name
pub const CONFIG_FILE_NAME: &str = "teampulse.toml";

const JSON_CONFIG_FILE_NAME: &str = ".teampulserc.json";

/// Tolerance used when checking that a set of weights sums to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: CommunicationWeights,
    pub durations: NominalDurations,
    pub energy: EnergyConfig,
    pub engagement: EngagementConfig,
    pub exploration: ExplorationConfig,
    pub overall: OverallWeights,
    pub ratings: RatingThresholds,
    pub recommendations: RecommendationThresholds,
    pub network: NetworkConfig,
    pub centrality: CentralityConfig,
    pub roles: RoleThresholds,
    pub community: CommunityConfig,
}

/// Value of each communication medium, richest first.
///
/// Face-to-face is the reference (1.0); leaner media are worth less.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationWeights {
    pub face_to_face: f64,
    pub meeting: f64,
    pub video_call: f64,
    pub phone: f64,
    pub chat: f64,
    pub email: f64,
    pub other: f64,
    /// Multiplier for group communications (one broadcast is not a 1:1 contact)
    pub group_modifier: f64,
    /// Multiplier for cross-team communications when measuring internal energy
    pub cross_team_modifier: f64,
}

impl Default for CommunicationWeights {
    fn default() -> Self {
        Self {
            face_to_face: 1.0,
            meeting: 0.85,
            video_call: 0.70,
            phone: 0.55,
            chat: 0.35,
            email: 0.20,
            other: 0.10,
            group_modifier: 0.6,
            cross_team_modifier: 0.5,
        }
    }
}

impl CommunicationWeights {
    pub fn weight(&self, kind: CommunicationType) -> f64 {
        match kind {
            CommunicationType::FaceToFace => self.face_to_face,
            CommunicationType::Meeting => self.meeting,
            CommunicationType::VideoCall => self.video_call,
            CommunicationType::Phone => self.phone,
            CommunicationType::Chat => self.chat,
            CommunicationType::Email => self.email,
            CommunicationType::Other => self.other,
        }
    }

    /// Weights must not increase as the medium gets leaner
    pub fn is_monotonic(&self) -> bool {
        CommunicationType::ALL
            .windows(2)
            .all(|pair| self.weight(pair[0]) >= self.weight(pair[1]))
    }
}

/// Nominal duration in minutes, used when a communication has none recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominalDurations {
    pub face_to_face: f64,
    pub meeting: f64,
    pub video_call: f64,
    pub phone: f64,
    pub chat: f64,
    pub email: f64,
    pub other: f64,
}

impl Default for NominalDurations {
    fn default() -> Self {
        Self {
            face_to_face: 30.0,
            meeting: 45.0,
            video_call: 30.0,
            phone: 15.0,
            chat: 5.0,
            email: 5.0,
            other: 10.0,
        }
    }
}

impl NominalDurations {
    pub fn minutes(&self, kind: CommunicationType) -> f64 {
        match kind {
            CommunicationType::FaceToFace => self.face_to_face,
            CommunicationType::Meeting => self.meeting,
            CommunicationType::VideoCall => self.video_call,
            CommunicationType::Phone => self.phone,
            CommunicationType::Chat => self.chat,
            CommunicationType::Email => self.email,
            CommunicationType::Other => self.other,
        }
    }
}

/// Energy curve constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Duration factor for an instantaneous exchange (0-1)
    pub duration_floor: f64,
    /// Minutes over which the duration factor approaches 1
    pub duration_scale_minutes: f64,
    /// Weighted intensity per member per day that yields ~63 points
    pub intensity_scale: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            duration_floor: 0.25,
            duration_scale_minutes: 30.0,
            intensity_scale: 0.5,
        }
    }
}

/// Engagement blend (must sum to 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    pub participation_weight: f64,
    pub balance_weight: f64,
    pub two_way_weight: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            participation_weight: 0.45,
            balance_weight: 0.45,
            two_way_weight: 0.10,
        }
    }
}

impl EngagementConfig {
    pub fn is_valid(&self) -> bool {
        let sum = self.participation_weight + self.balance_weight + self.two_way_weight;
        (sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE
    }
}

/// Exploration curve constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Curvature of the saturating transform; larger rewards early cross-team activity more
    pub curvature: f64,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self { curvature: 4.0 }
    }
}

/// Weights for the three sub-scores in the overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallWeights {
    /// Weight for energy (default: 0.35)
    #[serde(default = "default_energy_weight")]
    pub energy: f64,

    /// Weight for engagement (default: 0.40)
    #[serde(default = "default_engagement_weight")]
    pub engagement: f64,

    /// Weight for exploration (default: 0.25)
    #[serde(default = "default_exploration_weight")]
    pub exploration: f64,
}

impl Default for OverallWeights {
    fn default() -> Self {
        Self {
            energy: default_energy_weight(),
            engagement: default_engagement_weight(),
            exploration: default_exploration_weight(),
        }
    }
}

fn default_energy_weight() -> f64 {
    0.35
}
fn default_engagement_weight() -> f64 {
    0.40
}
fn default_exploration_weight() -> f64 {
    0.25
}

impl OverallWeights {
    /// Validate that weights sum to 1.0 (with tolerance)
    pub fn is_valid(&self) -> bool {
        let sum = self.energy + self.engagement + self.exploration;
        (sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE
            && self.energy >= 0.0
            && self.engagement >= 0.0
            && self.exploration >= 0.0
    }
}

/// Score boundaries for the qualitative rating (0-100 scale)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub needs_improvement: f64,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            excellent: 80.0,
            good: 60.0,
            fair: 40.0,
            needs_improvement: 20.0,
        }
    }
}

/// Per-dimension (fair, good, excellent) boundaries driving recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    pub energy: [f64; 3],
    pub engagement: [f64; 3],
    pub exploration: [f64; 3],
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            energy: [40.0, 60.0, 80.0],
            engagement: [45.0, 65.0, 85.0],
            exploration: [30.0, 50.0, 70.0],
        }
    }
}

/// Network analyzer thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Betweenness above mean + multiplier * std marks a bottleneck
    pub bottleneck_std_multiplier: f64,
    /// Also report articulation points as bottlenecks
    pub include_articulation_points: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bottleneck_std_multiplier: 1.5,
            include_articulation_points: true,
        }
    }
}

/// Centrality computation and insight thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    pub eigenvector_max_iterations: usize,
    pub eigenvector_tolerance: f64,
    /// Max betweenness above this means one person carries the network
    pub over_centralization_betweenness: f64,
    /// Betweenness coefficient of variation below this counts as well distributed
    pub distributed_cv: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            eigenvector_max_iterations: 1000,
            eigenvector_tolerance: 1e-6,
            over_centralization_betweenness: 0.5,
            distributed_cv: 0.5,
        }
    }
}

/// Role classification thresholds.
///
/// | role | metric | eligibility |
/// |------|--------|-------------|
/// | connector | betweenness | betweenness >= `connector_min_betweenness` and betweenness / degree >= `connector_min_bridge_ratio` |
/// | influencer | degree | degree >= `influencer_min_degree` |
/// | hub | closeness | closeness >= `hub_min_closeness` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleThresholds {
    pub top_k: usize,
    pub connector_min_betweenness: f64,
    pub connector_min_bridge_ratio: f64,
    pub influencer_min_degree: f64,
    pub hub_min_closeness: f64,
}

impl Default for RoleThresholds {
    fn default() -> Self {
        Self {
            top_k: 3,
            connector_min_betweenness: 0.05,
            connector_min_bridge_ratio: 0.5,
            influencer_min_degree: 0.5,
            hub_min_closeness: 0.6,
        }
    }
}

/// Community detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Seed for the node visiting order; identical graphs + seed give identical partitions
    pub seed: u64,
    /// Higher = more, smaller communities
    pub resolution: f64,
    /// Maximum aggregation levels
    pub max_levels: usize,
    /// Maximum local-moving sweeps per level
    pub max_sweeps: usize,
    /// Modularity above this flags the team as siloed
    pub siloed_modularity: f64,
    /// Modularity band boundaries used for the interpretation text
    pub moderate_modularity: f64,
    pub high_modularity: f64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            resolution: 1.0,
            max_levels: 10,
            max_sweeps: 100,
            siloed_modularity: 0.4,
            moderate_modularity: 0.3,
            high_modularity: 0.5,
        }
    }
}

impl EngineConfig {
    /// Reject configurations that would break the score contracts
    pub fn validate(&self) -> EngineResult<()> {
        let w = &self.weights;
        for kind in CommunicationType::ALL {
            let weight = w.weight(kind);
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "weight for {} must be a non-negative number, got {}",
                    kind, weight
                )));
            }
            let nominal = self.durations.minutes(kind);
            if !nominal.is_finite() || nominal < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "nominal duration for {} must be non-negative, got {}",
                    kind, nominal
                )));
            }
        }
        if !w.is_monotonic() {
            return Err(EngineError::InvalidConfig(
                "communication weights must not increase from face-to-face down to other"
                    .to_string(),
            ));
        }
        for (name, modifier) in [
            ("group_modifier", w.group_modifier),
            ("cross_team_modifier", w.cross_team_modifier),
        ] {
            if !(modifier > 0.0 && modifier <= 1.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be in (0, 1], got {}",
                    name, modifier
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.energy.duration_floor) {
            return Err(EngineError::InvalidConfig(format!(
                "energy.duration_floor must be in [0, 1], got {}",
                self.energy.duration_floor
            )));
        }
        for (name, value) in [
            ("energy.duration_scale_minutes", self.energy.duration_scale_minutes),
            ("energy.intensity_scale", self.energy.intensity_scale),
            ("exploration.curvature", self.exploration.curvature),
            ("community.resolution", self.community.resolution),
        ] {
            if !(value > 0.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !self.engagement.is_valid() {
            return Err(EngineError::InvalidConfig(
                "engagement weights must sum to 1.0".to_string(),
            ));
        }
        if !self.overall.is_valid() {
            return Err(EngineError::InvalidConfig(format!(
                "overall weights must be non-negative and sum to 1.0 (energy={}, engagement={}, exploration={})",
                self.overall.energy, self.overall.engagement, self.overall.exploration
            )));
        }
        if self.roles.top_k == 0 {
            return Err(EngineError::InvalidConfig(
                "roles.top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Render as TOML (used by `teampulse init`)
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load engine configuration from a directory.
///
/// Searches for configuration files in this order:
/// 1. `teampulse.toml`
/// 2. `.teampulserc.json`
///
/// Returns default configuration if no config file is found or loadable.
pub fn load_engine_config(dir: &Path) -> EngineConfig {
    let toml_path = dir.join(CONFIG_FILE_NAME);
    if toml_path.exists() {
        match load_config_file(&toml_path) {
            Ok(config) => {
                debug!("Loaded engine config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(JSON_CONFIG_FILE_NAME);
    if json_path.exists() {
        match load_config_file(&json_path) {
            Ok(config) => {
                debug!("Loaded engine config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No engine config found, using defaults");
    EngineConfig::default()
}

/// Load and validate a specific config file (format chosen by extension)
pub fn load_config_file(path: &Path) -> anyhow::Result<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let config: EngineConfig = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests;
