//! Configuration module for teampulse
//!
//! This module handles:
//! - Engine configuration (teampulse.toml / .teampulserc.json)
//! - Communication weight tables
//! - Scoring curve and blend constants
//! - Network, role and community thresholds

mod engine_config;

pub use engine_config::{
    load_config_file,
    load_engine_config,
    CentralityConfig,
    CommunicationWeights,
    CommunityConfig,
    EnergyConfig,
    EngagementConfig,
    EngineConfig,
    ExplorationConfig,
    NetworkConfig,
    NominalDurations,
    OverallWeights,
    RatingThresholds,
    RecommendationThresholds,
    RoleThresholds,
    CONFIG_FILE_NAME,
};
