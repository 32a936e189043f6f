//! TeamPulse - team collaboration health scoring
//!
//! Turns timestamped communication records into three 0-100 sub-scores
//! (Energy, Engagement, Exploration), an overall score, and a graph analysis
//! of who talks to whom: density, bottlenecks, centrality roles and
//! communities.
//!
//! Everything is a pure computation over in-memory inputs; see [`pipeline`]
//! for the entry points.

pub mod config;
pub mod errors;
pub mod models;
pub mod network;
pub mod pipeline;
pub mod scoring;
pub mod snapshot;

pub use config::{load_config_file, load_engine_config, EngineConfig};
pub use errors::{EngineError, EngineResult};
pub use models::{Communication, CommunicationType, Member, MemberId, ScoringWindow, TeamId};
pub use pipeline::{
    analyze_network, analyze_team, build_network, compute_centrality, compute_three_es,
    detect_communities, TeamReport, ThreeEsReport,
};
