//! Communication network analysis
//!
//! The builder turns a team snapshot into an undirected graph of members
//! once; the analyzer, centrality and community stages then read that graph
//! independently. Index-based algorithms live in `graph_algo` and are shared
//! by all three stages.

mod analyzer;
mod builder;
mod centrality;
mod community;
pub mod graph_algo;

pub use analyzer::{NetworkAnalyzer, NetworkSummary};
pub use builder::{Interaction, MemberNode, TeamGraph};
pub use centrality::{
    classify_roles, CentralityAnalyzer, CentralityReport, KeyRoles, MemberCentrality, RankedMember,
};
pub use community::{Community, CommunityDetector, CommunityPartition};
