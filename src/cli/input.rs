//! Team data input file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use teampulse::{Communication, Member};

/// Contents of a team data file:
///
/// ```json
/// {
///   "members": [{ "id": 1, "name": "Ada", "team_id": 7 }],
///   "communications": [{
///     "sender_id": 1, "receiver_id": 2, "team_id": 7,
///     "communication_type": "face-to-face", "duration_minutes": 25,
///     "timestamp": "2024-05-02T10:00:00Z"
///   }]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TeamDataset {
    pub members: Vec<Member>,
    #[serde(default)]
    pub communications: Vec<Communication>,
}

impl TeamDataset {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid team data in {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
