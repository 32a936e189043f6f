//! Core data models for teampulse
//!
//! These are the read-only inputs the engine consumes: team members,
//! communication events and the scoring window that bounds them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{EngineError, EngineResult};

/// Member identifier, unique within a team
pub type MemberId = u64;

/// Team identifier
pub type TeamId = u64;

/// Communication medium, ordered from richest to leanest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum CommunicationType {
    FaceToFace,
    Meeting,
    VideoCall,
    Phone,
    Chat,
    Email,
    /// Anything unrecognized lands here
    #[default]
    #[serde(other)]
    Other,
}

impl CommunicationType {
    pub const ALL: [CommunicationType; 7] = [
        CommunicationType::FaceToFace,
        CommunicationType::Meeting,
        CommunicationType::VideoCall,
        CommunicationType::Phone,
        CommunicationType::Chat,
        CommunicationType::Email,
        CommunicationType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationType::FaceToFace => "face-to-face",
            CommunicationType::Meeting => "meeting",
            CommunicationType::VideoCall => "video-call",
            CommunicationType::Phone => "phone",
            CommunicationType::Chat => "chat",
            CommunicationType::Email => "email",
            CommunicationType::Other => "other",
        }
    }
}

impl std::fmt::Display for CommunicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommunicationType {
    type Err = std::convert::Infallible;

    /// Lookup-with-default: unknown names map to `Other`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Ok(match normalized.as_str() {
            "face-to-face" | "in-person" => CommunicationType::FaceToFace,
            "meeting" => CommunicationType::Meeting,
            "video-call" | "video" => CommunicationType::VideoCall,
            "phone" | "call" => CommunicationType::Phone,
            "chat" | "slack" => CommunicationType::Chat,
            "email" => CommunicationType::Email,
            _ => CommunicationType::Other,
        })
    }
}

/// A team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub team_id: TeamId,
    #[serde(default)]
    pub role: Option<String>,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>, team_id: TeamId) -> Self {
        Self {
            id,
            name: name.into(),
            team_id,
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// A recorded communication event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    #[serde(default)]
    pub id: u64,
    pub sender_id: MemberId,
    /// `None` for group broadcasts or external recipients
    #[serde(default)]
    pub receiver_id: Option<MemberId>,
    pub team_id: TeamId,
    #[serde(default)]
    pub communication_type: CommunicationType,
    /// Missing durations fall back to the type's nominal duration
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub is_cross_team: bool,
    /// Additional named participants of a group communication
    #[serde(default)]
    pub participants: Vec<MemberId>,
    #[serde(default)]
    pub external_team_id: Option<TeamId>,
    pub timestamp: DateTime<Utc>,
}

impl Communication {
    /// One-to-one internal communication
    pub fn direct(
        id: u64,
        sender_id: MemberId,
        receiver_id: MemberId,
        team_id: TeamId,
        communication_type: CommunicationType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender_id,
            receiver_id: Some(receiver_id),
            team_id,
            communication_type,
            duration_minutes: None,
            is_group: false,
            is_cross_team: false,
            participants: Vec::new(),
            external_team_id: None,
            timestamp,
        }
    }

    pub fn with_duration(mut self, minutes: f64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn cross_team(mut self, external_team_id: Option<TeamId>) -> Self {
        self.is_cross_team = true;
        self.external_team_id = external_team_id;
        self
    }

    pub fn group(mut self, participants: Vec<MemberId>) -> Self {
        self.is_group = true;
        self.participants = participants;
        self
    }
}

/// Half-open time window `[start, end)` bounding the communications scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScoringWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> EngineResult<Self> {
        if end <= start {
            return Err(EngineError::InvalidParameter(format!(
                "scoring window end ({}) must be after start ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Window of `days` ending at `end`
    pub fn last_days(end: DateTime<Utc>, days: i64) -> EngineResult<Self> {
        if days <= 0 {
            return Err(EngineError::InvalidParameter(format!(
                "window length must be positive, got {} days",
                days
            )));
        }
        let start = Duration::try_days(days)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                EngineError::InvalidParameter(format!(
                    "window of {} days ending at {} is out of range",
                    days, end
                ))
            })?;
        Self::new(start, end)
    }

    /// Start inclusive, end exclusive
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts < self.end
    }

    /// Window length in fractional days
    pub fn days(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 86_400.0
    }
}
