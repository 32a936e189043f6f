//! Validated, window-filtered view of one team's data
//!
//! Every calculator and the network builder work off a `TeamSnapshot`.
//! Building one is the only place input is checked, so malformed records
//! fail fast with a `DataConsistency` error naming the offending record
//! instead of being dropped somewhere downstream.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::errors::{EngineError, EngineResult};
use crate::models::{Communication, Member, MemberId, ScoringWindow, TeamId};

const COMPUTATION: &str = "snapshot";

/// Validated members plus the in-window communications of a single team
#[derive(Debug, Clone)]
pub struct TeamSnapshot<'a> {
    members: &'a [Member],
    /// Member id -> position in `members`
    member_index: FxHashMap<MemberId, usize>,
    communications: Vec<&'a Communication>,
    window: ScoringWindow,
    team_id: Option<TeamId>,
}

impl<'a> TeamSnapshot<'a> {
    /// Validate all inputs and keep the communications inside `window`.
    ///
    /// Every supplied communication is validated, including ones outside the
    /// window: bad data is reported even when it would not be scored.
    ///
    /// # Errors
    /// - `DataConsistency` for duplicate member ids, members from several teams,
    ///   or a communication referencing an unknown team/member, or carrying a
    ///   negative/non-finite duration
    pub fn new(
        members: &'a [Member],
        communications: &'a [Communication],
        window: ScoringWindow,
    ) -> EngineResult<Self> {
        let mut member_index: FxHashMap<MemberId, usize> = FxHashMap::default();
        let team_id = members.first().map(|m| m.team_id);

        for (pos, member) in members.iter().enumerate() {
            if member_index.insert(member.id, pos).is_some() {
                return Err(EngineError::data_consistency(
                    COMPUTATION,
                    format!("member {}", member.id),
                    "duplicate member id",
                ));
            }
            if Some(member.team_id) != team_id {
                return Err(EngineError::data_consistency(
                    COMPUTATION,
                    format!("member {}", member.id),
                    format!(
                        "belongs to team {} but the member list is for team {}",
                        member.team_id,
                        team_id.unwrap_or_default()
                    ),
                ));
            }
        }

        for comm in communications {
            validate_communication(comm, &member_index, team_id)?;
        }

        let in_window: Vec<&Communication> = communications
            .iter()
            .filter(|c| window.contains(&c.timestamp))
            .collect();

        debug!(
            "Snapshot: {} members, {}/{} communications in window",
            members.len(),
            in_window.len(),
            communications.len()
        );

        Ok(Self {
            members,
            member_index,
            communications: in_window,
            window,
            team_id,
        })
    }

    pub fn members(&self) -> &'a [Member] {
        self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// In-window communications, in input order
    pub fn communications(&self) -> &[&'a Communication] {
        &self.communications
    }

    pub fn window(&self) -> ScoringWindow {
        self.window
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    pub fn is_member(&self, id: MemberId) -> bool {
        self.member_index.contains_key(&id)
    }

    pub fn member(&self, id: MemberId) -> Option<&'a Member> {
        self.member_index.get(&id).map(|&pos| &self.members[pos])
    }

    /// Distinct team members taking part in a communication, sender first.
    ///
    /// External receivers of cross-team communications are not members and
    /// are left out.
    pub fn participants(&self, comm: &Communication) -> Vec<MemberId> {
        let mut seen: FxHashSet<MemberId> = FxHashSet::default();
        let mut ids = Vec::with_capacity(2 + comm.participants.len());
        let candidates = std::iter::once(comm.sender_id)
            .chain(comm.receiver_id)
            .chain(comm.participants.iter().copied());
        for id in candidates {
            if self.is_member(id) && seen.insert(id) {
                ids.push(id);
            }
        }
        ids
    }
}

fn validate_communication(
    comm: &Communication,
    member_index: &FxHashMap<MemberId, usize>,
    team_id: Option<TeamId>,
) -> EngineResult<()> {
    let record = || format!("communication {}", comm.id);

    if let Some(team) = team_id {
        if comm.team_id != team {
            return Err(EngineError::data_consistency(
                COMPUTATION,
                record(),
                format!("team {} does not match member team {}", comm.team_id, team),
            ));
        }
    }

    if !member_index.contains_key(&comm.sender_id) {
        return Err(EngineError::data_consistency(
            COMPUTATION,
            record(),
            format!("unknown sender {}", comm.sender_id),
        ));
    }

    // Cross-team communications may be addressed to someone outside the team
    if let Some(receiver) = comm.receiver_id {
        if !comm.is_cross_team && !member_index.contains_key(&receiver) {
            return Err(EngineError::data_consistency(
                COMPUTATION,
                record(),
                format!("unknown receiver {}", receiver),
            ));
        }
    }

    if let Some(unknown) = comm
        .participants
        .iter()
        .find(|id| !member_index.contains_key(id))
    {
        return Err(EngineError::data_consistency(
            COMPUTATION,
            record(),
            format!("unknown participant {}", unknown),
        ));
    }

    if let Some(minutes) = comm.duration_minutes {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(EngineError::data_consistency(
                COMPUTATION,
                record(),
                format!("invalid duration {} minutes", minutes),
            ));
        }
    }

    Ok(())
}
