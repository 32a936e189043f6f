//! Energy: how much the team communicates, and how richly
//!
//! ```text
//! intensity(c) = type_weight × duration_factor(minutes) × modifiers
//! x            = Σ intensity / (members × max(window_days, 1))
//! Energy       = 100 × (1 - e^(-x / intensity_scale))
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::CommunicationType;
use crate::scoring::curves::{clamp_ratio, clamp_score, saturate};
use crate::scoring::weights::WeightTable;
use crate::snapshot::TeamSnapshot;

/// Energy sub-score plus the raw figures behind it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyResult {
    /// 0-100
    pub energy_score: f64,
    pub total_communications: usize,
    pub avg_communications_per_member: f64,
    /// Recorded durations, with nominal durations filled in where missing
    pub total_duration_minutes: f64,
    /// Share of communications that were face-to-face (0-1)
    pub face_to_face_ratio: f64,
    /// Sum of per-communication intensities
    pub weighted_intensity: f64,
    pub member_count: usize,
}

pub struct EnergyCalculator<'a> {
    config: &'a EngineConfig,
}

impl<'a> EnergyCalculator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, snapshot: &TeamSnapshot<'_>) -> EnergyResult {
        let member_count = snapshot.member_count();
        let comms = snapshot.communications();
        if member_count == 0 || comms.is_empty() {
            return EnergyResult {
                member_count,
                ..Default::default()
            };
        }

        let table = WeightTable::new(&self.config.weights, &self.config.durations);
        let mut weighted_intensity = 0.0;
        let mut total_duration_minutes = 0.0;
        let mut face_to_face = 0usize;

        for comm in comms {
            weighted_intensity += table.intensity(comm, &self.config.energy);
            total_duration_minutes += table.effective_minutes(comm);
            if comm.communication_type == CommunicationType::FaceToFace {
                face_to_face += 1;
            }
        }

        let total = comms.len();
        let days = snapshot.window().days().max(1.0);
        let per_member_day = weighted_intensity / (member_count as f64 * days);
        let energy_score =
            clamp_score(100.0 * saturate(per_member_day, self.config.energy.intensity_scale));

        debug!(
            "Energy: {} comms, intensity={:.2}, per member-day={:.3} -> {:.1}",
            total, weighted_intensity, per_member_day, energy_score
        );

        EnergyResult {
            energy_score,
            total_communications: total,
            avg_communications_per_member: total as f64 / member_count as f64,
            total_duration_minutes,
            face_to_face_ratio: clamp_ratio(face_to_face as f64 / total as f64),
            weighted_intensity,
            member_count,
        }
    }
}
