//! Weight tables: what one communication is worth
//!
//! Pure lookup over the configured type weights, nominal durations and
//! group/cross-team modifiers. No state beyond the borrowed config.

use crate::config::{CommunicationWeights, EnergyConfig, NominalDurations};
use crate::models::{Communication, CommunicationType};
use crate::scoring::curves::duration_factor;

#[derive(Debug, Clone, Copy)]
pub struct WeightTable<'a> {
    weights: &'a CommunicationWeights,
    durations: &'a NominalDurations,
}

impl<'a> WeightTable<'a> {
    pub fn new(weights: &'a CommunicationWeights, durations: &'a NominalDurations) -> Self {
        Self { weights, durations }
    }

    pub fn type_weight(&self, kind: CommunicationType) -> f64 {
        self.weights.weight(kind)
    }

    pub fn nominal_minutes(&self, kind: CommunicationType) -> f64 {
        self.durations.minutes(kind)
    }

    /// Recorded duration, or the type's nominal duration when none was recorded
    pub fn effective_minutes(&self, comm: &Communication) -> f64 {
        comm.duration_minutes
            .unwrap_or_else(|| self.nominal_minutes(comm.communication_type))
    }

    /// Product of the group and cross-team modifiers that apply
    pub fn modifier(&self, comm: &Communication) -> f64 {
        let mut modifier = 1.0;
        if comm.is_group {
            modifier *= self.weights.group_modifier;
        }
        if comm.is_cross_team {
            modifier *= self.weights.cross_team_modifier;
        }
        modifier
    }

    /// Type-weighted, duration-scaled intensity of a single communication
    pub fn intensity(&self, comm: &Communication, energy: &EnergyConfig) -> f64 {
        let minutes = self.effective_minutes(comm);
        self.type_weight(comm.communication_type)
            * duration_factor(minutes, energy.duration_floor, energy.duration_scale_minutes)
            * self.modifier(comm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn comm(kind: CommunicationType) -> Communication {
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        Communication::direct(1, 1, 2, 1, kind, ts)
    }

    #[test]
    fn test_nominal_duration_fallback() {
        let weights = CommunicationWeights::default();
        let durations = NominalDurations::default();
        let table = WeightTable::new(&weights, &durations);

        assert_eq!(table.effective_minutes(&comm(CommunicationType::Meeting)), 45.0);
        assert_eq!(
            table.effective_minutes(&comm(CommunicationType::Meeting).with_duration(5.0)),
            5.0
        );
    }

    #[test]
    fn test_face_to_face_outweighs_email() {
        let weights = CommunicationWeights::default();
        let durations = NominalDurations::default();
        let table = WeightTable::new(&weights, &durations);
        let energy = EnergyConfig::default();

        let f2f = table.intensity(
            &comm(CommunicationType::FaceToFace).with_duration(10.0),
            &energy,
        );
        let email = table.intensity(&comm(CommunicationType::Email).with_duration(10.0), &energy);
        assert!(f2f > email);
    }

    #[test]
    fn test_group_and_cross_team_discounts() {
        let weights = CommunicationWeights::default();
        let durations = NominalDurations::default();
        let table = WeightTable::new(&weights, &durations);
        let energy = EnergyConfig::default();

        let direct = comm(CommunicationType::Meeting);
        let group = comm(CommunicationType::Meeting).group(vec![3]);
        let external = comm(CommunicationType::Meeting).cross_team(Some(9));

        assert!((table.modifier(&group) - 0.6).abs() < 1e-12);
        assert!(table.intensity(&group, &energy) < table.intensity(&direct, &energy));
        assert!(table.intensity(&external, &energy) < table.intensity(&direct, &energy));
    }
}
