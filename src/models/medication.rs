use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::patient::parse_intake_time;

/// One medication administration event. Append-only history keyed by
/// event id, foreign-keyed to the patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationEvent {
    pub id: String,
    pub patient_id: String,
    pub medication_name: String,
    pub quantity_mg: f64,
    pub administered_at: String,
}

impl MedicationEvent {
    pub fn parsed_administered_at(&self) -> Option<NaiveDateTime> {
        parse_intake_time(&self.administered_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administered_at_parses_storage_format() {
        let event = MedicationEvent {
            id: "rx-1".into(),
            patient_id: "p-1".into(),
            medication_name: "Epinephrine".into(),
            quantity_mg: 0.3,
            administered_at: "2025-09-14 10:20:00".into(),
        };
        assert!(event.parsed_administered_at().is_some());
    }
}
