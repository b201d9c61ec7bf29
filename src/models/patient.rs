use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage format for intake timestamps.
pub const INTAKE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored intake timestamp. Accepts the canonical
/// `YYYY-MM-DD HH:MM:SS` form and the `T`-separated variant that some
/// capture devices emit.
pub fn parse_intake_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, INTAKE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// One patient intake record. `id` and `intake_time` are required and
/// validated at the insert boundary; every clinical field is optional
/// free text, populated sparsely by the capture side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub intake_time: String,

    // demographics
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub contact_info: Option<String>,
    pub home_address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,

    // incident
    pub incident_number: Option<String>,
    pub primary_complaint: Option<String>,
    pub severity: Option<String>,
    pub initial_acuity: Option<String>,
    pub final_acuity: Option<String>,

    // vitals
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
    pub respiratory_rate: Option<String>,
    pub temperature: Option<String>,
    pub spo2: Option<String>,
    pub glucose: Option<String>,
    pub gcs: Option<String>,

    // assessment
    pub primary_impression: Option<String>,
    pub primary_symptom: Option<String>,
    pub other_symptoms: Option<String>,
    pub mental_status: Option<String>,
    pub skin_assessment: Option<String>,
    pub chest_exam: Option<String>,
    pub lung_exam: Option<String>,
    pub abdomen_exam: Option<String>,

    // history, list-like: JSON array string or comma-separated
    pub past_medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub medication_allergies: Option<String>,

    // treatment
    pub treatment_procedure: Option<String>,
    pub iv_location: Option<String>,

    // disposition
    pub transport_disposition: Option<String>,
    pub transport_agency: Option<String>,
    pub transport_unit: Option<String>,
    pub level_of_care: Option<String>,
}

impl PatientRecord {
    /// Parsed intake timestamp, `None` when the stored value is
    /// malformed.
    pub fn parsed_intake_time(&self) -> Option<NaiveDateTime> {
        parse_intake_time(&self.intake_time)
    }
}

/// Field-level edit payload. Only fields present in the request are
/// written; `id` and `intake_time` are immutable after intake.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub contact_info: Option<String>,
    pub home_address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub incident_number: Option<String>,
    pub primary_complaint: Option<String>,
    pub severity: Option<String>,
    pub initial_acuity: Option<String>,
    pub final_acuity: Option<String>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
    pub respiratory_rate: Option<String>,
    pub temperature: Option<String>,
    pub spo2: Option<String>,
    pub glucose: Option<String>,
    pub gcs: Option<String>,
    pub primary_impression: Option<String>,
    pub primary_symptom: Option<String>,
    pub other_symptoms: Option<String>,
    pub mental_status: Option<String>,
    pub skin_assessment: Option<String>,
    pub chest_exam: Option<String>,
    pub lung_exam: Option<String>,
    pub abdomen_exam: Option<String>,
    pub past_medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub medication_allergies: Option<String>,
    pub treatment_procedure: Option<String>,
    pub iv_location: Option<String>,
    pub transport_disposition: Option<String>,
    pub transport_agency: Option<String>,
    pub transport_unit: Option<String>,
    pub level_of_care: Option<String>,
}

impl PatientUpdate {
    /// Column/value pairs for the fields present in this update, in
    /// declaration order. Drives the dynamic SET clause.
    pub fn set_fields(&self) -> Vec<(&'static str, &str)> {
        let candidates: [(&'static str, &Option<String>); 39] = [
            ("name", &self.name),
            ("age", &self.age),
            ("gender", &self.gender),
            ("race", &self.race),
            ("contact_info", &self.contact_info),
            ("home_address", &self.home_address),
            ("city", &self.city),
            ("county", &self.county),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("incident_number", &self.incident_number),
            ("primary_complaint", &self.primary_complaint),
            ("severity", &self.severity),
            ("initial_acuity", &self.initial_acuity),
            ("final_acuity", &self.final_acuity),
            ("blood_pressure", &self.blood_pressure),
            ("heart_rate", &self.heart_rate),
            ("respiratory_rate", &self.respiratory_rate),
            ("temperature", &self.temperature),
            ("spo2", &self.spo2),
            ("glucose", &self.glucose),
            ("gcs", &self.gcs),
            ("primary_impression", &self.primary_impression),
            ("primary_symptom", &self.primary_symptom),
            ("other_symptoms", &self.other_symptoms),
            ("mental_status", &self.mental_status),
            ("skin_assessment", &self.skin_assessment),
            ("chest_exam", &self.chest_exam),
            ("lung_exam", &self.lung_exam),
            ("abdomen_exam", &self.abdomen_exam),
            ("past_medical_history", &self.past_medical_history),
            ("current_medications", &self.current_medications),
            ("medication_allergies", &self.medication_allergies),
            ("treatment_procedure", &self.treatment_procedure),
            ("iv_location", &self.iv_location),
            ("transport_disposition", &self.transport_disposition),
            ("transport_agency", &self.transport_agency),
            ("transport_unit", &self.transport_unit),
            ("level_of_care", &self.level_of_care),
        ];

        candidates
            .into_iter()
            .filter_map(|(col, val)| val.as_deref().map(|v| (col, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.set_fields().is_empty()
    }
}

/// Bounded projection used by the recent-intake list and the roster:
/// the columns the list views actually render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentPatient {
    pub id: String,
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub severity: Option<String>,
    pub initial_acuity: Option<String>,
    pub intake_time: String,
}

impl RecentPatient {
    pub fn parsed_intake_time(&self) -> Option<NaiveDateTime> {
        parse_intake_time(&self.intake_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_timestamp() {
        let t = parse_intake_time("2025-09-14 10:15:00").unwrap();
        assert_eq!(t.format(INTAKE_TIME_FORMAT).to_string(), "2025-09-14 10:15:00");
    }

    #[test]
    fn parses_t_separated_timestamp() {
        assert!(parse_intake_time("2025-09-14T10:15:00").is_some());
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(parse_intake_time("yesterday-ish").is_none());
        assert!(parse_intake_time("").is_none());
        assert!(parse_intake_time("2025-13-40 99:99:99").is_none());
    }

    #[test]
    fn empty_update_has_no_set_fields() {
        let update = PatientUpdate::default();
        assert!(update.is_empty());
    }

    #[test]
    fn update_collects_only_present_fields() {
        let update = PatientUpdate {
            severity: Some("Critical".into()),
            heart_rate: Some("118".into()),
            ..Default::default()
        };
        let fields = update.set_fields();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains(&("severity", "Critical")));
        assert!(fields.contains(&("heart_rate", "118")));
    }
}
