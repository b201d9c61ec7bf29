//! Repository functions for intake records and medication history.
//!
//! All functions operate on an explicit `&Connection`; there is no
//! module-scope client. Timestamps are stored as `YYYY-MM-DD HH:MM:SS`
//! text and compared lexicographically, which matches chronological
//! order for that format. Inserts validate the record boundary: a
//! non-empty id and a parseable timestamp, so nothing unparseable can
//! reach the display path.

use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, Row};

use super::DatabaseError;
use crate::models::{
    parse_intake_time, MedicationEvent, PatientRecord, PatientUpdate, RecentPatient,
    INTAKE_TIME_FORMAT,
};

const PATIENT_COLUMNS: &str = "id, intake_time, name, age, gender, race, contact_info, \
     home_address, city, county, state, zip_code, incident_number, primary_complaint, \
     severity, initial_acuity, final_acuity, blood_pressure, heart_rate, respiratory_rate, \
     temperature, spo2, glucose, gcs, primary_impression, primary_symptom, other_symptoms, \
     mental_status, skin_assessment, chest_exam, lung_exam, abdomen_exam, \
     past_medical_history, current_medications, medication_allergies, treatment_procedure, \
     iv_location, transport_disposition, transport_agency, transport_unit, level_of_care";

fn fmt_bound(t: &NaiveDateTime) -> String {
    t.format(INTAKE_TIME_FORMAT).to_string()
}

// ═══════════════════════════════════════════
// Patient repository
// ═══════════════════════════════════════════

pub fn insert_patient(conn: &Connection, record: &PatientRecord) -> Result<(), DatabaseError> {
    if record.id.trim().is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "patient id must be non-empty".into(),
        ));
    }
    if parse_intake_time(&record.intake_time).is_none() {
        return Err(DatabaseError::ConstraintViolation(format!(
            "unparseable intake_time: {:?}",
            record.intake_time
        )));
    }

    conn.execute(
        "INSERT INTO patients (id, intake_time, name, age, gender, race, contact_info,
         home_address, city, county, state, zip_code, incident_number, primary_complaint,
         severity, initial_acuity, final_acuity, blood_pressure, heart_rate, respiratory_rate,
         temperature, spo2, glucose, gcs, primary_impression, primary_symptom, other_symptoms,
         mental_status, skin_assessment, chest_exam, lung_exam, abdomen_exam,
         past_medical_history, current_medications, medication_allergies, treatment_procedure,
         iv_location, transport_disposition, transport_agency, transport_unit, level_of_care)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32,
                 ?33, ?34, ?35, ?36, ?37, ?38, ?39, ?40, ?41)",
        params![
            record.id,
            record.intake_time,
            record.name,
            record.age,
            record.gender,
            record.race,
            record.contact_info,
            record.home_address,
            record.city,
            record.county,
            record.state,
            record.zip_code,
            record.incident_number,
            record.primary_complaint,
            record.severity,
            record.initial_acuity,
            record.final_acuity,
            record.blood_pressure,
            record.heart_rate,
            record.respiratory_rate,
            record.temperature,
            record.spo2,
            record.glucose,
            record.gcs,
            record.primary_impression,
            record.primary_symptom,
            record.other_symptoms,
            record.mental_status,
            record.skin_assessment,
            record.chest_exam,
            record.lung_exam,
            record.abdomen_exam,
            record.past_medical_history,
            record.current_medications,
            record.medication_allergies,
            record.treatment_procedure,
            record.iv_location,
            record.transport_disposition,
            record.transport_agency,
            record.transport_unit,
            record.level_of_care,
        ],
    )?;
    Ok(())
}

fn patient_from_row(row: &Row) -> rusqlite::Result<PatientRecord> {
    Ok(PatientRecord {
        id: row.get(0)?,
        intake_time: row.get(1)?,
        name: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        race: row.get(5)?,
        contact_info: row.get(6)?,
        home_address: row.get(7)?,
        city: row.get(8)?,
        county: row.get(9)?,
        state: row.get(10)?,
        zip_code: row.get(11)?,
        incident_number: row.get(12)?,
        primary_complaint: row.get(13)?,
        severity: row.get(14)?,
        initial_acuity: row.get(15)?,
        final_acuity: row.get(16)?,
        blood_pressure: row.get(17)?,
        heart_rate: row.get(18)?,
        respiratory_rate: row.get(19)?,
        temperature: row.get(20)?,
        spo2: row.get(21)?,
        glucose: row.get(22)?,
        gcs: row.get(23)?,
        primary_impression: row.get(24)?,
        primary_symptom: row.get(25)?,
        other_symptoms: row.get(26)?,
        mental_status: row.get(27)?,
        skin_assessment: row.get(28)?,
        chest_exam: row.get(29)?,
        lung_exam: row.get(30)?,
        abdomen_exam: row.get(31)?,
        past_medical_history: row.get(32)?,
        current_medications: row.get(33)?,
        medication_allergies: row.get(34)?,
        treatment_procedure: row.get(35)?,
        iv_location: row.get(36)?,
        transport_disposition: row.get(37)?,
        transport_agency: row.get(38)?,
        transport_unit: row.get(39)?,
        level_of_care: row.get(40)?,
    })
}

pub fn get_patient(conn: &Connection, id: &str) -> Result<Option<PatientRecord>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    match stmt.query_row(params![id], patient_from_row) {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn patient_exists(conn: &Connection, id: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn count_patients(conn: &Connection) -> Result<u64, DatabaseError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// Intake records with `intake_time` in `[since, until]`, newest
/// first. Bounded projection: only the columns the list views render.
pub fn list_recent_patients(
    conn: &Connection,
    since: &NaiveDateTime,
    until: &NaiveDateTime,
) -> Result<Vec<RecentPatient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, gender, severity, initial_acuity, intake_time
         FROM patients
         WHERE intake_time >= ?1 AND intake_time <= ?2
         ORDER BY intake_time DESC",
    )?;

    let rows = stmt.query_map(params![fmt_bound(since), fmt_bound(until)], |row| {
        Ok(RecentPatient {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            severity: row.get(4)?,
            initial_acuity: row.get(5)?,
            intake_time: row.get(6)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Count of records in `[since, until]` whose severity is exactly
/// "critical", case-insensitively. One rule for the whole service.
pub fn count_critical_since(
    conn: &Connection,
    since: &NaiveDateTime,
    until: &NaiveDateTime,
) -> Result<u64, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patients
         WHERE intake_time >= ?1 AND intake_time <= ?2
           AND LOWER(severity) = 'critical'",
        params![fmt_bound(since), fmt_bound(until)],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Apply a field-level edit. Only fields present in `update` are
/// written. Returns the updated record; `NotFound` when the id does
/// not exist.
pub fn update_patient_fields(
    conn: &Connection,
    id: &str,
    update: &PatientUpdate,
) -> Result<PatientRecord, DatabaseError> {
    let fields = update.set_fields();
    if fields.is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "no fields to update".into(),
        ));
    }

    let assignments: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE patients SET {} WHERE id = ?{}",
        assignments.join(", "),
        fields.len() + 1
    );

    let values: Vec<&str> = fields
        .iter()
        .map(|(_, v)| *v)
        .chain(std::iter::once(id))
        .collect();

    let affected = conn.execute(&sql, params_from_iter(values))?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.into(),
        });
    }

    get_patient(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "patient".into(),
        id: id.into(),
    })
}

// ═══════════════════════════════════════════
// Medication repository
// ═══════════════════════════════════════════

pub fn insert_medication_event(
    conn: &Connection,
    event: &MedicationEvent,
) -> Result<(), DatabaseError> {
    if event.id.trim().is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "medication event id must be non-empty".into(),
        ));
    }
    if parse_intake_time(&event.administered_at).is_none() {
        return Err(DatabaseError::ConstraintViolation(format!(
            "unparseable administered_at: {:?}",
            event.administered_at
        )));
    }

    conn.execute(
        "INSERT INTO medications (id, patient_id, medication_name, quantity_mg, administered_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event.id,
            event.patient_id,
            event.medication_name,
            event.quantity_mg,
            event.administered_at,
        ],
    )?;
    Ok(())
}

/// Administration history for one patient, newest first.
pub fn list_medications_for_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<MedicationEvent>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, medication_name, quantity_mg, administered_at
         FROM medications
         WHERE patient_id = ?1
         ORDER BY administered_at DESC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(MedicationEvent {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            medication_name: row.get(2)?,
            quantity_mg: row.get(3)?,
            administered_at: row.get(4)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
