//! Patient endpoints: recent-intake roster, detail, field-level edit.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::format::{format_medical_condition, format_name, format_value};
use crate::models::{AcuityLevel, PatientRecord, PatientUpdate, RecentPatient};
use crate::roster::{group_by_date_and_hour, GroupedRoster, RosterOrder};

/// Default and maximum lookback for the roster view.
const DEFAULT_ROSTER_HOURS: i64 = 24;
const MAX_ROSTER_HOURS: i64 = 24 * 7;

#[derive(Deserialize)]
pub struct RecentQuery {
    pub hours: Option<i64>,
    pub order: Option<RosterOrder>,
}

/// One roster entry, formatted for display: name/age/gender run
/// through the display formatters, acuity classified for badge tiers.
#[derive(Debug, Clone, Serialize)]
pub struct PatientCard {
    pub id: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub acuity: String,
    pub acuity_level: AcuityLevel,
    pub intake_time: String,
}

impl From<RecentPatient> for PatientCard {
    fn from(p: RecentPatient) -> Self {
        Self {
            name: format_name(p.name.as_deref()),
            age: format_value(p.age.as_deref()),
            gender: format_value(p.gender.as_deref()),
            acuity: format_medical_condition(p.initial_acuity.as_deref()),
            acuity_level: AcuityLevel::classify(p.initial_acuity.as_deref()),
            id: p.id,
            intake_time: p.intake_time,
        }
    }
}

#[derive(Serialize)]
pub struct HourGroupView {
    pub label: String,
    pub patients: Vec<PatientCard>,
}

#[derive(Serialize)]
pub struct DayGroupView {
    pub label: String,
    pub date: NaiveDate,
    pub hours: Vec<HourGroupView>,
}

#[derive(Serialize)]
pub struct RosterResponse {
    pub days: Vec<DayGroupView>,
    pub rejected_count: usize,
    pub window_hours: i64,
}

fn roster_to_view(roster: GroupedRoster) -> (Vec<DayGroupView>, usize) {
    let rejected_count = roster.rejected.len();
    let days = roster
        .days
        .into_iter()
        .map(|day| DayGroupView {
            label: day.label,
            date: day.date,
            hours: day
                .hours
                .into_iter()
                .map(|hour| HourGroupView {
                    label: hour.label,
                    patients: hour.patients.into_iter().map(PatientCard::from).collect(),
                })
                .collect(),
        })
        .collect();
    (days, rejected_count)
}

/// `GET /api/patients/recent` — grouped recent-intake roster.
pub async fn recent(
    State(ctx): State<ApiContext>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<RosterResponse>, ApiError> {
    let hours = query
        .hours
        .unwrap_or(DEFAULT_ROSTER_HOURS)
        .clamp(1, MAX_ROSTER_HOURS);
    // The repository query orders descending, so the grouping's
    // NewestFirst precondition holds unless the caller overrides it.
    let order = query.order.unwrap_or(RosterOrder::NewestFirst);

    let now = Utc::now().naive_utc();
    let since = now - Duration::hours(hours);

    let conn = ctx.open_db()?;
    let records = db::list_recent_patients(&conn, &since, &now)?;
    let roster = group_by_date_and_hour(records, order, now.date());
    let (days, rejected_count) = roster_to_view(roster);

    Ok(Json(RosterResponse {
        days,
        rejected_count,
        window_hours: hours,
    }))
}

/// `GET /api/patients/:id` — full intake record.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientRecord>, ApiError> {
    let conn = ctx.open_db()?;
    let record = db::get_patient(&conn, &patient_id)?
        .ok_or_else(|| ApiError::NotFound(format!("patient {patient_id} not found")))?;
    Ok(Json(record))
}

/// `PATCH /api/patients/:id` — field-level edit. Only fields present
/// in the body are written; returns the updated record.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Json(body): Json<PatientUpdate>,
) -> Result<Json<PatientRecord>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("no fields to update".into()));
    }

    let conn = ctx.open_db()?;
    let record = db::update_patient_fields(&conn, &patient_id, &body)?;
    tracing::info!(patient_id, "Patient record updated");
    Ok(Json(record))
}
