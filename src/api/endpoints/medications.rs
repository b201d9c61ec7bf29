//! Medication history endpoint.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::MedicationEvent;

#[derive(Serialize)]
pub struct MedicationHistoryResponse {
    pub patient_id: String,
    pub medications: Vec<MedicationEvent>,
}

/// `GET /api/patients/:id/medications` — administration history,
/// newest first. Unknown patient is a distinct 404, not an empty list.
pub async fn history(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<MedicationHistoryResponse>, ApiError> {
    let conn = ctx.open_db()?;

    if !db::patient_exists(&conn, &patient_id)? {
        return Err(ApiError::NotFound(format!("patient {patient_id} not found")));
    }

    let medications = db::list_medications_for_patient(&conn, &patient_id)?;
    Ok(Json(MedicationHistoryResponse {
        patient_id,
        medications,
    }))
}
