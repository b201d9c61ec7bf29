//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
}

/// `GET /api/health` — connection check for dashboard clients.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let database = ctx.open_db().is_ok();

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        database,
    }))
}
