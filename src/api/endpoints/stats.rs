//! Dashboard stats endpoint.
//!
//! Serves the poller's snapshot when it is still within the refresh
//! interval; otherwise recomputes live and refreshes the cache, so a
//! cold start or a stalled poller never serves stale numbers forever.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::poller::StatsSnapshot;
use crate::stats::{compute_dashboard_stats, DashboardStats};

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub generated_at: DateTime<Utc>,
}

/// `GET /api/dashboard/stats` — rollup numbers for the landing view.
pub async fn dashboard_stats(
    State(ctx): State<ApiContext>,
) -> Result<Json<StatsResponse>, ApiError> {
    let cached = ctx
        .stats_cache
        .read()
        .ok()
        .and_then(|guard| guard.clone())
        .filter(|snapshot| snapshot.is_fresh(ctx.refresh_interval));

    let snapshot = match cached {
        Some(snapshot) => snapshot,
        None => {
            let conn = ctx.open_db()?;
            let stats = compute_dashboard_stats(&conn, Utc::now().naive_utc())?;
            let snapshot = StatsSnapshot {
                stats,
                generated_at: Utc::now(),
            };
            if let Ok(mut guard) = ctx.stats_cache.write() {
                *guard = Some(snapshot.clone());
            }
            snapshot
        }
    };

    Ok(Json(StatsResponse {
        stats: snapshot.stats,
        generated_at: snapshot.generated_at,
    }))
}
