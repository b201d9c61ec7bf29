//! Dashboard rollup statistics.
//!
//! One aggregation pass over the intake store: total record count,
//! critical-case count, and the rolling-24-hour intake list. The
//! critical rule is a case-insensitive exact match on the severity
//! label, scoped to the same 24-hour window as the recent list, so all
//! three numbers describe one population. Any query error fails the
//! whole computation and no partial stats are ever returned; callers
//! substitute zeroed defaults for display and wait for the next
//! refresh cycle.

use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};
use crate::models::RecentPatient;

/// Width of the "recent" window.
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Rollup numbers for the dashboard landing view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_patients: u64,
    pub critical_cases: u64,
    pub recent_patients: u64,
    pub recent_patients_list: Vec<RecentPatient>,
}

impl DashboardStats {
    /// Zeroed stats, what callers display when a fetch fails.
    pub fn empty() -> Self {
        Self {
            total_patients: 0,
            critical_cases: 0,
            recent_patients: 0,
            recent_patients_list: Vec::new(),
        }
    }
}

/// Compute dashboard stats as of `now`. The recent window is
/// `[now - 24h, now]`, inclusive on both ends.
pub fn compute_dashboard_stats(
    conn: &Connection,
    now: NaiveDateTime,
) -> Result<DashboardStats, DatabaseError> {
    let since = now - Duration::hours(RECENT_WINDOW_HOURS);

    let total_patients = db::count_patients(conn)?;
    let recent_patients_list = db::list_recent_patients(conn, &since, &now)?;
    let critical_cases = db::count_critical_since(conn, &since, &now)?;

    Ok(DashboardStats {
        total_patients,
        critical_cases,
        recent_patients: recent_patients_list.len() as u64,
        recent_patients_list,
    })
}
