//! Background stats refresh loop.
//!
//! The dashboard's consistency model is polling: aggregates are
//! approximately fresh, bounded by the refresh period. One background
//! task recomputes [`DashboardStats`] on a fixed interval (initial
//! refresh immediately on start) and stores a timestamped snapshot in
//! a shared cache. A failed refresh is logged and leaves the previous
//! snapshot in place; the next cycle is the only recovery.
//!
//! Shutdown is a oneshot signal inside the task's `select!` loop: once
//! the shutdown arm wins, no further snapshot can be stored, so a
//! teardown can never be followed by a stale write. The handle also
//! signals on `Drop`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::db;
use crate::stats::{compute_dashboard_stats, DashboardStats};

/// A stats computation with the time it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub stats: DashboardStats,
    pub generated_at: DateTime<Utc>,
}

impl StatsSnapshot {
    /// Whether this snapshot is younger than `max_age`.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.generated_at);
        age.to_std().map(|age| age <= max_age).unwrap_or(true)
    }
}

/// Shared cache the poller writes and the stats endpoint reads.
pub type SharedStatsCache = Arc<RwLock<Option<StatsSnapshot>>>;

pub fn new_stats_cache() -> SharedStatsCache {
    Arc::new(RwLock::new(None))
}

/// Handle to the running refresh task.
pub struct StatsPoller {
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl StatsPoller {
    /// Spawn the refresh loop. The first refresh runs immediately,
    /// then every `interval`.
    pub fn start(db_path: PathBuf, cache: SharedStatsCache, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            tracing::info!(interval_secs = interval.as_secs(), "Stats poller started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        tracing::info!("Stats poller shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        refresh_once(&db_path, &cache);
                    }
                }
            }
        });

        Self {
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Request shutdown. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One refresh pass: open the store, recompute, store the snapshot.
/// Errors keep the previous snapshot.
pub fn refresh_once(db_path: &Path, cache: &SharedStatsCache) {
    let result = db::open_database(db_path)
        .map_err(|e| e.to_string())
        .and_then(|conn| {
            compute_dashboard_stats(&conn, Utc::now().naive_utc()).map_err(|e| e.to_string())
        });

    match result {
        Ok(stats) => {
            tracing::debug!(
                total = stats.total_patients,
                critical = stats.critical_cases,
                recent = stats.recent_patients,
                "Stats snapshot refreshed"
            );
            let snapshot = StatsSnapshot {
                stats,
                generated_at: Utc::now(),
            };
            if let Ok(mut guard) = cache.write() {
                *guard = Some(snapshot);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Stats refresh failed; keeping previous snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_patient, open_database};
    use crate::models::PatientRecord;

    fn seed_db(path: &Path, ids: &[&str]) {
        let conn = open_database(path).unwrap();
        for id in ids {
            let record = PatientRecord {
                id: (*id).into(),
                intake_time: Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string(),
                severity: Some("Mild".into()),
                ..Default::default()
            };
            insert_patient(&conn, &record).unwrap();
        }
    }

    #[tokio::test]
    async fn poller_populates_cache_immediately() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("intake.db");
        seed_db(&db_path, &["p-1", "p-2"]);

        let cache = new_stats_cache();
        let mut poller =
            StatsPoller::start(db_path, cache.clone(), Duration::from_secs(60));

        // First tick is immediate; give the task a moment to run it
        tokio::time::sleep(Duration::from_millis(200)).await;

        let snapshot = cache.read().unwrap().clone().expect("cache populated");
        assert_eq!(snapshot.stats.total_patients, 2);
        poller.shutdown();
    }

    #[tokio::test]
    async fn shutdown_stops_refreshing() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("intake.db");
        seed_db(&db_path, &["p-1"]);

        let cache = new_stats_cache();
        let mut poller =
            StatsPoller::start(db_path.clone(), cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        poller.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let frozen_at = cache.read().unwrap().clone().unwrap().generated_at;
        // More data arrives after shutdown; the cache must not move
        seed_db(&db_path, &["p-2"]);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let after = cache.read().unwrap().clone().unwrap();
        assert_eq!(after.generated_at, frozen_at);
        assert_eq!(after.stats.total_patients, 1);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = new_stats_cache();

        // Pre-seed the cache, then point a refresh at an unopenable
        // path (a directory)
        *cache.write().unwrap() = Some(StatsSnapshot {
            stats: DashboardStats::empty(),
            generated_at: Utc::now(),
        });
        let before = cache.read().unwrap().clone().unwrap().generated_at;

        refresh_once(tmp.path(), &cache);

        let after = cache.read().unwrap().clone().unwrap();
        assert_eq!(after.generated_at, before);
    }

    #[test]
    fn fresh_snapshot_reports_fresh() {
        let snapshot = StatsSnapshot {
            stats: DashboardStats::empty(),
            generated_at: Utc::now(),
        };
        assert!(snapshot.is_fresh(Duration::from_secs(30)));
    }

    #[test]
    fn old_snapshot_reports_stale() {
        let snapshot = StatsSnapshot {
            stats: DashboardStats::empty(),
            generated_at: Utc::now() - chrono::Duration::seconds(120),
        };
        assert!(!snapshot.is_fresh(Duration::from_secs(30)));
    }
}
