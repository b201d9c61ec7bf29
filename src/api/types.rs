//! Shared context for the dashboard API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;

use crate::config;
use crate::db::{self, DatabaseError};
use crate::poller::{new_stats_cache, SharedStatsCache};

/// Shared state for all API routes.
///
/// Carries an explicit database path instead of any module-scope
/// client: every operation opens its own connection, giving each
/// request a clear lifecycle and keeping handlers trivially testable
/// against a temp database.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
    pub stats_cache: SharedStatsCache,
    /// Snapshots older than this are recomputed on request.
    pub refresh_interval: Duration,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, refresh_interval: Duration) -> Self {
        Self {
            db_path: Arc::new(db_path),
            stats_cache: new_stats_cache(),
            refresh_interval,
        }
    }

    /// Context with the default refresh interval.
    pub fn with_defaults(db_path: PathBuf) -> Self {
        Self::new(
            db_path,
            Duration::from_secs(config::DEFAULT_POLL_INTERVAL_SECS),
        )
    }

    /// Open a connection to the intake store for one operation.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_path.as_ref().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_runs_migrations() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ApiContext::with_defaults(tmp.path().join("intake.db"));
        let conn = ctx.open_db().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert!(version >= 1);
    }

    #[test]
    fn context_clones_share_the_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ApiContext::with_defaults(tmp.path().join("intake.db"));
        let clone = ctx.clone();
        assert!(Arc::ptr_eq(&ctx.stats_cache, &clone.stats_cache));
    }
}
