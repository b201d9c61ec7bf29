use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "triageboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the dashboard API.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8450";

/// Default stats refresh interval. The dashboard views in the field
/// poll between every 5 and every 60 seconds; the service-side
/// refresh sits in the middle of that range.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Bounds for the configurable refresh interval.
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;
pub const MAX_POLL_INTERVAL_SECS: u64 = 60;

/// Get the application data directory
/// ~/.triageboard/ on all platforms
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".triageboard")
}

/// Default path of the intake database.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("intake.db")
}

pub fn default_log_filter() -> String {
    format!("info,{APP_NAME}=debug")
}

/// Clamp a requested refresh interval into the supported range.
pub fn clamp_poll_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with(".triageboard"));
    }

    #[test]
    fn db_path_under_app_data() {
        let db = default_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("intake.db"));
    }

    #[test]
    fn poll_interval_clamped_to_range() {
        assert_eq!(clamp_poll_interval(1), Duration::from_secs(5));
        assert_eq!(clamp_poll_interval(30), Duration::from_secs(30));
        assert_eq!(clamp_poll_interval(600), Duration::from_secs(60));
    }

    #[test]
    fn default_interval_within_bounds() {
        assert!(DEFAULT_POLL_INTERVAL_SECS >= MIN_POLL_INTERVAL_SECS);
        assert!(DEFAULT_POLL_INTERVAL_SECS <= MAX_POLL_INTERVAL_SECS);
    }
}
