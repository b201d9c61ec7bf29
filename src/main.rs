use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use triageboard::api::{ApiContext, DashboardServer};
use triageboard::config;
use triageboard::db;
use triageboard::poller::StatsPoller;

#[derive(Parser, Debug)]
#[command(name = config::APP_NAME, version, about = "Emergency patient-intake dashboard service")]
struct Cli {
    /// Address to serve the dashboard API on
    #[arg(long, env = "TRIAGEBOARD_BIND", default_value = config::DEFAULT_BIND_ADDR)]
    bind: SocketAddr,

    /// Path of the intake database (defaults to ~/.triageboard/intake.db)
    #[arg(long, env = "TRIAGEBOARD_DB")]
    db_path: Option<PathBuf>,

    /// Stats refresh interval in seconds (clamped to 5-60)
    #[arg(long, env = "TRIAGEBOARD_POLL_INTERVAL", default_value_t = config::DEFAULT_POLL_INTERVAL_SECS)]
    poll_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = cli.db_path.unwrap_or_else(config::default_db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).expect("Cannot create data directory");
    }

    // Open once up front so migrations run before anything serves
    db::open_database(&db_path).expect("Cannot open intake database");
    tracing::info!(path = %db_path.display(), "Intake database ready");

    let interval = config::clamp_poll_interval(cli.poll_interval_secs);
    let ctx = ApiContext::new(db_path.clone(), interval);
    let mut poller = StatsPoller::start(db_path, ctx.stats_cache.clone(), interval);

    let mut server = DashboardServer::start(ctx, cli.bind)
        .await
        .expect("Cannot start dashboard server");
    tracing::info!(addr = %server.addr, "Dashboard API listening");

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutdown requested");

    poller.shutdown();
    server.shutdown();
}
