//! Dashboard server lifecycle: binds, spawns the axum server in a
//! background task, and shuts down gracefully via a oneshot channel.
//!
//! Pattern: bind → spawn background task → return handle with
//! shutdown channel. Binding to port 0 yields an ephemeral port,
//! which the tests use.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::api::router::dashboard_router;
use crate::api::types::ApiContext;

/// Handle to a running dashboard server.
pub struct DashboardServer {
    pub session_id: String,
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl DashboardServer {
    /// Bind `addr`, mount the dashboard router, and serve in a
    /// background task.
    pub async fn start(ctx: ApiContext, addr: SocketAddr) -> Result<DashboardServer, String> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| format!("Failed to bind dashboard server: {e}"))?;

        let addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to get server address: {e}"))?;

        tracing::info!(%addr, "Dashboard server binding");

        let app = dashboard_router(ctx);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let shutdown_signal = async move {
                let _ = shutdown_rx.await;
                tracing::info!("Dashboard server received shutdown signal");
            };

            tracing::info!(%addr, "Dashboard server started");

            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal)
                .await
            {
                tracing::error!("Dashboard server error: {e}");
            }

            tracing::info!("Dashboard server stopped");
        });

        Ok(DashboardServer {
            session_id: Uuid::new_v4().to_string(),
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Shut down the server gracefully. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Dashboard server shutdown signal sent");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn localhost_ephemeral() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_ctx() -> (ApiContext, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ApiContext::with_defaults(tmp.path().join("intake.db"));
        (ctx, tmp)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (ctx, _tmp) = test_ctx();
        let mut server = DashboardServer::start(ctx, localhost_ephemeral())
            .await
            .expect("server should start");

        assert!(!server.session_id.is_empty());
        assert!(server.addr.port() > 0);

        let url = format!("http://127.0.0.1:{}/api/health", server.addr.port());
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");

        server.shutdown();
        // Give server time to stop
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn server_serves_api_routes() {
        let (ctx, _tmp) = test_ctx();
        let mut server = DashboardServer::start(ctx, localhost_ephemeral())
            .await
            .expect("server should start");

        let port = server.addr.port();

        // Unknown route returns 404
        let resp = reqwest::get(format!("http://127.0.0.1:{port}/nonexistent"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        // Stats endpoint reachable
        let resp = reqwest::get(format!("http://127.0.0.1:{port}/api/dashboard/stats"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (ctx, _tmp) = test_ctx();
        let mut server = DashboardServer::start(ctx, localhost_ephemeral())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown(); // Second call should be safe
    }
}
