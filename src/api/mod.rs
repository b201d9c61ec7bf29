//! Dashboard HTTP API.
//!
//! Exposes the intake store as JSON endpoints for the dashboard
//! views. Routes are nested under `/api/`. The router is composable:
//! `dashboard_router()` returns a `Router` that can be mounted on any
//! axum server instance, while `server` owns the bind/spawn/shutdown
//! lifecycle.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::dashboard_router;
pub use server::DashboardServer;
pub use types::ApiContext;
