//! Dashboard API router.
//!
//! Returns a composable `Router` with all dashboard endpoints nested
//! under `/api/`. A permissive CORS layer is applied so the browser
//! dashboard can call the service from its own origin.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the dashboard API router.
pub fn dashboard_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/dashboard/stats", get(endpoints::stats::dashboard_stats))
        .route("/patients/recent", get(endpoints::patients::recent))
        .route(
            "/patients/:id",
            get(endpoints::patients::detail).patch(endpoints::patients::update),
        )
        .route(
            "/patients/:id/medications",
            get(endpoints::medications::history),
        )
        .with_state(ctx);

    Router::new().nest("/api", api).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
