use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use carewatch_dispatch::dispatcher::Dispatcher;

use crate::middleware;
use crate::routes;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/risk/analyze", post(routes::risk::analyze))
        .route("/api/analyzeRisk", post(routes::risk::analyze))
        .route("/assessments", post(routes::assessments::submit_assessment))
        .route(
            "/assessments/latest",
            get(routes::assessments::latest_by_query).post(routes::assessments::latest_by_body),
        )
        .route(
            "/assessments/history",
            get(routes::assessments::history_by_query).post(routes::assessments::history_by_body),
        )
        .route(
            "/assessments/{id}",
            get(routes::assessments::get_assessment).post(routes::assessments::get_assessment),
        )
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}

/// Serve until `shutdown` resolves, then wait for every side effect still
/// in flight. Returns only once the dispatcher has drained.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    dispatcher: Arc<Dispatcher>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    dispatcher.shutdown().await;
    Ok(())
}
