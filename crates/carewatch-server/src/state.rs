use std::sync::Arc;

use carewatch_intake::Intake;
use carewatch_scoring::engine::RiskEngine;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<Intake>,
    /// Always in-process, so `/risk/analyze` never calls back into another
    /// scoring service.
    pub engine: Arc<RiskEngine>,
}
