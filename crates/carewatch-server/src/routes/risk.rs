use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use carewatch_core::models::ids::UserId;
use carewatch_scoring::remote::AnalyzeResponse;

use crate::error::ApiError;
use crate::routes::assessments::SubmitRequest;
use crate::state::AppState;

/// Stateless scoring. Nothing is stored and nothing is dispatched; this is
/// the endpoint a remote scorer talks to.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(req) = payload?;
    let user_id = UserId::new(req.user_id)?;
    let score = state.engine.score(user_id, &req.answers)?;
    Ok(Json(score.into()))
}
