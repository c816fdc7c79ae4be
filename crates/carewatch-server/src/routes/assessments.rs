use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::assessment::Assessment;
use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::RiskTier;
use carewatch_intake::Submission;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub user_id: i64,
    pub answers: AnswerSet,
}

/// `?user=` on the GET lookups.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user: i64,
}

/// `{user_id}` body on the POST lookups.
#[derive(Debug, Deserialize)]
pub struct UserBody {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SubmissionView {
    pub assessment_id: AssessmentId,
    pub user_id: UserId,
    pub total_score: u32,
    pub risk_level: RiskTier,
    pub recommendation: String,
    pub question_responses: AnswerSet,
}

impl From<Submission> for SubmissionView {
    fn from(s: Submission) -> Self {
        Self {
            assessment_id: s.assessment_id,
            user_id: s.user_id,
            total_score: s.score.total_score,
            risk_level: s.score.risk_tier,
            recommendation: s.score.recommendation,
            question_responses: s.answers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssessmentView {
    pub assessment_id: AssessmentId,
    pub user_id: UserId,
    pub total_score: u32,
    pub risk_level: RiskTier,
    pub recommendation: String,
    pub question_responses: AnswerSet,
    pub created_at: jiff::Timestamp,
}

impl From<Assessment> for AssessmentView {
    fn from(a: Assessment) -> Self {
        Self {
            assessment_id: a.id,
            user_id: a.user_id,
            total_score: a.score.total_score,
            risk_level: a.score.risk_tier,
            recommendation: a.score.recommendation,
            question_responses: a.answers,
            created_at: a.created_at,
        }
    }
}

pub async fn submit_assessment(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionView>), ApiError> {
    let Json(req) = payload?;
    let submission = state.intake.submit(req.user_id, req.answers).await?;
    Ok((StatusCode::CREATED, Json(submission.into())))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<AssessmentView>, ApiError> {
    let Path(id) = id?;
    let id = AssessmentId::new(id)?;
    let assessment = state.intake.repository().get_by_id(id).await?;
    Ok(Json(assessment.into()))
}

async fn latest(state: &AppState, user_id: i64) -> Result<Json<AssessmentView>, ApiError> {
    let user_id = UserId::new(user_id)?;
    let assessment = state.intake.repository().get_latest(user_id).await?;
    Ok(Json(assessment.into()))
}

pub async fn latest_by_query(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<AssessmentView>, ApiError> {
    let Query(query) = query?;
    latest(&state, query.user).await
}

pub async fn latest_by_body(
    State(state): State<AppState>,
    payload: Result<Json<UserBody>, JsonRejection>,
) -> Result<Json<AssessmentView>, ApiError> {
    let Json(body) = payload?;
    latest(&state, body.user_id).await
}

async fn history(state: &AppState, user_id: i64) -> Result<Json<Vec<AssessmentView>>, ApiError> {
    let user_id = UserId::new(user_id)?;
    let assessments = state.intake.repository().history(user_id).await?;
    Ok(Json(assessments.into_iter().map(Into::into).collect()))
}

pub async fn history_by_query(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<AssessmentView>>, ApiError> {
    let Query(query) = query?;
    history(&state, query.user).await
}

pub async fn history_by_body(
    State(state): State<AppState>,
    payload: Result<Json<UserBody>, JsonRejection>,
) -> Result<Json<Vec<AssessmentView>>, ApiError> {
    let Json(body) = payload?;
    history(&state, body.user_id).await
}
