use std::time::Duration;

use serde::{Deserialize, Serialize};

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::ids::UserId;
use carewatch_core::models::score::{RiskTier, ScoreResult};

use crate::error::ScoringError;
use crate::policy::Recommendations;
use crate::{BoxFuture, RiskScorer};

/// Path of the scoring endpoint, used when the configured URL has no path.
pub const ANALYZE_PATH: &str = "/risk/analyze";

/// Request body of the scoring endpoint.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub user_id: UserId,
    pub answers: &'a AnswerSet,
}

/// Response body of the scoring endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeResponse {
    pub total_score: u32,
    pub risk_level: RiskTier,
    pub recommendation: String,
}

impl From<ScoreResult> for AnalyzeResponse {
    fn from(score: ScoreResult) -> Self {
        Self {
            total_score: score.total_score,
            risk_level: score.risk_tier,
            recommendation: score.recommendation,
        }
    }
}

/// What we accept back. The tier stays a string so an unknown label is
/// reported as a scoring failure rather than a decode error.
#[derive(Debug, Deserialize)]
struct AnalyzeReply {
    total_score: u32,
    risk_level: String,
    #[serde(default)]
    recommendation: Option<String>,
}

/// Scores by calling a separately deployed scoring service.
///
/// Every call is bounded by the client timeout. Transport errors, non-2xx
/// replies, and malformed bodies all surface as [`ScoringError::Remote`].
pub struct RemoteScorer {
    client: reqwest::Client,
    endpoint: String,
    recommendations: Recommendations,
}

impl RemoteScorer {
    /// `url` is either a bare service URL (`http://scorer:8080`), which gets
    /// [`ANALYZE_PATH`] appended, or the full endpoint
    /// (`http://scorer:8080/api/analyzeRisk`), which is used as given.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ScoringError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoringError::Remote(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: resolve_endpoint(url)?,
            recommendations: Recommendations::default(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, user_id: UserId, answers: &AnswerSet) -> Result<ScoreResult, ScoringError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest { user_id, answers })
            .send()
            .await
            .map_err(|e| ScoringError::Remote(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScoringError::Remote(format!(
                "{} returned {status}: {}",
                self.endpoint,
                body.trim()
            )));
        }

        let reply: AnalyzeReply = resp
            .json()
            .await
            .map_err(|e| ScoringError::Remote(format!("malformed reply: {e}")))?;

        let risk_tier: RiskTier = reply
            .risk_level
            .parse()
            .map_err(|e| ScoringError::Remote(format!("{e}")))?;

        let recommendation = reply
            .recommendation
            .unwrap_or_else(|| self.recommendations.for_tier(risk_tier).to_string());

        Ok(ScoreResult {
            total_score: reply.total_score,
            risk_tier,
            recommendation,
        })
    }
}

fn resolve_endpoint(url: &str) -> Result<String, ScoringError> {
    let mut endpoint = reqwest::Url::parse(url)
        .map_err(|e| ScoringError::Remote(format!("invalid scoring url {url:?}: {e}")))?;
    if endpoint.cannot_be_a_base() {
        return Err(ScoringError::Remote(format!("invalid scoring url {url:?}")));
    }
    if endpoint.path() == "/" {
        endpoint.set_path(ANALYZE_PATH);
    }
    Ok(endpoint.into())
}

impl RiskScorer for RemoteScorer {
    fn name(&self) -> &str {
        "remote"
    }

    fn score<'a>(
        &'a self,
        user_id: UserId,
        answers: &'a AnswerSet,
    ) -> BoxFuture<'a, Result<ScoreResult, ScoringError>> {
        Box::pin(self.call(user_id, answers))
    }
}
