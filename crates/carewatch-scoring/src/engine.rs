use carewatch_core::error::ValidationError;
use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::ids::UserId;
use carewatch_core::models::score::ScoreResult;

use crate::error::ScoringError;
use crate::policy::{Lookup, ScoringPolicy};

/// Pure risk scoring: sums points for recognized answers and maps the total
/// to a tier and recommendation.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    policy: ScoringPolicy,
}

impl RiskEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score one submission. Fails only on an empty answer set.
    pub fn score(&self, user_id: UserId, answers: &AnswerSet) -> Result<ScoreResult, ScoringError> {
        if answers.is_empty() {
            return Err(ValidationError::EmptyAnswers.into());
        }

        let total_score = self.total(user_id, answers);
        let risk_tier = self.policy.thresholds.tier_for(total_score);
        Ok(ScoreResult {
            total_score,
            risk_tier,
            recommendation: self.policy.recommendations.for_tier(risk_tier).to_string(),
        })
    }

    /// Sum of points over recognized (question, option) pairs. Unknown
    /// questions and options are logged and contribute nothing.
    pub fn total(&self, user_id: UserId, answers: &AnswerSet) -> u32 {
        answers
            .iter()
            .map(|(question_id, option)| match self.policy.points.lookup(question_id, option) {
                Lookup::Points(points) => points,
                Lookup::UnknownQuestion => {
                    tracing::warn!(%user_id, question_id, "skipping unknown question");
                    0
                }
                Lookup::UnknownOption => {
                    tracing::warn!(%user_id, question_id, option, "skipping unknown option");
                    0
                }
            })
            .fold(0u32, u32::saturating_add)
    }
}
