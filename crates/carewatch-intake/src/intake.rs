use std::sync::Arc;

use tracing::Instrument;

use carewatch_core::error::ValidationError;
use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::dispatch::DispatchTask;
use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::ScoreResult;
use carewatch_dispatch::dispatcher::Dispatcher;
use carewatch_scoring::RiskScorer;
use carewatch_scoring::error::ScoringError;
use carewatch_storage::repository::AssessmentRepository;

use crate::error::IntakeError;

/// An accepted, persisted submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub assessment_id: AssessmentId,
    pub user_id: UserId,
    pub score: ScoreResult,
    pub answers: AnswerSet,
    /// Side effects issued for this assessment. They may still be running.
    pub dispatched: Vec<DispatchTask>,
}

pub struct Intake {
    scorer: Arc<dyn RiskScorer>,
    repository: Arc<dyn AssessmentRepository>,
    dispatcher: Arc<Dispatcher>,
}

impl Intake {
    pub fn new(
        scorer: Arc<dyn RiskScorer>,
        repository: Arc<dyn AssessmentRepository>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            scorer,
            repository,
            dispatcher,
        }
    }

    pub fn repository(&self) -> &Arc<dyn AssessmentRepository> {
        &self.repository
    }

    pub fn scorer(&self) -> &Arc<dyn RiskScorer> {
        &self.scorer
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Validate, score, persist, and issue side effects for one submission.
    ///
    /// Persistence strictly precedes dispatch. The returned future resolves
    /// as soon as dispatch has been issued; it never waits on a side effect.
    pub async fn submit(
        &self,
        user_id: i64,
        answers: AnswerSet,
    ) -> Result<Submission, IntakeError> {
        let span = tracing::info_span!(
            "submit_assessment",
            user_id,
            assessment_id = tracing::field::Empty,
        );
        self.run(user_id, answers).instrument(span).await
    }

    async fn run(&self, user_id: i64, answers: AnswerSet) -> Result<Submission, IntakeError> {
        let user_id = match validate(user_id, &answers) {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::debug!(error = %e, "submission rejected");
                return Err(e.into());
            }
        };
        tracing::debug!(answers = answers.len(), "submission validated");

        let score = self
            .scorer
            .score(user_id, &answers)
            .await
            .map_err(|e| match e {
                ScoringError::Validation(v) => IntakeError::Validation(v),
                other => {
                    tracing::error!(scorer = self.scorer.name(), error = %other, "scoring failed");
                    IntakeError::ScoringFailed(other)
                }
            })?;
        tracing::debug!(
            total_score = score.total_score,
            risk_tier = %score.risk_tier,
            "submission scored"
        );

        let assessment_id = self
            .repository
            .save(user_id, &answers, &score)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to persist assessment");
                IntakeError::PersistFailed(e)
            })?;
        tracing::Span::current().record("assessment_id", assessment_id.get());
        tracing::debug!("assessment persisted");

        let dispatched = self
            .dispatcher
            .dispatch(assessment_id, user_id, score.risk_tier);
        tracing::info!(
            risk_tier = %score.risk_tier,
            total_score = score.total_score,
            dispatched = dispatched.len(),
            "assessment accepted"
        );

        Ok(Submission {
            assessment_id,
            user_id,
            score,
            answers,
            dispatched,
        })
    }
}

fn validate(user_id: i64, answers: &AnswerSet) -> Result<UserId, ValidationError> {
    let user_id = UserId::new(user_id)?;
    if answers.is_empty() {
        return Err(ValidationError::EmptyAnswers);
    }
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_user() {
        let answers = AnswerSet::from_iter([(1, 1)]);
        assert_eq!(
            validate(0, &answers).unwrap_err(),
            ValidationError::InvalidUserId(0)
        );
        assert_eq!(
            validate(-4, &answers).unwrap_err(),
            ValidationError::InvalidUserId(-4)
        );
    }

    #[test]
    fn rejects_empty_answers() {
        assert_eq!(
            validate(7, &AnswerSet::default()).unwrap_err(),
            ValidationError::EmptyAnswers
        );
    }

    #[test]
    fn accepts_well_formed_input() {
        let answers = AnswerSet::from_iter([(1, 1), (2, 3)]);
        assert_eq!(validate(7, &answers).unwrap().get(), 7);
    }
}
