use std::sync::Arc;

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::ids::UserId;
use carewatch_core::models::score::ScoreResult;

use crate::engine::RiskEngine;
use crate::error::ScoringError;
use crate::{BoxFuture, RiskScorer};

/// Scores in-process with an embedded [`RiskEngine`].
#[derive(Debug, Clone, Default)]
pub struct LocalScorer {
    engine: Arc<RiskEngine>,
}

impl LocalScorer {
    pub fn new(engine: Arc<RiskEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }
}

impl RiskScorer for LocalScorer {
    fn name(&self) -> &str {
        "local"
    }

    fn score<'a>(
        &'a self,
        user_id: UserId,
        answers: &'a AnswerSet,
    ) -> BoxFuture<'a, Result<ScoreResult, ScoringError>> {
        let result = self.engine.score(user_id, answers);
        Box::pin(async move { result })
    }
}
