use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;
use super::ids::{AssessmentId, UserId};
use super::score::ScoreResult;

/// A scored, persisted self-assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub user_id: UserId,
    pub answers: AnswerSet,
    pub score: ScoreResult,
    pub created_at: jiff::Timestamp,
}
