use std::future::Future;
use std::pin::Pin;

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::assessment::Assessment;
use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::ScoreResult;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence for scored assessments.
///
/// Every read returns [`StorageError::NotFound`] when nothing matches,
/// including `history` for a user with no assessments. Nothing is retried
/// internally; retry policy belongs to the caller.
///
/// Methods return boxed futures for dyn compatibility.
pub trait AssessmentRepository: Send + Sync {
    /// Insert one assessment and return its freshly assigned id. Ids are
    /// unique and increase over the lifetime of the store.
    fn save<'a>(
        &'a self,
        user_id: UserId,
        answers: &'a AnswerSet,
        score: &'a ScoreResult,
    ) -> BoxFuture<'a, Result<AssessmentId, StorageError>>;

    /// The user's most recent assessment.
    fn get_latest(&self, user_id: UserId) -> BoxFuture<'_, Result<Assessment, StorageError>>;

    fn get_by_id(&self, id: AssessmentId) -> BoxFuture<'_, Result<Assessment, StorageError>>;

    /// All of the user's assessments, newest first.
    fn history(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<Assessment>, StorageError>>;
}
