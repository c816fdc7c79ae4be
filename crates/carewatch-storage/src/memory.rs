use tokio::sync::Mutex;

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::assessment::Assessment;
use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::ScoreResult;

use crate::error::StorageError;
use crate::repository::{AssessmentRepository, BoxFuture};

/// Process-local store for single-process deployments and tests.
///
/// Rows are appended in id order, so the newest row for a user is the last
/// one that matches.
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: u64,
    rows: Vec<Assessment>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored assessments across all users.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl AssessmentRepository for MemoryRepository {
    fn save<'a>(
        &'a self,
        user_id: UserId,
        answers: &'a AnswerSet,
        score: &'a ScoreResult,
    ) -> BoxFuture<'a, Result<AssessmentId, StorageError>> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            inner.last_id += 1;
            let id = AssessmentId::from_sequence(inner.last_id);
            inner.rows.push(Assessment {
                id,
                user_id,
                answers: answers.clone(),
                score: score.clone(),
                created_at: jiff::Timestamp::now(),
            });
            Ok(id)
        })
    }

    fn get_latest(&self, user_id: UserId) -> BoxFuture<'_, Result<Assessment, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner
                .rows
                .iter()
                .rev()
                .find(|a| a.user_id == user_id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound {
                    key: format!("latest assessment for user {user_id}"),
                })
        })
    }

    fn get_by_id(&self, id: AssessmentId) -> BoxFuture<'_, Result<Assessment, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner
                .rows
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound {
                    key: format!("assessment {id}"),
                })
        })
    }

    fn history(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<Assessment>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            let history: Vec<Assessment> = inner
                .rows
                .iter()
                .rev()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect();
            if history.is_empty() {
                return Err(StorageError::NotFound {
                    key: format!("assessment history for user {user_id}"),
                });
            }
            Ok(history)
        })
    }
}
