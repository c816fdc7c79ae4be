//! S3-backed assessment store.
//!
//! Layout (see `carewatch_core::s3_keys`):
//!
//! - `assessments/{id:020}.json`: the assessment record
//! - `users/{user_id}/assessments/{id:020}`: empty per-user index marker
//! - `_state/assessment_seq.json`: last allocated id
//!
//! Ids come from the sequence object under ETag optimistic locking. Losing a
//! race re-reads the sequence, up to [`MAX_SEQUENCE_ATTEMPTS`] times; any I/O
//! error aborts immediately. The record is written before its index marker.
//! If the marker write fails the record is deleted again, so a failed save
//! leaves nothing readable by id or by user. That delete is best effort; when
//! it also fails the orphaned record is logged and stays reachable by id only.

use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize};

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::assessment::Assessment;
use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::ScoreResult;
use carewatch_core::s3_keys;

use crate::error::StorageError;
use crate::objects::{self, PutCondition};
use crate::repository::{AssessmentRepository, BoxFuture};
use crate::state;

pub const MAX_SEQUENCE_ATTEMPTS: u32 = 8;

#[derive(Debug, Serialize, Deserialize)]
struct Sequence {
    last: u64,
}

pub struct S3Repository {
    client: Client,
    bucket: String,
}

impl S3Repository {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn next_id(&self) -> Result<AssessmentId, StorageError> {
        let key = s3_keys::ASSESSMENT_SEQUENCE;

        for attempt in 1..=MAX_SEQUENCE_ATTEMPTS {
            let written = match state::load_state::<Sequence>(&self.client, &self.bucket, key).await {
                Ok((current, etag)) => {
                    let next = Sequence {
                        last: current.last + 1,
                    };
                    state::save_state_if_match(&self.client, &self.bucket, key, &next, &etag)
                        .await
                        .map(|_| next.last)
                }
                Err(StorageError::NotFound { .. }) => {
                    state::create_state(&self.client, &self.bucket, key, &Sequence { last: 1 })
                        .await
                        .map(|_| 1)
                }
                Err(e) => return Err(e),
            };

            match written {
                Ok(last) => return Ok(AssessmentId::from_sequence(last)),
                Err(StorageError::PreconditionFailed { .. }) => {
                    tracing::debug!(attempt, "assessment sequence contended, re-reading");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StorageError::SequenceContention {
            attempts: MAX_SEQUENCE_ATTEMPTS,
        })
    }

    async fn insert(
        &self,
        user_id: UserId,
        answers: &AnswerSet,
        score: &ScoreResult,
    ) -> Result<AssessmentId, StorageError> {
        let id = self.next_id().await?;
        let assessment = Assessment {
            id,
            user_id,
            answers: answers.clone(),
            score: score.clone(),
            created_at: jiff::Timestamp::now(),
        };

        let body = serde_json::to_vec(&assessment)?;
        let record_key = s3_keys::assessment(id);
        write_indexed(
            objects::put_object(
                &self.client,
                &self.bucket,
                &record_key,
                body,
                Some("application/json"),
                PutCondition::IfAbsent,
            ),
            objects::put_object(
                &self.client,
                &self.bucket,
                &s3_keys::user_assessment_index(user_id, id),
                Vec::new(),
                None,
                PutCondition::Always,
            ),
            objects::delete_object(&self.client, &self.bucket, &record_key),
        )
        .await?;

        tracing::debug!(%id, %user_id, "assessment stored");
        Ok(id)
    }

    async fn fetch(&self, id: AssessmentId) -> Result<Assessment, StorageError> {
        let output = objects::get_object(&self.client, &self.bucket, &s3_keys::assessment(id)).await?;
        Ok(serde_json::from_slice(&output.body)?)
    }

    /// The user's assessment ids, newest first.
    async fn user_ids(&self, user_id: UserId) -> Result<Vec<AssessmentId>, StorageError> {
        let prefix = s3_keys::user_assessments_prefix(user_id);
        let keys = objects::list_objects(&self.client, &self.bucket, &prefix).await?;
        let mut ids: Vec<AssessmentId> = keys
            .iter()
            .filter_map(|k| s3_keys::parse_user_assessment_index(k))
            .collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        if ids.is_empty() {
            return Err(StorageError::NotFound { key: prefix });
        }
        Ok(ids)
    }
}

/// Write a record, then its index marker. When the marker fails the record
/// is removed again and the marker's error is returned. Futures are lazy, so
/// `remove_record` only runs on that path.
async fn write_indexed<T, U>(
    write_record: impl Future<Output = Result<T, StorageError>>,
    write_marker: impl Future<Output = Result<U, StorageError>>,
    remove_record: impl Future<Output = Result<(), StorageError>>,
) -> Result<(), StorageError> {
    write_record.await?;
    if let Err(e) = write_marker.await {
        if let Err(cleanup) = remove_record.await {
            tracing::error!(
                error = %cleanup,
                "failed to remove assessment record after index write failed; record is orphaned"
            );
        }
        return Err(e);
    }
    Ok(())
}

impl AssessmentRepository for S3Repository {
    fn save<'a>(
        &'a self,
        user_id: UserId,
        answers: &'a AnswerSet,
        score: &'a ScoreResult,
    ) -> BoxFuture<'a, Result<AssessmentId, StorageError>> {
        Box::pin(self.insert(user_id, answers, score))
    }

    fn get_latest(&self, user_id: UserId) -> BoxFuture<'_, Result<Assessment, StorageError>> {
        Box::pin(async move {
            let ids = self.user_ids(user_id).await?;
            self.fetch(ids[0]).await
        })
    }

    fn get_by_id(&self, id: AssessmentId) -> BoxFuture<'_, Result<Assessment, StorageError>> {
        Box::pin(self.fetch(id))
    }

    fn history(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<Assessment>, StorageError>> {
        Box::pin(async move {
            let ids = self.user_ids(user_id).await?;
            let mut history = Vec::with_capacity(ids.len());
            for id in ids {
                history.push(self.fetch(id).await?);
            }
            Ok(history)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn put_failed() -> StorageError {
        StorageError::PutObject("service unavailable".to_string())
    }

    #[tokio::test]
    async fn marker_failure_removes_the_record() {
        let removed = AtomicUsize::new(0);

        let err = write_indexed(
            async { Ok::<_, StorageError>("etag-1".to_string()) },
            async { Err::<String, _>(put_failed()) },
            async {
                removed.fetch_add(1, Ordering::SeqCst);
                Ok::<_, StorageError>(())
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StorageError::PutObject(_)));
        assert_eq!(removed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_cleanup_still_reports_the_marker_error() {
        let err = write_indexed(
            async { Ok::<_, StorageError>(()) },
            async { Err::<(), _>(put_failed()) },
            async { Err::<(), _>(StorageError::DeleteObject("access denied".to_string())) },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StorageError::PutObject(_)));
    }

    #[tokio::test]
    async fn success_and_record_failure_leave_cleanup_untouched() {
        let removed = AtomicUsize::new(0);
        let cleanup = || async {
            removed.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StorageError>(())
        };

        write_indexed(
            async { Ok::<_, StorageError>(()) },
            async { Ok::<_, StorageError>(()) },
            cleanup(),
        )
        .await
        .unwrap();

        let err = write_indexed(
            async {
                Err::<(), _>(StorageError::PreconditionFailed {
                    key: "assessments/1.json".to_string(),
                })
            },
            async { Ok::<_, StorageError>(()) },
            cleanup(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StorageError::PreconditionFailed { .. }));
        assert_eq!(removed.load(Ordering::SeqCst), 0);
    }
}
