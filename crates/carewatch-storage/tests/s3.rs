//! Integration tests against a real S3 bucket.
//!
//! These tests need valid AWS credentials in the environment and a scratch
//! bucket named by `CAREWATCH_TEST_BUCKET`.
//!
//! Run with: `cargo test -p carewatch-storage --test s3 -- --ignored`

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::ids::UserId;
use carewatch_core::models::score::{RiskTier, ScoreResult};
use carewatch_storage::client::build_client;
use carewatch_storage::repository::AssessmentRepository;
use carewatch_storage::s3::S3Repository;

async fn repository() -> S3Repository {
    let bucket = std::env::var("CAREWATCH_TEST_BUCKET").expect("CAREWATCH_TEST_BUCKET not set");
    S3Repository::new(build_client().await, bucket)
}

/// A user id unlikely to collide with earlier runs against the same bucket.
fn fresh_user() -> UserId {
    let secs = jiff::Timestamp::now().as_second();
    UserId::new(secs).unwrap()
}

#[tokio::test]
#[ignore]
async fn save_then_read_back() {
    let repo = repository().await;
    let user = fresh_user();
    let answers: AnswerSet = [(6, 1), (2, 3), (3, 3)].into_iter().collect();
    let score = ScoreResult {
        total_score: 8,
        risk_tier: RiskTier::Moderate,
        recommendation: "Consider physical therapy.".to_string(),
    };

    assert!(repo.history(user).await.unwrap_err().is_not_found());

    let first = repo.save(user, &answers, &score).await.unwrap();
    let second = repo.save(user, &answers, &score).await.unwrap();
    assert!(second > first);

    let latest = repo.get_latest(user).await.unwrap();
    assert_eq!(latest.id, second);
    assert_eq!(latest.answers, answers);
    assert_eq!(latest.score, score);

    let history = repo.history(user).await.unwrap();
    let ids: Vec<_> = history.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second, first]);

    assert_eq!(repo.get_by_id(first).await.unwrap().user_id, user);
}
