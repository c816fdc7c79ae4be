use std::sync::Arc;

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::{RiskTier, ScoreResult};
use carewatch_storage::memory::MemoryRepository;
use carewatch_storage::repository::AssessmentRepository;

fn user(raw: i64) -> UserId {
    UserId::new(raw).unwrap()
}

fn score(total: u32, tier: RiskTier) -> ScoreResult {
    ScoreResult {
        total_score: total,
        risk_tier: tier,
        recommendation: format!("{tier} advice"),
    }
}

fn answers(pairs: &[(u32, u32)]) -> AnswerSet {
    pairs.iter().copied().collect()
}

#[tokio::test]
async fn reads_on_empty_store_are_not_found() {
    let repo = MemoryRepository::new();

    assert!(repo.get_latest(user(7)).await.unwrap_err().is_not_found());
    assert!(repo.history(user(7)).await.unwrap_err().is_not_found());
    assert!(
        repo.get_by_id(AssessmentId::from_sequence(1))
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn latest_returns_saved_fields_exactly() {
    let repo = MemoryRepository::new();
    let submitted = answers(&[(1, 1), (2, 1)]);
    let scored = score(3, RiskTier::Low);

    let id = repo.save(user(7), &submitted, &scored).await.unwrap();
    let latest = repo.get_latest(user(7)).await.unwrap();

    assert_eq!(latest.id, id);
    assert_eq!(latest.user_id, user(7));
    assert_eq!(latest.answers, submitted);
    assert_eq!(latest.score, scored);
    assert_eq!(repo.get_by_id(id).await.unwrap(), latest);
}

#[tokio::test]
async fn history_is_newest_first_and_per_user() {
    let repo = MemoryRepository::new();
    let first = repo
        .save(user(7), &answers(&[(6, 1)]), &score(2, RiskTier::Low))
        .await
        .unwrap();
    let other = repo
        .save(user(8), &answers(&[(6, 1)]), &score(2, RiskTier::Low))
        .await
        .unwrap();
    let second = repo
        .save(user(7), &answers(&[(6, 1), (3, 3)]), &score(5, RiskTier::Low))
        .await
        .unwrap();

    let history = repo.history(user(7)).await.unwrap();
    let ids: Vec<_> = history.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert!(!ids.contains(&other));

    assert_eq!(repo.get_latest(user(7)).await.unwrap().id, second);
    assert!(repo.history(user(9)).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn concurrent_saves_get_unique_increasing_ids() {
    let repo = Arc::new(MemoryRepository::new());

    let mut handles = Vec::new();
    for n in 1..=32 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.save(user(n), &answers(&[(1, 1)]), &score(2, RiskTier::Low))
                .await
                .unwrap()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 32);
    assert_eq!(ids.first().copied(), Some(AssessmentId::from_sequence(1)));
    assert_eq!(ids.last().copied(), Some(AssessmentId::from_sequence(32)));
    assert_eq!(repo.len().await, 32);
}
