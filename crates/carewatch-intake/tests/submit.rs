use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Semaphore;

use carewatch_core::error::ValidationError;
use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::assessment::Assessment;
use carewatch_core::models::dispatch::DispatchKind;
use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::{RiskTier, ScoreResult};
use carewatch_dispatch::channels::{BoxFuture, Channels, DoctorAlerter, Mailer, Notifier};
use carewatch_dispatch::dispatcher::Dispatcher;
use carewatch_dispatch::email::{EmailReport, ReportRenderer};
use carewatch_dispatch::error::DispatchError;
use carewatch_dispatch::table::DecisionTable;
use carewatch_intake::{Intake, IntakeError};
use carewatch_scoring::RiskScorer;
use carewatch_scoring::error::ScoringError;
use carewatch_scoring::local::LocalScorer;
use carewatch_storage::error::StorageError;
use carewatch_storage::memory::MemoryRepository;
use carewatch_storage::repository::AssessmentRepository;

/// Counts deliveries per channel. When gated, each delivery waits for a
/// permit first.
#[derive(Default)]
struct Channel {
    delivered: Mutex<Vec<DispatchKind>>,
    gate: Option<Arc<Semaphore>>,
}

impl Channel {
    async fn deliver(&self, kind: DispatchKind) -> Result<(), DispatchError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.delivered.lock().unwrap().push(kind);
        Ok(())
    }

    fn delivered(&self) -> Vec<DispatchKind> {
        let mut kinds = self.delivered.lock().unwrap().clone();
        kinds.sort();
        kinds
    }
}

impl Notifier for Channel {
    fn notify(&self, _: UserId, _: RiskTier) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(self.deliver(DispatchKind::Notification))
    }
}

impl DoctorAlerter for Channel {
    fn alert(&self, _: AssessmentId) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(self.deliver(DispatchKind::DoctorAlert))
    }
}

impl Mailer for Channel {
    fn send(&self, _: EmailReport) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(self.deliver(DispatchKind::Email))
    }
}

/// A store whose writes always fail and that counts attempts.
#[derive(Default)]
struct BrokenRepository {
    saves: AtomicUsize,
}

impl AssessmentRepository for BrokenRepository {
    fn save<'a>(
        &'a self,
        _: UserId,
        _: &'a AnswerSet,
        _: &'a ScoreResult,
    ) -> BoxFuture<'a, Result<AssessmentId, StorageError>> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Err(StorageError::PutObject("disk full".into())) })
    }

    fn get_latest(&self, _: UserId) -> BoxFuture<'_, Result<Assessment, StorageError>> {
        Box::pin(async {
            Err(StorageError::NotFound {
                key: "latest".into(),
            })
        })
    }

    fn get_by_id(&self, _: AssessmentId) -> BoxFuture<'_, Result<Assessment, StorageError>> {
        Box::pin(async {
            Err(StorageError::NotFound {
                key: "by-id".into(),
            })
        })
    }

    fn history(&self, _: UserId) -> BoxFuture<'_, Result<Vec<Assessment>, StorageError>> {
        Box::pin(async {
            Err(StorageError::NotFound {
                key: "history".into(),
            })
        })
    }
}

struct UnavailableScorer;

impl RiskScorer for UnavailableScorer {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn score<'a>(
        &'a self,
        _: UserId,
        _: &'a AnswerSet,
    ) -> BoxFuture<'a, Result<ScoreResult, ScoringError>> {
        Box::pin(async { Err(ScoringError::Remote("connection refused".into())) })
    }
}

struct Harness {
    intake: Intake,
    channel: Arc<Channel>,
}

fn harness_with(
    scorer: Arc<dyn RiskScorer>,
    repository: Arc<dyn AssessmentRepository>,
    gate: Option<Arc<Semaphore>>,
) -> Harness {
    let channel = Arc::new(Channel {
        gate,
        ..Channel::default()
    });
    let channels = Channels {
        notifier: channel.clone(),
        alerter: channel.clone(),
        mailer: channel.clone(),
    };
    let renderer = ReportRenderer::new("http://localhost:5500/report.html").unwrap();
    let dispatcher = Arc::new(Dispatcher::new(
        DecisionTable::default(),
        channels,
        renderer,
    ));
    Harness {
        intake: Intake::new(scorer, repository, dispatcher),
        channel,
    }
}

fn harness(repository: Arc<MemoryRepository>) -> Harness {
    harness_with(Arc::new(LocalScorer::default()), repository, None)
}

fn answers(pairs: &[(u32, u32)]) -> AnswerSet {
    pairs.iter().copied().collect()
}

#[tokio::test]
async fn invalid_user_is_rejected_before_anything_happens() {
    let repository = Arc::new(MemoryRepository::new());
    let h = harness(repository.clone());

    let err = h.intake.submit(0, answers(&[(1, 1)])).await.unwrap_err();

    assert!(matches!(
        err,
        IntakeError::Validation(ValidationError::InvalidUserId(0))
    ));
    assert!(repository.is_empty().await);
    assert_eq!(h.intake.dispatcher().pending(), 0);
    h.intake.dispatcher().shutdown().await;
    assert!(h.channel.delivered().is_empty());
}

#[tokio::test]
async fn empty_answers_are_rejected() {
    let repository = Arc::new(MemoryRepository::new());
    let h = harness(repository.clone());

    let err = h.intake.submit(7, AnswerSet::new()).await.unwrap_err();

    assert!(matches!(
        err,
        IntakeError::Validation(ValidationError::EmptyAnswers)
    ));
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn low_risk_is_persisted_without_side_effects() {
    let repository = Arc::new(MemoryRepository::new());
    let h = harness(repository.clone());

    let submission = h.intake.submit(7, answers(&[(1, 1), (2, 1)])).await.unwrap();

    assert_eq!(submission.score.total_score, 3);
    assert_eq!(submission.score.risk_tier, RiskTier::Low);
    assert!(submission.dispatched.is_empty());
    assert_eq!(repository.len().await, 1);

    h.intake.dispatcher().shutdown().await;
    assert!(h.channel.delivered().is_empty());
}

#[tokio::test]
async fn scores_accumulate_across_answers() {
    let repository = Arc::new(MemoryRepository::new());
    let h = harness(repository);

    let two = h.intake.submit(7, answers(&[(6, 1)])).await.unwrap();
    let five = h.intake.submit(7, answers(&[(6, 1), (2, 3)])).await.unwrap();
    let eight = h
        .intake
        .submit(7, answers(&[(6, 1), (2, 3), (3, 3)]))
        .await
        .unwrap();

    assert_eq!(
        (two.score.total_score, two.score.risk_tier),
        (2, RiskTier::Low)
    );
    assert_eq!(
        (five.score.total_score, five.score.risk_tier),
        (5, RiskTier::Low)
    );
    assert_eq!(
        (eight.score.total_score, eight.score.risk_tier),
        (8, RiskTier::Moderate)
    );
    assert!(eight.assessment_id > five.assessment_id);

    let kinds: Vec<_> = eight.dispatched.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![DispatchKind::Notification, DispatchKind::Email]);

    h.intake.dispatcher().shutdown().await;
    assert_eq!(
        h.channel.delivered(),
        vec![DispatchKind::Notification, DispatchKind::Email]
    );
}

#[tokio::test]
async fn high_risk_responds_before_side_effects_complete() {
    let gate = Arc::new(Semaphore::new(0));
    let repository = Arc::new(MemoryRepository::new());
    let h = harness_with(
        Arc::new(LocalScorer::default()),
        repository.clone(),
        Some(gate.clone()),
    );

    let submission = h
        .intake
        .submit(7, answers(&[(1, 1), (2, 3), (3, 3), (4, 4)]))
        .await
        .unwrap();

    assert_eq!(submission.score.total_score, 11);
    assert_eq!(submission.score.risk_tier, RiskTier::High);
    assert_eq!(submission.dispatched.len(), 3);
    assert!(h.channel.delivered().is_empty());
    assert_eq!(h.intake.dispatcher().pending(), 3);

    let stored = repository
        .get_by_id(submission.assessment_id)
        .await
        .unwrap();
    assert_eq!(stored.score, submission.score);

    gate.add_permits(3);
    tokio::time::timeout(Duration::from_secs(5), h.intake.dispatcher().shutdown())
        .await
        .unwrap();
    assert_eq!(
        h.channel.delivered(),
        vec![
            DispatchKind::Notification,
            DispatchKind::DoctorAlert,
            DispatchKind::Email
        ]
    );
}

#[tokio::test]
async fn persist_failure_dispatches_nothing() {
    let gate = Arc::new(Semaphore::new(0));
    let repository = Arc::new(BrokenRepository::default());
    let h = harness_with(
        Arc::new(LocalScorer::default()),
        repository.clone(),
        Some(gate),
    );

    let err = h
        .intake
        .submit(7, answers(&[(1, 1), (2, 3), (3, 3), (4, 4)]))
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::PersistFailed(_)));
    assert_eq!(repository.saves.load(Ordering::SeqCst), 1);
    assert_eq!(h.intake.dispatcher().pending(), 0);
}

#[tokio::test]
async fn scoring_failure_persists_nothing() {
    let repository = Arc::new(MemoryRepository::new());
    let h = harness_with(Arc::new(UnavailableScorer), repository.clone(), None);

    let err = h.intake.submit(7, answers(&[(1, 1)])).await.unwrap_err();

    assert!(matches!(err, IntakeError::ScoringFailed(_)));
    assert!(repository.is_empty().await);
    assert_eq!(h.intake.dispatcher().pending(), 0);
}

#[tokio::test]
async fn latest_matches_what_was_submitted() {
    let repository = Arc::new(MemoryRepository::new());
    let h = harness(repository.clone());
    let user = UserId::new(7).unwrap();

    assert!(
        repository
            .get_latest(user)
            .await
            .unwrap_err()
            .is_not_found()
    );

    let submitted = answers(&[(6, 1), (2, 3), (3, 3)]);
    let submission = h.intake.submit(7, submitted.clone()).await.unwrap();
    let latest = repository.get_latest(user).await.unwrap();

    assert_eq!(latest.id, submission.assessment_id);
    assert_eq!(latest.user_id, user);
    assert_eq!(latest.answers, submitted);
    assert_eq!(latest.score, submission.score);
    h.intake.dispatcher().shutdown().await;
}
