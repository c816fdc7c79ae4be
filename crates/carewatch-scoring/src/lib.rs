//! carewatch-scoring
//!
//! The risk scoring engine: point tables, tier thresholds, and
//! recommendations, plus the [`RiskScorer`] seam the intake pipeline calls.
//! The engine itself is pure; only [`remote::RemoteScorer`] does I/O.

pub mod engine;
pub mod error;
pub mod local;
pub mod policy;
pub mod questionnaires;
pub mod remote;

use std::future::Future;
use std::pin::Pin;

use carewatch_core::models::answers::AnswerSet;
use carewatch_core::models::ids::UserId;
use carewatch_core::models::score::ScoreResult;

use error::ScoringError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that can turn an answer set into a score.
///
/// Implemented by the embedded engine ([`local::LocalScorer`]) and by a
/// client for a separately deployed scoring service
/// ([`remote::RemoteScorer`]). Methods return boxed futures for dyn
/// compatibility.
pub trait RiskScorer: Send + Sync {
    /// Short name used in log events (e.g. "local", "remote").
    fn name(&self) -> &str;

    /// Score one submission.
    fn score<'a>(
        &'a self,
        user_id: UserId,
        answers: &'a AnswerSet,
    ) -> BoxFuture<'a, Result<ScoreResult, ScoringError>>;
}
