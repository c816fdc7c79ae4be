//! Narrow capabilities the dispatcher needs from its collaborators.
//!
//! Each trait has an HTTP or SMTP implementation for multi-service
//! deployments; tests substitute their own. Methods return boxed futures for
//! dyn compatibility.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::RiskTier;

use crate::email::EmailReport;
use crate::error::DispatchError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Posts an in-app message to the user's notification feed.
pub trait Notifier: Send + Sync {
    fn notify(&self, user_id: UserId, tier: RiskTier) -> BoxFuture<'_, Result<(), DispatchError>>;
}

/// Raises an alert visible to doctor-facing consumers.
pub trait DoctorAlerter: Send + Sync {
    fn alert(&self, assessment_id: AssessmentId) -> BoxFuture<'_, Result<(), DispatchError>>;
}

/// Delivers a rendered report to the clinical reviewer.
pub trait Mailer: Send + Sync {
    fn send(&self, report: EmailReport) -> BoxFuture<'_, Result<(), DispatchError>>;
}

/// The set of collaborators a dispatcher talks to.
#[derive(Clone)]
pub struct Channels {
    pub notifier: Arc<dyn Notifier>,
    pub alerter: Arc<dyn DoctorAlerter>,
    pub mailer: Arc<dyn Mailer>,
}
