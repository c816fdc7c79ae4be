use std::sync::Arc;

use tokio_util::task::TaskTracker;

use carewatch_core::models::dispatch::{DispatchKind, DispatchTask};
use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::RiskTier;

use crate::channels::Channels;
use crate::email::ReportRenderer;
use crate::error::DispatchError;
use crate::table::DecisionTable;

/// Issues the side effects of a persisted assessment.
///
/// Every task runs on its own tokio task tracked by a [`TaskTracker`]. Nothing
/// is awaited at issue time, there is no retry, and a failing task only
/// affects itself. [`Dispatcher::shutdown`] waits for outstanding tasks so
/// the process can exit without cutting deliveries short.
///
/// Tasks only make progress while the tokio runtime keeps running after the
/// response has gone out, so the host must be a long-lived process. Hosts
/// that freeze the process between requests (serverless runtimes) would
/// stall every task until the next request.
pub struct Dispatcher {
    table: DecisionTable,
    channels: Channels,
    renderer: Arc<ReportRenderer>,
    tracker: TaskTracker,
}

impl Dispatcher {
    pub fn new(table: DecisionTable, channels: Channels, renderer: ReportRenderer) -> Self {
        Self {
            table,
            channels,
            renderer: Arc::new(renderer),
            tracker: TaskTracker::new(),
        }
    }

    /// The tasks a tier calls for, without running anything.
    pub fn plan(
        &self,
        assessment_id: AssessmentId,
        user_id: UserId,
        risk_tier: RiskTier,
    ) -> Vec<DispatchTask> {
        self.table
            .kinds_for(risk_tier)
            .into_iter()
            .map(|kind| DispatchTask {
                kind,
                assessment_id,
                user_id,
                risk_tier,
            })
            .collect()
    }

    /// Spawn every task the tier calls for and return immediately with the
    /// list of what was issued. Must be called from within a tokio runtime.
    pub fn dispatch(
        &self,
        assessment_id: AssessmentId,
        user_id: UserId,
        risk_tier: RiskTier,
    ) -> Vec<DispatchTask> {
        let tasks = self.plan(assessment_id, user_id, risk_tier);
        for task in &tasks {
            self.spawn(*task);
        }
        tracing::debug!(
            %assessment_id,
            %user_id,
            %risk_tier,
            issued = tasks.len(),
            "dispatch issued"
        );
        tasks
    }

    fn spawn(&self, task: DispatchTask) {
        let channels = self.channels.clone();
        let renderer = Arc::clone(&self.renderer);
        self.tracker.spawn(async move {
            match execute(&task, &channels, &renderer).await {
                Ok(()) => tracing::info!(
                    kind = %task.kind,
                    assessment_id = %task.assessment_id,
                    user_id = %task.user_id,
                    "dispatch task delivered"
                ),
                Err(e) => tracing::error!(
                    kind = %task.kind,
                    assessment_id = %task.assessment_id,
                    user_id = %task.user_id,
                    error = %e,
                    "dispatch task failed"
                ),
            }
        });
    }

    /// Number of tasks still running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every outstanding task to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!(pending, "draining dispatch tasks");
        }
        self.tracker.wait().await;
    }
}

async fn execute(
    task: &DispatchTask,
    channels: &Channels,
    renderer: &ReportRenderer,
) -> Result<(), DispatchError> {
    match task.kind {
        DispatchKind::Notification => channels.notifier.notify(task.user_id, task.risk_tier).await,
        DispatchKind::DoctorAlert => channels.alerter.alert(task.assessment_id).await,
        DispatchKind::Email => {
            let report = renderer.render(task.user_id, task.assessment_id, task.risk_tier)?;
            channels.mailer.send(report).await
        }
    }
}
