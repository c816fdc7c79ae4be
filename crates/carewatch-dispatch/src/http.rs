//! JSON-over-HTTP clients for the notification and alert collaborators.

use std::time::Duration;

use serde::Serialize;

use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::RiskTier;

use crate::channels::{BoxFuture, DoctorAlerter, Notifier};
use crate::error::DispatchError;

/// Alert type recorded by the alert store for assessment-driven alerts.
pub const ALERT_TYPE: &str = "HealthAssessment";

/// In-app message for a tier. Low risk never notifies.
pub fn notification_message(tier: RiskTier) -> Option<&'static str> {
    match tier {
        RiskTier::Low => None,
        RiskTier::Moderate => Some(
            "Your assessment indicates a moderate risk. Please follow the recommended exercises.",
        ),
        RiskTier::High => {
            Some("High risk detected. Please contact your healthcare provider immediately.")
        }
    }
}

/// Shared client for collaborator calls. The timeout bounds each request.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, DispatchError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

async fn post_json<T: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &T,
) -> Result<(), DispatchError> {
    let resp = client.post(url).json(body).send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(DispatchError::Remote {
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }
    Ok(())
}

#[derive(Serialize)]
struct NotificationBody<'a> {
    user_id: UserId,
    message: &'a str,
}

#[derive(Serialize)]
struct AlertBody {
    assessment_id: AssessmentId,
    #[serde(rename = "type")]
    alert_type: &'static str,
}

pub struct HttpNotifier {
    client: reqwest::Client,
    url: String,
}

impl HttpNotifier {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self, user_id: UserId, tier: RiskTier) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(async move {
            let Some(message) = notification_message(tier) else {
                tracing::debug!(%user_id, %tier, "no notification text for tier");
                return Ok(());
            };
            post_json(&self.client, &self.url, &NotificationBody { user_id, message }).await
        })
    }
}

pub struct HttpAlerter {
    client: reqwest::Client,
    url: String,
}

impl HttpAlerter {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl DoctorAlerter for HttpAlerter {
    fn alert(&self, assessment_id: AssessmentId) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(async move {
            let body = AlertBody {
                assessment_id,
                alert_type: ALERT_TYPE,
            };
            post_json(&self.client, &self.url, &body).await
        })
    }
}
