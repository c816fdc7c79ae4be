use serde::Serialize;
use tera::{Context, Tera};

use carewatch_core::models::ids::{AssessmentId, UserId};
use carewatch_core::models::score::RiskTier;

use crate::error::DispatchError;

const MODERATE_TEMPLATE: &str = "risk_alert_moderate.html";
const HIGH_TEMPLATE: &str = "risk_alert_high.html";

/// A rendered email, ready for a [`crate::channels::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailReport {
    pub subject: String,
    pub html: String,
}

#[derive(Serialize)]
struct ReportContext {
    user_id: UserId,
    assessment_id: AssessmentId,
    risk_level: RiskTier,
    report_url: String,
}

/// Renders the tier-specific HTML report sent to the clinical reviewer.
pub struct ReportRenderer {
    tera: Tera,
    report_base_url: String,
}

impl ReportRenderer {
    /// `report_base_url` is the page that displays one assessment; the
    /// assessment id is appended as a query parameter.
    pub fn new(report_base_url: impl Into<String>) -> Result<Self, DispatchError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (
                MODERATE_TEMPLATE,
                include_str!("../templates/risk_alert_moderate.html"),
            ),
            (HIGH_TEMPLATE, include_str!("../templates/risk_alert_high.html")),
        ])?;
        Ok(Self {
            tera,
            report_base_url: report_base_url.into(),
        })
    }

    pub fn report_url(&self, assessment_id: AssessmentId) -> String {
        format!("{}?assessment_id={assessment_id}", self.report_base_url)
    }

    pub fn render(
        &self,
        user_id: UserId,
        assessment_id: AssessmentId,
        tier: RiskTier,
    ) -> Result<EmailReport, DispatchError> {
        let template = match tier {
            RiskTier::Moderate => MODERATE_TEMPLATE,
            RiskTier::High => HIGH_TEMPLATE,
            RiskTier::Low => {
                return Err(DispatchError::Render(format!(
                    "no email template for {tier} risk"
                )));
            }
        };

        let context = Context::from_serialize(ReportContext {
            user_id,
            assessment_id,
            risk_level: tier,
            report_url: self.report_url(assessment_id),
        })?;
        let html = self.tera.render(template, &context)?;

        Ok(EmailReport {
            subject: format!("Urgent: Risk Assessment Alert for User {user_id}"),
            html,
        })
    }
}
