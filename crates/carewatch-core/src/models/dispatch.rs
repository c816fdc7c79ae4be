use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{AssessmentId, UserId};
use super::score::RiskTier;

/// The kinds of side effect a scored assessment can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    /// In-app message to the user who submitted.
    Notification,
    /// Alert record for doctor-facing consumers.
    DoctorAlert,
    /// HTML report mailed to the clinical reviewer.
    Email,
}

impl DispatchKind {
    pub const ALL: [DispatchKind; 3] = [
        DispatchKind::Notification,
        DispatchKind::DoctorAlert,
        DispatchKind::Email,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DispatchKind::Notification => "notification",
            DispatchKind::DoctorAlert => "doctor_alert",
            DispatchKind::Email => "email",
        }
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One unit of best-effort side-effect work. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTask {
    pub kind: DispatchKind,
    pub assessment_id: AssessmentId,
    pub user_id: UserId,
    pub risk_tier: RiskTier,
}
