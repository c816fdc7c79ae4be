//! Key layout of the assessment bucket.
//!
//! Pure string functions. Ids are zero-padded so that
//! lexicographic key order matches id order.

use crate::models::ids::{AssessmentId, UserId};

pub const ASSESSMENTS_PREFIX: &str = "assessments/";

pub fn assessment(id: AssessmentId) -> String {
    format!("{ASSESSMENTS_PREFIX}{:020}.json", id.get())
}

pub fn user_assessments_prefix(user_id: UserId) -> String {
    format!("users/{user_id}/assessments/")
}

/// Empty marker object linking a user to one of their assessments.
pub fn user_assessment_index(user_id: UserId, id: AssessmentId) -> String {
    format!("{}{:020}", user_assessments_prefix(user_id), id.get())
}

/// Recover the assessment id from a key produced by [`user_assessment_index`].
pub fn parse_user_assessment_index(key: &str) -> Option<AssessmentId> {
    let last = key.rsplit('/').next()?;
    let value = last.parse::<u64>().ok()?;
    (value > 0).then(|| AssessmentId::from_sequence(value))
}

pub const ASSESSMENT_SEQUENCE: &str = "_state/assessment_seq.json";
