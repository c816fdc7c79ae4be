use std::sync::LazyLock;

use crate::policy::PointTable;

/// One question of the fall-risk self-assessment and its option points.
/// Options are 1-based, in the order the questionnaire presents them.
pub struct Question {
    pub id: u32,
    pub topic: &'static str,
    pub options: &'static [(u32, u32)],
}

/// Fall-risk self-assessment. Higher points mean higher risk.
pub const QUESTIONS: [Question; 10] = [
    // Yes / No
    Question { id: 1, topic: "Dizziness", options: &[(1, 2), (2, 0)] },
    // Good / Moderate / Poor
    Question { id: 2, topic: "Balance", options: &[(1, 1), (2, 2), (3, 3)] },
    // None / 1-2 / 3 or more
    Question { id: 3, topic: "Falls in the past year", options: &[(1, 1), (2, 2), (3, 3)] },
    Question { id: 4, topic: "Mobility aid", options: &[(1, 0), (2, 1), (3, 2), (4, 3)] },
    Question { id: 5, topic: "Unsteady walking", options: &[(1, 0), (2, 1), (3, 2), (4, 3)] },
    // Yes / No
    Question { id: 6, topic: "Recent fall", options: &[(1, 2), (2, 0)] },
    Question { id: 7, topic: "Stand without using hands", options: &[(1, 0), (2, 2)] },
    Question { id: 8, topic: "Medications", options: &[(1, 2), (2, 0), (3, 1)] },
    Question { id: 9, topic: "Regular exercise", options: &[(1, 0), (2, 2)] },
    Question { id: 10, topic: "Numbness in legs or feet", options: &[(1, 2), (2, 0), (3, 1)] },
];

pub fn point_table() -> &'static PointTable {
    static TABLE: LazyLock<PointTable> = LazyLock::new(|| {
        QUESTIONS
            .iter()
            .map(|q| (q.id, q.options.to_vec()))
            .collect()
    });
    &TABLE
}
