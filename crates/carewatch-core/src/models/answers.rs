use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A user's questionnaire answers: question id → selected option (1-based).
///
/// On the wire this is a JSON object keyed by the decimal question id,
/// e.g. `{"1": 2, "6": 1}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet(BTreeMap<u32, u32>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: u32, option: u32) -> Option<u32> {
        self.0.insert(question_id, option)
    }

    pub fn get(&self, question_id: u32) -> Option<u32> {
        self.0.get(&question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(question_id, option)` pairs in question order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(q, o)| (*q, *o))
    }
}

impl From<BTreeMap<u32, u32>> for AnswerSet {
    fn from(map: BTreeMap<u32, u32>) -> Self {
        Self(map)
    }
}

impl FromIterator<(u32, u32)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
