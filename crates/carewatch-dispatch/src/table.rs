use std::collections::{BTreeMap, BTreeSet};

use carewatch_core::models::dispatch::DispatchKind;
use carewatch_core::models::score::RiskTier;

/// Which side effects fire for each risk tier.
///
/// | tier     | notification | doctor alert | email |
/// |----------|--------------|--------------|-------|
/// | Low      | no           | no           | no    |
/// | Moderate | yes          | no           | yes   |
/// | High     | yes          | yes          | yes   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTable(BTreeMap<RiskTier, BTreeSet<DispatchKind>>);

impl Default for DecisionTable {
    fn default() -> Self {
        Self::empty()
            .with(RiskTier::Low, &[])
            .with(
                RiskTier::Moderate,
                &[DispatchKind::Notification, DispatchKind::Email],
            )
            .with(RiskTier::High, &DispatchKind::ALL)
    }
}

impl DecisionTable {
    /// A table that dispatches nothing for any tier.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with(mut self, tier: RiskTier, kinds: &[DispatchKind]) -> Self {
        self.0.insert(tier, kinds.iter().copied().collect());
        self
    }

    /// Kinds for `tier`, in a stable order.
    pub fn kinds_for(&self, tier: RiskTier) -> Vec<DispatchKind> {
        self.0
            .get(&tier)
            .map(|kinds| kinds.iter().copied().collect())
            .unwrap_or_default()
    }
}
