use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use carewatch_core::models::score::RiskTier;

use crate::error::ScoringError;
use crate::questionnaires::fall_risk;

/// Points awarded for each (question, option) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointTable(BTreeMap<u32, BTreeMap<u32, u32>>);

/// Result of looking up one answer in a [`PointTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Points(u32),
    UnknownQuestion,
    UnknownOption,
}

impl PointTable {
    pub fn new(table: BTreeMap<u32, BTreeMap<u32, u32>>) -> Self {
        Self(table)
    }

    pub fn lookup(&self, question_id: u32, option: u32) -> Lookup {
        match self.0.get(&question_id) {
            None => Lookup::UnknownQuestion,
            Some(options) => match options.get(&option) {
                Some(points) => Lookup::Points(*points),
                None => Lookup::UnknownOption,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn questions(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(u32, Vec<(u32, u32)>)> for PointTable {
    fn from_iter<I: IntoIterator<Item = (u32, Vec<(u32, u32)>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(question, options)| (question, options.into_iter().collect()))
                .collect(),
        )
    }
}

/// Inclusive upper bounds of the Low and Moderate tiers. Anything above
/// `moderate_max` is High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub low_max: u32,
    pub moderate_max: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            low_max: 5,
            moderate_max: 10,
        }
    }
}

impl TierThresholds {
    pub fn tier_for(&self, total_score: u32) -> RiskTier {
        if total_score <= self.low_max {
            RiskTier::Low
        } else if total_score <= self.moderate_max {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }
}

/// Recommendation text per tier, plus a fallback for labels that do not name
/// a known tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendations {
    pub low: String,
    pub moderate: String,
    pub high: String,
    #[serde(rename = "default")]
    pub fallback: String,
}

impl Default for Recommendations {
    fn default() -> Self {
        Self {
            low: "Maintain a healthy lifestyle with balance exercises and check-ups.".to_string(),
            moderate: "Consider physical therapy, improve home safety, and monitor medications."
                .to_string(),
            high: "Consult a healthcare provider for a fall risk assessment and use mobility aids."
                .to_string(),
            fallback: "No recommendation available.".to_string(),
        }
    }
}

impl Recommendations {
    pub fn for_tier(&self, tier: RiskTier) -> &str {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::Moderate => &self.moderate,
            RiskTier::High => &self.high,
        }
    }

    /// Look up by tier label, e.g. a value read back from a legacy record.
    pub fn for_label(&self, label: &str) -> &str {
        match label.parse::<RiskTier>() {
            Ok(tier) => self.for_tier(tier),
            Err(_) => &self.fallback,
        }
    }
}

/// Everything the engine needs to score a submission. Loaded once at startup
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub points: PointTable,
    #[serde(default)]
    pub thresholds: TierThresholds,
    #[serde(default)]
    pub recommendations: Recommendations,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            points: fall_risk::point_table().clone(),
            thresholds: TierThresholds::default(),
            recommendations: Recommendations::default(),
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.points.is_empty() {
            return Err(ScoringError::InvalidPolicy(
                "point table has no questions".to_string(),
            ));
        }
        if self.thresholds.low_max >= self.thresholds.moderate_max {
            return Err(ScoringError::InvalidPolicy(format!(
                "low_max ({}) must be below moderate_max ({})",
                self.thresholds.low_max, self.thresholds.moderate_max,
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        let policy: ScoringPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Read and validate a JSON policy file.
    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScoringError::PolicyIo {
            path: path.to_path_buf(),
            source,
        })?;
        let policy = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            questions = policy.points.questions().count(),
            "scoring policy loaded"
        );
        Ok(policy)
    }
}
