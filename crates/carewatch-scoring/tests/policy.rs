use std::io::Write;

use carewatch_core::models::score::RiskTier;
use carewatch_scoring::error::ScoringError;
use carewatch_scoring::policy::{Lookup, ScoringPolicy};
use carewatch_scoring::questionnaires::fall_risk;

#[test]
fn default_policy_covers_the_fall_risk_questionnaire() {
    let policy = ScoringPolicy::default();
    assert!(policy.validate().is_ok());
    assert_eq!(policy.points.questions().count(), fall_risk::QUESTIONS.len());
    assert_eq!(policy.points.lookup(4, 4), Lookup::Points(3));
    assert_eq!(policy.points.lookup(4, 5), Lookup::UnknownOption);
    assert_eq!(policy.points.lookup(11, 1), Lookup::UnknownQuestion);
}

#[test]
fn partial_json_policy_uses_default_thresholds() {
    let policy = ScoringPolicy::from_json(r#"{"points": {"1": {"1": 6}}}"#).unwrap();
    assert_eq!(policy.points.lookup(1, 1), Lookup::Points(6));
    assert_eq!(policy.thresholds.tier_for(6), RiskTier::Moderate);
    assert_eq!(
        policy.recommendations.fallback,
        "No recommendation available."
    );
}

#[test]
fn inverted_thresholds_are_rejected() {
    let err = ScoringPolicy::from_json(
        r#"{"points": {"1": {"1": 1}}, "thresholds": {"low_max": 10, "moderate_max": 5}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ScoringError::InvalidPolicy(_)));
}

#[test]
fn empty_point_table_is_rejected() {
    let err = ScoringPolicy::from_json(r#"{"points": {}}"#).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidPolicy(_)));
}

#[test]
fn loads_policy_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"points": {{"1": {{"1": 2, "2": 0}}}}, "recommendations": {{"low": "Keep going."}}}}"#
    )
    .unwrap();

    let policy = ScoringPolicy::load(file.path()).unwrap();
    assert_eq!(policy.recommendations.for_tier(RiskTier::Low), "Keep going.");
    assert_eq!(
        policy.recommendations.for_tier(RiskTier::High),
        "Consult a healthcare provider for a fall risk assessment and use mobility aids."
    );
}

#[test]
fn missing_policy_file_reports_path() {
    let err = ScoringPolicy::load(std::path::Path::new("/nonexistent/policy.json")).unwrap_err();
    assert!(matches!(err, ScoringError::PolicyIo { .. }));
    assert!(err.to_string().contains("/nonexistent/policy.json"));
}
