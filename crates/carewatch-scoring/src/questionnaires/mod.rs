//! Built-in questionnaires and their point tables.

pub mod fall_risk;
