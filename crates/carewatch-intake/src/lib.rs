//! carewatch-intake
//!
//! Orchestrates one assessment submission: validate, score, persist, then
//! hand the persisted result to the dispatcher and respond without waiting
//! on any side effect.

pub mod error;
pub mod intake;

pub use error::IntakeError;
pub use intake::{Intake, Submission};
