//! carewatch-core
//!
//! Pure domain types and storage key conventions for the assessment pipeline.
//! Nothing here does I/O; every other Carewatch crate builds on these types.

pub mod error;
pub mod models;
pub mod s3_keys;
