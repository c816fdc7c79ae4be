//! carewatch-storage
//!
//! Assessment persistence. [`repository::AssessmentRepository`] is the seam
//! the pipeline talks to; [`memory`] and [`s3`] implement it. The S3 backend
//! is a thin layer over the object helpers in [`objects`] and [`state`].

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod repository;
pub mod s3;
pub mod state;
