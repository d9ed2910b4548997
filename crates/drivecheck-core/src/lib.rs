//! drivecheck-core — Checklist catalog, session state, and readiness scoring.
//!
//! This crate defines the checklist data model, the per-mode grading session,
//! and the metrics that turn a set of Yes/No grades into a pass/fail verdict.

pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod reference;
pub mod registry;
pub mod report;
pub mod script;
pub mod session;

pub use catalog::Catalog;
pub use error::AssessmentError;
pub use metrics::Metrics;
pub use model::{Answer, Grade, TestMode};
pub use session::{AssessmentState, Session};
