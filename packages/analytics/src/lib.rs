#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Competitive proximity analysis engine.
//!
//! The engine answers, for a deduplicated snapshot of branch records:
//! who competes near each branch, and who is winning each zone. It is a
//! pure, synchronous computation — no I/O, no shared mutable state —
//! producing an immutable [`branchwatch_analytics_models::AnalysisReport`]
//! that downstream rendering and reporting collaborators consume.
//!
//! Pipeline: proximity matching (all pairs within a radius) →
//! per-branch competitive profiles → zone dominance aggregation →
//! composite zone×brand ranking, plus saturation/brand/coverage
//! summaries derived along the way.

pub mod config;
pub mod dominance;
pub mod engine;
pub mod matcher;
pub mod profile;
pub mod scorer;
pub mod summary;

pub use config::{AnalysisConfig, ConfigurationError, ScoreWeights};
pub use engine::analyze;

/// Rounds to 2 decimal places. Applied only to human-facing fields
/// (`rating_advantage`, `score`, `market_share_pct`), never to raw
/// distances or counts.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
