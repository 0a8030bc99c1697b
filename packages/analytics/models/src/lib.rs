#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived competitive-analysis result types.
//!
//! Everything here is recomputed wholesale on each analysis run and
//! serialized as the engine's output contract. Keyed aggregations use
//! `BTreeMap` so that identical input and configuration always serialize
//! byte-identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A nearby branch of a different brand, seen from one base branch.
///
/// The relation is directional: the diff fields are base minus
/// competitor, so a positive `rating_diff` means the base branch
/// outrates this competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorMatch {
    /// Id of the competing branch.
    pub competitor_id: String,
    /// Brand of the competing branch. Never the base branch's brand.
    pub competitor_brand: String,
    /// Display name of the competing branch.
    pub competitor_name: String,
    /// Great-circle distance from the base branch, in kilometers.
    /// Never exceeds the configured search radius.
    pub distance_km: f64,
    /// The competitor's average rating (0 = unrated).
    pub competitor_rating: f64,
    /// The competitor's review count.
    pub competitor_review_count: u64,
    /// Base rating minus competitor rating.
    pub rating_diff: f64,
    /// Base review count minus competitor review count.
    pub review_diff: i64,
}

/// Competitive metrics for one branch with at least one nearby
/// competitor. A branch with zero qualifying matches has no profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveProfile {
    /// Id of the base branch.
    pub branch_id: String,
    /// Matches sorted ascending by distance, ties by competitor id.
    pub matches: Vec<CompetitorMatch>,
    /// Number of matches.
    pub match_count: u64,
    /// Distance to the nearest competitor, in kilometers.
    pub nearest_distance_km: f64,
    /// Mean rating across the matched competitors.
    pub competitor_avg_rating: f64,
    /// Base rating minus `competitor_avg_rating`, rounded to 2 decimals.
    /// Negative when the competition outrates the branch.
    pub rating_advantage: f64,
}

/// Per-zone branch counts and the dominant brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDominance {
    /// Zone label.
    pub zone: String,
    /// Branch count per configured brand. Every configured brand is
    /// present, 0 when the brand has no branches in the zone.
    pub brand_counts: BTreeMap<String, u64>,
    /// Sum of `brand_counts`.
    pub total_branches: u64,
    /// Brand with the most branches in the zone. Ties resolve to the
    /// earliest brand in the configured precedence order. `None` when
    /// the zone has no branches at all.
    pub dominant_brand: Option<String>,
    /// Mean rating per configured brand. `None` (not 0) for brands with
    /// no branches in the zone, so "no data" never reads as "rated 0".
    pub avg_rating_per_brand: BTreeMap<String, Option<f64>>,
}

/// Composite score for one zone×brand combination with at least one
/// branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBrandScore {
    /// Zone label.
    pub zone: String,
    /// Brand label.
    pub brand: String,
    /// Number of the brand's branches in the zone.
    pub branch_count: u64,
    /// Total reviews across those branches.
    pub total_reviews: u64,
    /// Mean rating across those branches.
    pub avg_rating: f64,
    /// Weighted blend of quality, review volume, and footprint, rounded
    /// to 2 decimals. Ranking order is computed on the unrounded value.
    pub score: f64,
}

/// Market-saturation averages for one zone, taken over the zone's
/// profiled branches (those with at least one nearby competitor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSaturation {
    /// Zone label.
    pub zone: String,
    /// Number of profiled branches the averages are taken over.
    pub profiled_branches: u64,
    /// Mean competitor count per profiled branch.
    pub avg_competitors: f64,
    /// Mean nearest-competitor distance, in kilometers.
    pub avg_nearest_distance_km: f64,
    /// Mean rating advantage over the nearby competition.
    pub avg_rating_advantage: f64,
}

/// Network-wide summary for one configured brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSummary {
    /// Brand label.
    pub brand: String,
    /// Number of the brand's branches in the store.
    pub branch_count: u64,
    /// Share of all stored branches, in percent, rounded to 2 decimals.
    pub market_share_pct: f64,
    /// Mean rating across the brand's branches, `None` when the brand
    /// has no branches.
    pub avg_rating: Option<f64>,
    /// Total reviews across the brand's branches.
    pub total_reviews: u64,
    /// Zone with the most branches of the brand, ties by zone name.
    /// `None` when the brand has no branches.
    pub top_zone: Option<String>,
}

/// A zone×brand combination with zero branches: an uncovered market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// Zone label.
    pub zone: String,
    /// Brand with no presence in the zone.
    pub brand: String,
}

/// The full, serializable result of one analysis run.
///
/// Round-trips through JSON without loss: 2-decimal rounding is applied
/// only to the human-facing `rating_advantage`, `score`, and
/// `market_share_pct` fields, never to raw distances, coordinates, or
/// counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Search radius the run used, in kilometers.
    pub radius_km: f64,
    /// Branches in the store snapshot.
    pub branch_count: u64,
    /// Branches with valid coordinates that entered proximity matching.
    pub analyzed_branches: u64,
    /// Branches excluded from matching for missing or out-of-range
    /// coordinates. Still counted in zone aggregation.
    pub skipped_branches: u64,
    /// Competitive profile per branch id. A branch with no nearby
    /// competitors has no entry.
    pub profiles: BTreeMap<String, CompetitiveProfile>,
    /// Zone dominance per zone label.
    pub zones: BTreeMap<String, ZoneDominance>,
    /// Top zone×brand combinations by composite score, best first.
    pub rankings: Vec<ZoneBrandScore>,
    /// Market saturation per zone with at least one profiled branch.
    pub saturation: Vec<ZoneSaturation>,
    /// Network-wide summary per configured brand, in precedence order.
    pub brands: Vec<BrandSummary>,
    /// Zone×brand combinations with zero branches.
    pub coverage_gaps: Vec<CoverageGap>,
}
