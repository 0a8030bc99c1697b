//! Zone saturation, per-brand market summaries, and coverage gaps.
//!
//! These are the report's secondary views: averages over the profiled
//! branches per zone, network-wide brand statistics, and the zone×brand
//! combinations with no presence at all.

use std::collections::BTreeMap;

use branchwatch_analytics_models::{
    BrandSummary, CompetitiveProfile, CoverageGap, ZoneDominance, ZoneSaturation,
};
use branchwatch_branch_models::Branch;

use crate::round2;

/// Averages per zone over its profiled branches: how contested the zone
/// is, how close the nearest rival sits, and whether branches there
/// outrate their competition. Zones with no profiled branches are
/// omitted.
#[must_use]
pub fn zone_saturation(
    branches: &[Branch],
    profiles: &BTreeMap<String, CompetitiveProfile>,
) -> Vec<ZoneSaturation> {
    let zone_by_id: BTreeMap<&str, &str> = branches
        .iter()
        .map(|branch| (branch.id.as_str(), branch.zone.as_str()))
        .collect();

    #[derive(Default)]
    struct SaturationTally {
        profiled: u64,
        competitors: u64,
        nearest_sum: f64,
        advantage_sum: f64,
    }

    let mut per_zone: BTreeMap<&str, SaturationTally> = BTreeMap::new();
    for (branch_id, profile) in profiles {
        let Some(&zone) = zone_by_id.get(branch_id.as_str()) else {
            continue;
        };
        let tally = per_zone.entry(zone).or_default();
        tally.profiled += 1;
        tally.competitors += profile.match_count;
        tally.nearest_sum += profile.nearest_distance_km;
        tally.advantage_sum += profile.rating_advantage;
    }

    per_zone
        .into_iter()
        .map(|(zone, tally)| {
            let profiled = tally.profiled as f64;
            ZoneSaturation {
                zone: zone.to_string(),
                profiled_branches: tally.profiled,
                avg_competitors: tally.competitors as f64 / profiled,
                avg_nearest_distance_km: tally.nearest_sum / profiled,
                avg_rating_advantage: tally.advantage_sum / profiled,
            }
        })
        .collect()
}

/// Network-wide statistics per configured brand, in precedence order.
#[must_use]
pub fn brand_summaries(branches: &[Branch], brands: &[String]) -> Vec<BrandSummary> {
    let total = branches.len() as u64;

    brands
        .iter()
        .map(|brand| {
            let mut branch_count = 0u64;
            let mut rating_sum = 0.0;
            let mut total_reviews = 0u64;
            let mut zone_counts: BTreeMap<&str, u64> = BTreeMap::new();

            for branch in branches.iter().filter(|b| &b.brand == brand) {
                branch_count += 1;
                rating_sum += branch.rating;
                total_reviews += branch.review_count;
                *zone_counts.entry(branch.zone.as_str()).or_default() += 1;
            }

            // Lexicographic iteration plus a strict comparison keeps the
            // earliest zone name on count ties.
            let mut top_zone: Option<(&str, u64)> = None;
            for (zone, count) in &zone_counts {
                if top_zone.is_none_or(|(_, best)| *count > best) {
                    top_zone = Some((zone, *count));
                }
            }

            let market_share_pct = if total == 0 {
                0.0
            } else {
                round2(100.0 * branch_count as f64 / total as f64)
            };

            BrandSummary {
                brand: brand.clone(),
                branch_count,
                market_share_pct,
                avg_rating: (branch_count > 0).then(|| rating_sum / branch_count as f64),
                total_reviews,
                top_zone: top_zone.map(|(zone, _)| zone.to_string()),
            }
        })
        .collect()
}

/// Zone×brand combinations with zero branches, ordered by zone then
/// brand.
#[must_use]
pub fn coverage_gaps(zones: &BTreeMap<String, ZoneDominance>) -> Vec<CoverageGap> {
    zones
        .values()
        .flat_map(|dominance| {
            dominance
                .brand_counts
                .iter()
                .filter(|(_, count)| **count == 0)
                .map(move |(brand, _)| CoverageGap {
                    zone: dominance.zone.clone(),
                    brand: brand.clone(),
                })
        })
        .collect()
}
