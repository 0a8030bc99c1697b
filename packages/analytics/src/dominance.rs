//! Zone-level brand dominance aggregation.

use std::collections::BTreeMap;

use branchwatch_analytics_models::ZoneDominance;
use branchwatch_branch_models::Branch;

/// Per-brand accumulator while grouping branches into zones.
#[derive(Default, Clone, Copy)]
struct BrandTally {
    count: u64,
    rating_sum: f64,
}

/// Groups all branches (coordinate validity is irrelevant here) by zone
/// and brand, producing one [`ZoneDominance`] record per zone.
///
/// Every configured brand appears in every zone's counts, 0 when
/// absent. The dominant brand is the argmax over the configured brand
/// set; ties resolve to the earliest brand in `brands`. Zones listed in
/// `canonical_zones` appear even with no branches at all
/// (`dominant_brand` is `None`, every average is `None`). Branches with
/// a brand outside the configured set are not counted.
#[must_use]
pub fn aggregate_by_zone(
    branches: &[Branch],
    brands: &[String],
    canonical_zones: &[String],
) -> BTreeMap<String, ZoneDominance> {
    let mut zones: BTreeMap<String, BTreeMap<&str, BrandTally>> = BTreeMap::new();

    for zone in canonical_zones {
        zones.entry(zone.clone()).or_default();
    }

    for branch in branches {
        let tally = zones
            .entry(branch.zone.clone())
            .or_default()
            .entry(branch.brand.as_str())
            .or_default();
        tally.count += 1;
        tally.rating_sum += branch.rating;
    }

    zones
        .into_iter()
        .map(|(zone, tallies)| {
            let mut brand_counts = BTreeMap::new();
            let mut avg_rating_per_brand = BTreeMap::new();

            for brand in brands {
                let tally = tallies
                    .get(brand.as_str())
                    .copied()
                    .unwrap_or_default();
                brand_counts.insert(brand.clone(), tally.count);
                avg_rating_per_brand.insert(
                    brand.clone(),
                    (tally.count > 0).then(|| tally.rating_sum / tally.count as f64),
                );
            }

            let total_branches = brand_counts.values().sum();
            let dominant_brand = dominant(&brand_counts, brands);

            let dominance = ZoneDominance {
                zone: zone.clone(),
                brand_counts,
                total_branches,
                dominant_brand,
                avg_rating_per_brand,
            };
            (zone, dominance)
        })
        .collect()
}

/// Argmax over the brand counts. Iterates brands in precedence order
/// with a strict comparison so the earliest configured brand wins ties;
/// `None` when no configured brand has any branches.
fn dominant(brand_counts: &BTreeMap<String, u64>, brands: &[String]) -> Option<String> {
    let mut best: Option<(&String, u64)> = None;

    for brand in brands {
        let count = brand_counts.get(brand).copied().unwrap_or(0);
        if count > 0 && best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((brand, count));
        }
    }

    best.map(|(brand, _)| brand.clone())
}
