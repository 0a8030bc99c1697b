//! Composite zone×brand ranking.
//!
//! The score is a relative heuristic, not a probability: its contract
//! is strict monotonicity in each component and a deterministic induced
//! ordering.

use std::collections::BTreeMap;

use branchwatch_analytics_models::ZoneBrandScore;
use branchwatch_branch_models::Branch;

use crate::config::ScoreWeights;
use crate::round2;

/// Raw aggregates for one zone×brand combination.
#[derive(Default)]
struct ComboTally {
    branch_count: u64,
    total_reviews: u64,
    rating_sum: f64,
}

/// Weighted blend of quality, review volume, and footprint:
/// `rating_w * avg_rating + reviews_w * ln(1 + reviews) + footprint_w * count`.
#[must_use]
pub fn composite_score(
    avg_rating: f64,
    total_reviews: u64,
    branch_count: u64,
    weights: ScoreWeights,
) -> f64 {
    weights.rating * avg_rating
        + weights.reviews * (1.0 + total_reviews as f64).ln()
        + weights.footprint * branch_count as f64
}

/// Scores every zone×brand combination with at least one branch and
/// returns the top `top_n` by descending score.
///
/// Ties break by branch count (higher first), then zone name, then
/// brand name, so the ordering never depends on input order. The stored
/// `score` is rounded to 2 decimals but the ordering is computed on the
/// unrounded value.
#[must_use]
pub fn rank_zone_brands(
    branches: &[Branch],
    weights: ScoreWeights,
    top_n: usize,
) -> Vec<ZoneBrandScore> {
    let mut combos: BTreeMap<(String, String), ComboTally> = BTreeMap::new();

    for branch in branches {
        let tally = combos
            .entry((branch.zone.clone(), branch.brand.clone()))
            .or_default();
        tally.branch_count += 1;
        tally.total_reviews += branch.review_count;
        tally.rating_sum += branch.rating;
    }

    let mut scored: Vec<(f64, ZoneBrandScore)> = combos
        .into_iter()
        .map(|((zone, brand), tally)| {
            let avg_rating = tally.rating_sum / tally.branch_count as f64;
            let raw = composite_score(avg_rating, tally.total_reviews, tally.branch_count, weights);
            let entry = ZoneBrandScore {
                zone,
                brand,
                branch_count: tally.branch_count,
                total_reviews: tally.total_reviews,
                avg_rating,
                score: round2(raw),
            };
            (raw, entry)
        })
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| b.branch_count.cmp(&a.branch_count))
            .then_with(|| a.zone.cmp(&b.zone))
            .then_with(|| a.brand.cmp(&b.brand))
    });

    scored.truncate(top_n);
    scored.into_iter().map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(id: &str, brand: &str, zone: &str, rating: f64, review_count: u64) -> Branch {
        Branch {
            id: id.to_string(),
            brand: brand.to_string(),
            name: format!("{brand} {id}"),
            address: String::new(),
            zone: zone.to_string(),
            latitude: None,
            longitude: None,
            rating,
            review_count,
        }
    }

    #[test]
    fn composite_score_matches_the_formula() {
        let score = composite_score(4.0, 100, 2, ScoreWeights::default());
        let expected = 0.4 * 4.0 + 0.3 * 101.0_f64.ln() + 0.3 * 2.0;
        assert!((score - expected).abs() < 1e-12);
        assert!((expected - 3.584_536).abs() < 1e-3);
    }

    #[test]
    fn score_is_strictly_monotonic_in_each_component() {
        let weights = ScoreWeights::default();
        let base = composite_score(3.0, 50, 2, weights);

        assert!(composite_score(3.1, 50, 2, weights) > base);
        assert!(composite_score(3.0, 51, 2, weights) > base);
        assert!(composite_score(3.0, 50, 3, weights) > base);
    }

    #[test]
    fn ranks_combinations_by_descending_score() {
        let branches = vec![
            branch("a-1", "Acme", "Centro", 4.5, 200),
            branch("a-2", "Acme", "Centro", 4.5, 150),
            branch("z-1", "Zenith", "Centro", 3.0, 10),
            branch("a-3", "Acme", "Norte", 2.0, 5),
        ];
        let ranked = rank_zone_brands(&branches, ScoreWeights::default(), 10);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].zone, "Centro");
        assert_eq!(ranked[0].brand, "Acme");
        assert_eq!(ranked[0].branch_count, 2);
        assert_eq!(ranked[0].total_reviews, 350);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn exact_ties_order_by_count_then_zone_then_brand() {
        // Two identical single-branch combinations in different zones.
        let branches = vec![
            branch("z-1", "Zenith", "Norte", 4.0, 30),
            branch("a-1", "Acme", "Centro", 4.0, 30),
        ];
        let ranked = rank_zone_brands(&branches, ScoreWeights::default(), 10);

        assert_eq!(ranked[0].zone, "Centro");
        assert_eq!(ranked[1].zone, "Norte");
    }

    #[test]
    fn truncates_to_top_n() {
        let branches = vec![
            branch("a-1", "Acme", "Centro", 4.0, 10),
            branch("z-1", "Zenith", "Norte", 3.0, 10),
            branch("o-1", "Orbit", "Sur", 2.0, 10),
        ];
        let ranked = rank_zone_brands(&branches, ScoreWeights::default(), 2);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn stored_score_is_rounded_to_two_decimals() {
        let branches = vec![branch("a-1", "Acme", "Centro", 4.0, 100)];
        let ranked = rank_zone_brands(&branches, ScoreWeights::default(), 1);
        // 0.4*4.0 + 0.3*ln(101) + 0.3*1.0 = 3.2845...
        assert_eq!(ranked[0].score, 3.28);
    }
}
