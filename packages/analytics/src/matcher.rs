//! All-pairs competitor matching within a radius.
//!
//! Deliberately quadratic for the default brute-force strategy: the
//! datasets this engine targets are bounded (hundreds to low thousands
//! of branches) and correctness is easier to see in the simple form.
//! Each base branch's match list is independent of every other's, so the
//! outer loop fans out across rayon workers over the read-only branch
//! slice.

use std::collections::BTreeMap;

use branchwatch_analytics_models::CompetitorMatch;
use branchwatch_branch_models::{Branch, Coordinates};
use branchwatch_spatial::IndexStrategy;
use rayon::prelude::*;

/// Finds, for every branch with valid coordinates, all branches of a
/// *different* brand within `radius_km`, sorted nearest-first with ties
/// broken by competitor id.
///
/// The returned map keys are positions into `branches` and only
/// branches with at least one match have an entry. A branch without
/// valid coordinates produces no matches and is never a candidate;
/// self-matches are excluded.
#[must_use]
pub fn find_competitors(
    branches: &[Branch],
    radius_km: f64,
    strategy: IndexStrategy,
) -> BTreeMap<usize, Vec<CompetitorMatch>> {
    let located: Vec<(usize, Coordinates)> = branches
        .iter()
        .enumerate()
        .filter_map(|(position, branch)| branch.coordinates().map(|c| (position, c)))
        .collect();

    let index = strategy.build_index(located.clone());

    located
        .par_iter()
        .map(|&(position, coords)| {
            let base = &branches[position];
            let mut matches: Vec<CompetitorMatch> = index
                .within_radius(coords, radius_km)
                .into_iter()
                .filter(|neighbor| neighbor.position != position)
                .filter(|neighbor| branches[neighbor.position].brand != base.brand)
                .map(|neighbor| {
                    competitor_match(base, &branches[neighbor.position], neighbor.distance_km)
                })
                .collect();

            matches.sort_by(|a, b| {
                a.distance_km
                    .total_cmp(&b.distance_km)
                    .then_with(|| a.competitor_id.cmp(&b.competitor_id))
            });

            (position, matches)
        })
        .filter(|(_, matches)| !matches.is_empty())
        .collect()
}

fn competitor_match(base: &Branch, competitor: &Branch, distance_km: f64) -> CompetitorMatch {
    CompetitorMatch {
        competitor_id: competitor.id.clone(),
        competitor_brand: competitor.brand.clone(),
        competitor_name: competitor.name.clone(),
        distance_km,
        competitor_rating: competitor.rating,
        competitor_review_count: competitor.review_count,
        rating_diff: base.rating - competitor.rating,
        review_diff: review_delta(base.review_count, competitor.review_count),
    }
}

/// Signed difference of two review counts.
fn review_delta(base: u64, competitor: u64) -> i64 {
    let base = i64::try_from(base).unwrap_or(i64::MAX);
    let competitor = i64::try_from(competitor).unwrap_or(i64::MAX);
    base.saturating_sub(competitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(id: &str, brand: &str, latitude: f64, longitude: f64) -> Branch {
        Branch {
            id: id.to_string(),
            brand: brand.to_string(),
            name: format!("{brand} {id}"),
            address: String::new(),
            zone: "Centro".to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            rating: 4.0,
            review_count: 50,
        }
    }

    // Roughly 0.11 km apart per 0.001 degrees of longitude at the
    // equator, so a 1 km radius spans ~0.009 degrees.
    fn cluster() -> Vec<Branch> {
        vec![
            branch("a-1", "Acme", 0.0, 0.0),
            branch("z-1", "Zenith", 0.0, 0.002),
            branch("z-2", "Zenith", 0.0, 0.004),
            branch("a-2", "Acme", 0.0, 0.006),
            branch("o-far", "Orbit", 0.0, 0.5),
        ]
    }

    #[test]
    fn matches_exclude_same_brand_and_self() {
        let branches = cluster();
        let matched = find_competitors(&branches, 1.0, IndexStrategy::BruteForce);

        let a1 = &matched[&0];
        assert!(a1.iter().all(|m| m.competitor_brand != "Acme"));
        assert!(a1.iter().all(|m| m.competitor_id != "a-1"));
        assert_eq!(a1.len(), 2);
    }

    #[test]
    fn matches_are_sorted_nearest_first() {
        let branches = cluster();
        let matched = find_competitors(&branches, 1.0, IndexStrategy::BruteForce);

        for matches in matched.values() {
            for pair in matches.windows(2) {
                assert!(
                    pair[0].distance_km <= pair[1].distance_km,
                    "matches out of order: {} then {}",
                    pair[0].distance_km,
                    pair[1].distance_km
                );
            }
        }

        let a2 = &matched[&3];
        assert_eq!(a2[0].competitor_id, "z-2");
        assert_eq!(a2[1].competitor_id, "z-1");
    }

    #[test]
    fn distance_ties_break_by_competitor_id() {
        let branches = vec![
            branch("base", "Acme", 0.0, 0.0),
            branch("z-b", "Zenith", 0.0, 0.001),
            branch("z-a", "Zenith", 0.0, 0.001),
        ];
        let matched = find_competitors(&branches, 1.0, IndexStrategy::BruteForce);

        let ids: Vec<&str> = matched[&0].iter().map(|m| m.competitor_id.as_str()).collect();
        assert_eq!(ids, vec!["z-a", "z-b"]);
    }

    #[test]
    fn branches_outside_radius_do_not_match() {
        let branches = cluster();
        let matched = find_competitors(&branches, 1.0, IndexStrategy::BruteForce);
        // o-far is ~55 km out: no matches of its own, not a candidate.
        assert!(!matched.contains_key(&4));
        assert!(
            matched
                .values()
                .flatten()
                .all(|m| m.competitor_id != "o-far")
        );
    }

    #[test]
    fn tiny_radius_yields_no_matches() {
        let branches = cluster();
        let matched = find_competitors(&branches, 0.001, IndexStrategy::BruteForce);
        assert!(matched.is_empty());
    }

    #[test]
    fn branches_without_coordinates_are_excluded_both_ways() {
        let mut no_coords = branch("n-1", "Zenith", 0.0, 0.0);
        no_coords.latitude = None;
        let branches = vec![branch("a-1", "Acme", 0.0, 0.0), no_coords];

        let matched = find_competitors(&branches, 1.0, IndexStrategy::BruteForce);
        assert!(matched.is_empty());
    }

    #[test]
    fn diff_fields_are_base_minus_competitor() {
        let mut strong = branch("a-1", "Acme", 0.0, 0.0);
        strong.rating = 4.5;
        strong.review_count = 80;
        let mut weak = branch("z-1", "Zenith", 0.0, 0.001);
        weak.rating = 3.0;
        weak.review_count = 100;

        let branches = vec![strong, weak];
        let matched = find_competitors(&branches, 1.0, IndexStrategy::BruteForce);

        let m = &matched[&0][0];
        assert!((m.rating_diff - 1.5).abs() < 1e-12);
        assert_eq!(m.review_diff, -20);
        assert_eq!(m.competitor_rating, 3.0);
        assert_eq!(m.competitor_review_count, 100);
    }

    #[test]
    fn rtree_strategy_matches_brute_force() {
        let branches = cluster();
        let brute = find_competitors(&branches, 1.0, IndexStrategy::BruteForce);
        let rtree = find_competitors(&branches, 1.0, IndexStrategy::RTree);
        assert_eq!(brute, rtree);
    }
}
