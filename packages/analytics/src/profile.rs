//! Per-branch competitive profile metrics.

use branchwatch_analytics_models::{CompetitiveProfile, CompetitorMatch};
use branchwatch_branch_models::Branch;

use crate::round2;

/// Builds the competitive profile for one branch from its match list.
///
/// Returns `None` when `matches` is empty: a branch with no nearby
/// competitors has no profile rather than a zero-valued one. The match
/// list is expected to be sorted nearest-first already (the matcher's
/// output contract), so the first entry supplies `nearest_distance_km`.
#[must_use]
pub fn build_profile(
    branch: &Branch,
    matches: Vec<CompetitorMatch>,
    exclude_unrated: bool,
) -> Option<CompetitiveProfile> {
    let nearest_distance_km = matches.first()?.distance_km;

    let competitor_avg_rating = competitor_average(&matches, exclude_unrated);
    let rating_advantage = round2(branch.rating - competitor_avg_rating);

    Some(CompetitiveProfile {
        branch_id: branch.id.clone(),
        match_count: matches.len() as u64,
        nearest_distance_km,
        competitor_avg_rating,
        rating_advantage,
        matches,
    })
}

/// Mean competitor rating across the match list.
///
/// Unrated competitors (rating 0) count as 0 by default. With
/// `exclude_unrated`, the mean is taken over rated competitors only,
/// falling back to the full list when none of them are rated.
fn competitor_average(matches: &[CompetitorMatch], exclude_unrated: bool) -> f64 {
    let rated: Vec<f64> = matches
        .iter()
        .map(|m| m.competitor_rating)
        .filter(|rating| *rating > 0.0)
        .collect();

    if exclude_unrated && !rated.is_empty() {
        return mean(&rated);
    }

    let all: Vec<f64> = matches.iter().map(|m| m.competitor_rating).collect();
    mean(&all)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
