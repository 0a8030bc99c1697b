//! The full analysis pipeline over a branch store snapshot.

use std::collections::BTreeMap;
use std::time::Instant;

use branchwatch_analytics_models::{AnalysisReport, CompetitiveProfile};
use branchwatch_store::BranchStore;

use crate::config::{AnalysisConfig, ConfigurationError};
use crate::{dominance, matcher, profile, scorer, summary};

/// Runs the complete competitive analysis over the store.
///
/// The computation is pure and synchronous: it reads the store
/// snapshot, recomputes every derived structure wholesale, and returns
/// a serializable report. Identical input and configuration always
/// produce an identical report. An empty store yields empty result
/// structures.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when the configuration is invalid;
/// nothing is computed in that case.
pub fn analyze(
    store: &BranchStore,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, ConfigurationError> {
    config.validate()?;
    let start = Instant::now();

    let branches = store.branches();
    let analyzed_branches = branches
        .iter()
        .filter(|branch| branch.coordinates().is_some())
        .count() as u64;
    let skipped_branches = branches.len() as u64 - analyzed_branches;
    if skipped_branches > 0 {
        log::info!(
            "{skipped_branches} of {} branches lack valid coordinates and are excluded from matching",
            branches.len()
        );
    }

    let match_lists = matcher::find_competitors(branches, config.radius_km, config.strategy);

    let mut profiles: BTreeMap<String, CompetitiveProfile> = BTreeMap::new();
    for (position, matches) in match_lists {
        let branch = &branches[position];
        if let Some(built) =
            profile::build_profile(branch, matches, config.exclude_unrated_competitors)
        {
            profiles.insert(branch.id.clone(), built);
        }
    }

    let zones = dominance::aggregate_by_zone(branches, &config.brands, &config.zones);
    let rankings = scorer::rank_zone_brands(branches, config.weights, config.top_n);
    let saturation = summary::zone_saturation(branches, &profiles);
    let brands = summary::brand_summaries(branches, &config.brands);
    let coverage_gaps = summary::coverage_gaps(&zones);

    log::info!(
        "Analyzed {analyzed_branches}/{} branches within {} km: {} profiled, {} zones, took {:.2}s",
        branches.len(),
        config.radius_km,
        profiles.len(),
        zones.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(AnalysisReport {
        radius_km: config.radius_km,
        branch_count: branches.len() as u64,
        analyzed_branches,
        skipped_branches,
        profiles,
        zones,
        rankings,
        saturation,
        brands,
        coverage_gaps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchwatch_branch_models::Branch;
    use branchwatch_spatial::IndexStrategy;

    fn branch(
        id: &str,
        brand: &str,
        zone: &str,
        coords: Option<(f64, f64)>,
        rating: f64,
        review_count: u64,
    ) -> Branch {
        Branch {
            id: id.to_string(),
            brand: brand.to_string(),
            name: format!("{brand} {id}"),
            address: String::new(),
            zone: zone.to_string(),
            latitude: coords.map(|(lat, _)| lat),
            longitude: coords.map(|(_, lng)| lng),
            rating,
            review_count,
        }
    }

    fn populated_store() -> BranchStore {
        let mut store = BranchStore::new();
        // Centro: two Acme and one Zenith branch a few hundred meters
        // apart; Norte: a lone Orbit branch and one Acme without
        // coordinates.
        for b in [
            branch("a-1", "Acme", "Centro", Some((19.4326, -99.1332)), 4.5, 120),
            branch("a-2", "Acme", "Centro", Some((19.4340, -99.1350)), 4.0, 80),
            branch("z-1", "Zenith", "Centro", Some((19.4330, -99.1340)), 3.5, 60),
            branch("o-1", "Orbit", "Norte", Some((19.5100, -99.2000)), 4.8, 20),
            branch("a-3", "Acme", "Norte", None, 3.0, 15),
        ] {
            store.insert(b);
        }
        store
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::new(vec![
            "Acme".to_string(),
            "Zenith".to_string(),
            "Orbit".to_string(),
        ])
    }

    #[test]
    fn empty_store_yields_empty_report() {
        let report = analyze(&BranchStore::new(), &config()).expect("analysis should run");

        assert_eq!(report.branch_count, 0);
        assert!(report.profiles.is_empty());
        assert!(report.zones.is_empty());
        assert!(report.rankings.is_empty());
        assert!(report.coverage_gaps.is_empty());
        assert_eq!(report.brands.len(), 3);
    }

    #[test]
    fn invalid_configuration_fails_before_computing() {
        let mut cfg = config();
        cfg.radius_km = -2.0;
        assert!(analyze(&populated_store(), &cfg).is_err());
    }

    #[test]
    fn profiles_cover_only_cross_brand_neighbors() {
        let report = analyze(&populated_store(), &config()).expect("analysis should run");

        // Both Acme branches and the Zenith branch see each other;
        // Orbit is tens of kilometers away and the coordinate-less
        // branch never matches.
        assert_eq!(
            report.profiles.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a-1", "a-2", "z-1"]
        );
        assert_eq!(report.analyzed_branches, 4);
        assert_eq!(report.skipped_branches, 1);

        let z1 = &report.profiles["z-1"];
        assert_eq!(z1.match_count, 2);
        assert!(z1.matches.iter().all(|m| m.competitor_brand == "Acme"));
        assert!(z1.rating_advantage < 0.0);
    }

    #[test]
    fn zones_and_rankings_cover_all_branches() {
        let report = analyze(&populated_store(), &config()).expect("analysis should run");

        let centro = &report.zones["Centro"];
        assert_eq!(centro.total_branches, 3);
        assert_eq!(centro.dominant_brand.as_deref(), Some("Acme"));

        // The coordinate-less Acme branch still aggregates into Norte.
        let norte = &report.zones["Norte"];
        assert_eq!(norte.total_branches, 2);
        assert_eq!(norte.brand_counts["Acme"], 1);
        assert_eq!(norte.brand_counts["Orbit"], 1);

        assert!(!report.rankings.is_empty());
        assert_eq!(report.rankings[0].zone, "Centro");
        assert_eq!(report.rankings[0].brand, "Acme");

        // Zenith and Orbit each miss one zone.
        assert_eq!(report.coverage_gaps.len(), 2);
    }

    #[test]
    fn tiny_radius_produces_no_profiles() {
        let mut cfg = config();
        cfg.radius_km = 0.001;
        let report = analyze(&populated_store(), &cfg).expect("analysis should run");
        assert!(report.profiles.is_empty());
        assert!(report.saturation.is_empty());
    }

    #[test]
    fn reruns_serialize_byte_identically() {
        let store = populated_store();
        let cfg = config();

        let first = serde_json::to_string(&analyze(&store, &cfg).expect("first run"))
            .expect("should serialize");
        let second = serde_json::to_string(&analyze(&store, &cfg).expect("second run"))
            .expect("should serialize");

        assert_eq!(first, second);
    }

    #[test]
    fn strategies_produce_identical_reports() {
        let store = populated_store();
        let brute_cfg = config();
        let mut rtree_cfg = config();
        rtree_cfg.strategy = IndexStrategy::RTree;

        let brute = analyze(&store, &brute_cfg).expect("brute-force run");
        let rtree = analyze(&store, &rtree_cfg).expect("r-tree run");

        assert_eq!(
            serde_json::to_string(&brute).expect("should serialize"),
            serde_json::to_string(&rtree).expect("should serialize"),
        );
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = analyze(&populated_store(), &config()).expect("analysis should run");
        let json = serde_json::to_string(&report).expect("should serialize");
        let back: AnalysisReport = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, report);
    }
}
