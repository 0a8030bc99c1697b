#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distance and radius-query index strategies.
//!
//! [`distance_km`] computes the spherical haversine distance between two
//! coordinate pairs. Radius lookups go through the [`ProximityIndex`]
//! trait so the matching layer can swap the brute-force scan for an
//! R-tree without changing its own contract: both strategies return the
//! exact same candidate set for any query.

use branchwatch_branch_models::Coordinates;
use rstar::{AABB, RTree, RTreeObject};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Mean Earth radius in kilometers (IUGG arithmetic mean radius).
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance in kilometers between two coordinate pairs,
/// using the haversine formula on a spherical Earth.
///
/// Symmetric in its arguments, non-negative, and zero for identical
/// points. Range validity is enforced when [`Coordinates`] are
/// constructed, not here.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    // h can round past 1.0 for near-antipodal pairs; asin would NaN.
    2.0 * MEAN_EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Selects which [`ProximityIndex`] implementation the matcher uses.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IndexStrategy {
    /// All-pairs scan, O(n) per query. The default: exact, simple, and
    /// fast enough for the bounded datasets this engine targets.
    #[default]
    BruteForce,
    /// R-tree with a bounding-box pre-filter, O(log n + k) per query.
    RTree,
}

impl IndexStrategy {
    /// Builds an index over the given candidate points.
    ///
    /// Each point carries the caller's `position` so query results can
    /// be mapped back to the collection the candidates came from.
    #[must_use]
    pub fn build_index(
        self,
        points: Vec<(usize, Coordinates)>,
    ) -> Box<dyn ProximityIndex + Send + Sync> {
        match self {
            Self::BruteForce => Box::new(BruteForceIndex::new(points)),
            Self::RTree => Box::new(RTreeIndex::new(points)),
        }
    }
}

/// A candidate returned by a radius query: the candidate's position in
/// the set the index was built from, plus its distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the candidate in the indexed point set.
    pub position: usize,
    /// Great-circle distance from the query origin, in kilometers.
    pub distance_km: f64,
}

/// Radius lookup over a fixed set of candidate points.
///
/// Implementations return every candidate within `radius_km` of the
/// origin, including one at the origin itself. Excluding the querying
/// point and any brand filtering belongs to the caller.
pub trait ProximityIndex {
    /// Returns all candidates within `radius_km` of `origin`, in
    /// unspecified order.
    fn within_radius(&self, origin: Coordinates, radius_km: f64) -> Vec<Neighbor>;
}

/// O(n)-per-query scan over the candidate list.
pub struct BruteForceIndex {
    points: Vec<(usize, Coordinates)>,
}

impl BruteForceIndex {
    /// Builds the index. For the brute-force strategy this is just the
    /// candidate list itself.
    #[must_use]
    pub const fn new(points: Vec<(usize, Coordinates)>) -> Self {
        Self { points }
    }
}

impl ProximityIndex for BruteForceIndex {
    fn within_radius(&self, origin: Coordinates, radius_km: f64) -> Vec<Neighbor> {
        self.points
            .iter()
            .filter_map(|&(position, coords)| {
                let distance = distance_km(origin, coords);
                (distance <= radius_km).then_some(Neighbor {
                    position,
                    distance_km: distance,
                })
            })
            .collect()
    }
}

/// A candidate point stored in the R-tree, located as `[lng, lat]`.
struct IndexedPoint {
    position: usize,
    coords: Coordinates,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.coords.longitude, self.coords.latitude])
    }
}

/// R-tree index: a degree-space bounding box pre-filter, then the exact
/// haversine predicate on everything the envelope catches.
pub struct RTreeIndex {
    tree: RTree<IndexedPoint>,
}

impl RTreeIndex {
    /// Bulk-loads the candidate points into an R-tree.
    #[must_use]
    pub fn new(points: Vec<(usize, Coordinates)>) -> Self {
        let entries = points
            .into_iter()
            .map(|(position, coords)| IndexedPoint { position, coords })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }
}

impl ProximityIndex for RTreeIndex {
    fn within_radius(&self, origin: Coordinates, radius_km: f64) -> Vec<Neighbor> {
        let envelope = radius_envelope(origin, radius_km);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|entry| {
                let distance = distance_km(origin, entry.coords);
                (distance <= radius_km).then_some(Neighbor {
                    position: entry.position,
                    distance_km: distance,
                })
            })
            .collect()
    }
}

/// Bounding box in degrees guaranteed to contain every point within
/// `radius_km` of `origin`.
///
/// Longitude degrees shrink with latitude, so the box is widened using
/// the smallest cosine in the latitude band it spans, degenerating to
/// the full longitude range at the poles. The box does not wrap the
/// antimeridian; candidates on the far side of ±180° are not found.
fn radius_envelope(origin: Coordinates, radius_km: f64) -> AABB<[f64; 2]> {
    let d_lat = (radius_km / MEAN_EARTH_RADIUS_KM).to_degrees();
    let max_abs_lat = (origin.latitude.abs() + d_lat).min(90.0);
    let cos_lat = max_abs_lat.to_radians().cos();
    let d_lng = if cos_lat <= f64::EPSILON {
        180.0
    } else {
        (d_lat / cos_lat).min(180.0)
    };

    AABB::from_corners(
        [origin.longitude - d_lng, origin.latitude - d_lat],
        [origin.longitude + d_lng, origin.latitude + d_lat],
    )
}
