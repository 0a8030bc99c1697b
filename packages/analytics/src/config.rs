//! Analysis run configuration and validation.
//!
//! Configuration is validated up front: a bad radius, weight triple, or
//! brand list fails fast with a [`ConfigurationError`] before any
//! computation starts.

use std::collections::BTreeSet;

use branchwatch_spatial::IndexStrategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default competitor search radius in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 1.0;

/// Default number of zone×brand combinations kept in the ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// Tolerance when checking that score weights sum to 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weights for the composite zone×brand score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight on the brand's average rating in the zone.
    pub rating: f64,
    /// Weight on `ln(1 + total_reviews)`.
    pub reviews: f64,
    /// Weight on the branch count.
    pub footprint: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            rating: 0.4,
            reviews: 0.3,
            footprint: 0.3,
        }
    }
}

impl ScoreWeights {
    /// Sum of the three weights.
    #[must_use]
    pub fn sum(self) -> f64 {
        self.rating + self.reviews + self.footprint
    }
}

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum great-circle distance for two branches of different
    /// brands to count as competitors, in kilometers.
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    /// Competing brand labels in precedence order. The order breaks
    /// dominance ties: the earlier brand wins.
    pub brands: Vec<String>,
    /// Canonical zone labels that must appear in the zone output even
    /// when no branch falls in them. Empty means zones are derived from
    /// the data alone.
    #[serde(default)]
    pub zones: Vec<String>,
    /// Composite score weights.
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Number of top zone×brand combinations to keep in the ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Proximity index implementation used by the matcher.
    #[serde(default)]
    pub strategy: IndexStrategy,
    /// When true, unrated competitors (rating 0) are left out of
    /// profile rating averages. Defaults to false: unrated counts as 0.
    #[serde(default)]
    pub exclude_unrated_competitors: bool,
}

impl AnalysisConfig {
    /// Creates a configuration with defaults for everything but the
    /// brand precedence list.
    #[must_use]
    pub fn new(brands: Vec<String>) -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            brands,
            zones: Vec::new(),
            weights: ScoreWeights::default(),
            top_n: DEFAULT_TOP_N,
            strategy: IndexStrategy::default(),
            exclude_unrated_competitors: false,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the radius is not a
    /// positive number, the weights do not sum to 1.0 or are negative,
    /// or the brand list is empty or contains duplicates.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.radius_km.is_nan() || self.radius_km <= 0.0 {
            return Err(ConfigurationError::NonPositiveRadius(self.radius_km));
        }

        let sum = self.weights.sum();
        if !sum.is_finite() || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationError::UnnormalizedWeights(sum));
        }
        if self.weights.rating < 0.0 || self.weights.reviews < 0.0 || self.weights.footprint < 0.0
        {
            return Err(ConfigurationError::NegativeWeight(self.weights));
        }

        if self.brands.is_empty() {
            return Err(ConfigurationError::EmptyBrands);
        }
        let mut seen = BTreeSet::new();
        for brand in &self.brands {
            if !seen.insert(brand) {
                return Err(ConfigurationError::DuplicateBrand(brand.clone()));
            }
        }

        Ok(())
    }
}

/// Errors raised by configuration validation, before any computation.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The competitor radius must be a positive number of kilometers.
    #[error("search radius must be > 0 km, got {0}")]
    NonPositiveRadius(f64),
    /// The composite score weights must sum to exactly 1.0.
    #[error("score weights must sum to 1.0, got {0}")]
    UnnormalizedWeights(f64),
    /// Every composite score weight must be non-negative.
    #[error("score weights must be non-negative, got {0:?}")]
    NegativeWeight(ScoreWeights),
    /// At least one brand label is required.
    #[error("brand list must not be empty")]
    EmptyBrands,
    /// Brand labels must be unique.
    #[error("duplicate brand label: {0}")]
    DuplicateBrand(String),
}
