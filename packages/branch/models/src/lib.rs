#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Branch point-of-interest record types.
//!
//! A [`Branch`] is a single physical location belonging to one competing
//! brand. Records arrive from an external data-acquisition collaborator
//! as JSON and are validated here before entering the store. Coordinates
//! are range-checked at construction via [`Coordinates`]; a branch
//! without a valid pair is excluded from proximity matching but still
//! participates in zone aggregation.

use serde::{Deserialize, Serialize};

/// Zone label for branches whose administrative area could not be
/// derived from their address.
pub const UNASSIGNED_ZONE: &str = "unassigned";

fn default_zone() -> String {
    UNASSIGNED_ZONE.to_string()
}

/// A single branch location belonging to one brand.
///
/// Field names are the wire contract with the acquisition layer; extra
/// display-only fields in the input (phone, hours, review texts) are
/// ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Opaque stable identifier, globally unique. The dedup key.
    pub id: String,
    /// Brand label, one of the finite caller-supplied competing set.
    pub brand: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Formatted street address.
    #[serde(default)]
    pub address: String,
    /// Coarse administrative-area label derived from the address.
    #[serde(default = "default_zone")]
    pub zone: String,
    /// Latitude in degrees. Required for proximity matching.
    pub latitude: Option<f64>,
    /// Longitude in degrees. Required for proximity matching.
    pub longitude: Option<f64>,
    /// Average quality score, 0.0–5.0. 0 means unrated.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind `rating`.
    #[serde(default)]
    pub review_count: u64,
}

impl Branch {
    /// Returns the branch's validated coordinates, or `None` when either
    /// component is missing or out of range.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng).ok(),
            _ => None,
        }
    }
}

/// A validated (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, within [-180, 180].
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, validating ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if `latitude` is outside [-90, 90] or
    /// `longitude` is outside [-180, 180]. Out-of-range values are a
    /// caller error and are never clamped.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinatesError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinatesError {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Error returned when attempting to create [`Coordinates`] from values
/// outside the valid latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinatesError {
    /// The latitude that was provided.
    pub latitude: f64,
    /// The longitude that was provided.
    pub longitude: f64,
}

impl std::fmt::Display for InvalidCoordinatesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinates ({}, {}): expected latitude in [-90, 90] and longitude in [-180, 180]",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinatesError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(lat: Option<f64>, lng: Option<f64>) -> Branch {
        Branch {
            id: "b-1".to_string(),
            brand: "Acme".to_string(),
            name: "Acme Centro".to_string(),
            address: "Av. Juárez 100".to_string(),
            zone: "Cuauhtémoc".to_string(),
            latitude: lat,
            longitude: lng,
            rating: 4.2,
            review_count: 31,
        }
    }

    #[test]
    fn accepts_valid_coordinate_ranges() {
        assert!(Coordinates::new(19.4326, -99.1332).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert!(Coordinates::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Coordinates::new(90.01, 0.0).is_err());
        assert!(Coordinates::new(-91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, 180.5).is_err());
        assert!(Coordinates::new(0.0, -200.0).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn branch_coordinates_require_both_components() {
        assert!(branch(Some(19.4), Some(-99.1)).coordinates().is_some());
        assert!(branch(None, Some(-99.1)).coordinates().is_none());
        assert!(branch(Some(19.4), None).coordinates().is_none());
        assert!(branch(None, None).coordinates().is_none());
    }

    #[test]
    fn branch_coordinates_reject_out_of_range_values() {
        assert!(branch(Some(120.0), Some(-99.1)).coordinates().is_none());
        assert!(branch(Some(19.4), Some(190.0)).coordinates().is_none());
    }

    #[test]
    fn deserializes_contract_field_names() {
        let record: Branch = serde_json::from_str(
            r#"{
                "id": "p-9",
                "brand": "Acme",
                "name": "Acme Norte",
                "address": "Calle 5 #22",
                "zone": "Azcapotzalco",
                "latitude": 19.48,
                "longitude": -99.18,
                "rating": 3.9,
                "review_count": 12,
                "phone": "+52 55 0000 0000",
                "hours": ["Mon 9-5"]
            }"#,
        )
        .expect("record should parse");

        assert_eq!(record.id, "p-9");
        assert_eq!(record.zone, "Azcapotzalco");
        assert_eq!(record.review_count, 12);
    }

    #[test]
    fn missing_zone_defaults_to_unassigned() {
        let record: Branch = serde_json::from_str(
            r#"{"id": "p-1", "brand": "Acme", "latitude": null, "longitude": null}"#,
        )
        .expect("record should parse");

        assert_eq!(record.zone, UNASSIGNED_ZONE);
        assert_eq!(record.rating, 0.0);
        assert!(record.coordinates().is_none());
    }
}
