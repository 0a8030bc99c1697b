#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion of branch records produced by the data-acquisition layer.
//!
//! The acquisition side (an external collaborator talking to a places
//! search API) hands over a JSON array of branch records. Ingestion
//! validates each record, feeds the deduplicating store, and counts what
//! it drops — rejections are tolerated noise, not fatal errors.

use std::path::Path;

use branchwatch_branch_models::Branch;
use branchwatch_store::BranchStore;
use thiserror::Error;

/// Errors that can occur while reading the input file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Reading the input file failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    /// The input was not a valid JSON array of branch records.
    #[error("failed to parse input: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Counters for one ingestion pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Records seen in the input.
    pub total: u64,
    /// Records inserted into the store.
    pub inserted: u64,
    /// Records skipped because their id was already seen.
    pub duplicates: u64,
    /// Records skipped because their brand is not in the configured set.
    pub unknown_brand: u64,
    /// Records skipped for an empty id.
    pub missing_id: u64,
    /// Records skipped because their rating was outside 0.0–5.0.
    pub invalid_rating: u64,
}

impl IngestStats {
    /// Records that were seen but not inserted.
    #[must_use]
    pub const fn rejected(&self) -> u64 {
        self.total - self.inserted
    }
}

/// Reads a JSON array of branch records from `path`.
///
/// Display-only fields outside the branch contract (phone, hours,
/// review texts) are ignored during parsing.
///
/// # Errors
///
/// Returns an [`IngestError`] if the file cannot be read or is not a
/// valid JSON array of branch records.
pub fn read_records(path: &Path) -> Result<Vec<Branch>, IngestError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Validates records and inserts them into the store.
///
/// A record is rejected (counted, never fatal) when its id is empty,
/// its brand is not in `brands`, or its rating is outside 0.0–5.0.
/// Duplicate ids are silently skipped: the first record seen wins.
/// Missing or out-of-range coordinates are *not* a rejection — such
/// branches still aggregate by zone, and the engine reports them as
/// skipped from proximity matching.
pub fn ingest(records: Vec<Branch>, store: &mut BranchStore, brands: &[String]) -> IngestStats {
    let mut stats = IngestStats::default();

    for branch in records {
        stats.total += 1;

        if branch.id.is_empty() {
            stats.missing_id += 1;
            continue;
        }
        if !brands.contains(&branch.brand) {
            log::debug!(
                "Skipping {}: brand {:?} is not configured",
                branch.id,
                branch.brand
            );
            stats.unknown_brand += 1;
            continue;
        }
        if branch.rating.is_nan() || !(0.0..=5.0).contains(&branch.rating) {
            log::debug!(
                "Skipping {}: rating {} outside 0.0-5.0",
                branch.id,
                branch.rating
            );
            stats.invalid_rating += 1;
            continue;
        }

        if store.insert(branch) {
            stats.inserted += 1;
        } else {
            stats.duplicates += 1;
        }
    }

    log::info!(
        "Ingested {}/{} records ({} duplicate, {} unknown brand, {} missing id, {} invalid rating)",
        stats.inserted,
        stats.total,
        stats.duplicates,
        stats.unknown_brand,
        stats.missing_id,
        stats.invalid_rating
    );

    stats
}

/// Brand labels observed in the records, in first-seen order.
///
/// Useful for exploratory runs without a configured brand list; the
/// analysis itself should be given an explicit precedence order so its
/// tie-breaking does not depend on input order.
#[must_use]
pub fn observed_brands(records: &[Branch]) -> Vec<String> {
    let mut brands: Vec<String> = Vec::new();
    for record in records {
        if !brands.contains(&record.brand) {
            brands.push(record.brand.clone());
        }
    }
    brands
}
