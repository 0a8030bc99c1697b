#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Deduplicated in-memory store of branch records.
//!
//! The store owns deduplication: the first record seen for an `id` wins
//! and later inserts with the same `id` are silent no-ops. Iteration is
//! in insertion order. The analysis engine only ever reads the store, so
//! a populated store can be shared freely across worker threads.

use std::collections::BTreeMap;

use branchwatch_branch_models::Branch;
use thiserror::Error;

/// Errors that can occur during store lookups.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No branch with the requested id exists in the store.
    #[error("branch not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },
}

/// In-memory collection of deduplicated branch records.
#[derive(Debug, Clone, Default)]
pub struct BranchStore {
    branches: Vec<Branch>,
    by_id: BTreeMap<String, usize>,
}

impl BranchStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a branch if its `id` has not been seen yet.
    ///
    /// Returns `true` when the branch was inserted and `false` when a
    /// branch with the same `id` already exists; the existing record is
    /// kept unchanged (first-seen wins).
    pub fn insert(&mut self, branch: Branch) -> bool {
        if self.by_id.contains_key(&branch.id) {
            return false;
        }
        self.by_id.insert(branch.id.clone(), self.branches.len());
        self.branches.push(branch);
        true
    }

    /// Looks up a branch by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no branch with the id exists.
    pub fn get(&self, id: &str) -> Result<&Branch, StoreError> {
        self.by_id
            .get(id)
            .map(|&index| &self.branches[index])
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    /// All branches in insertion order.
    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Number of distinct branches in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Whether the store holds no branches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Iterates branches in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Branch> {
        self.branches.iter()
    }
}

impl<'a> IntoIterator for &'a BranchStore {
    type Item = &'a Branch;
    type IntoIter = std::slice::Iter<'a, Branch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
