//! Local filtering of a fetched batch.
//!
//! A [`FilterSpec`] is a conjunction: a record survives when it passes
//! every active predicate. Within `types` and `activities`, membership
//! is a disjunction. The pass is stable and borrows the batch; it
//! never copies or mutates records.

use crate::error::FilterError;
use crate::record::PermitRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The active predicates applied to a record set.
///
/// `Default` is the empty spec, which keeps everything. An empty
/// `text` string is treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Permit-type values to keep; empty means no restriction.
    pub types: BTreeSet<String>,
    /// Activity values to keep; empty means no restriction.
    pub activities: BTreeSet<String>,
    /// Case-insensitive substring matched against description and
    /// comments; unset means no restriction.
    pub text: Option<String>,
}

impl FilterSpec {
    /// Whether the spec restricts anything at all.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.activities.is_empty() && self.active_text().is_none()
    }

    fn active_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// The type and activity values one batch actually uses. Sorted, as a
/// front end would list them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    types: BTreeSet<String>,
    activities: BTreeSet<String>,
}

impl Vocabulary {
    /// Collect the distinct type and activity values of a batch.
    pub fn from_records(records: &[PermitRecord]) -> Self {
        let mut vocab = Self::default();
        for rec in records {
            if let Some(t) = &rec.permit_type {
                vocab.types.insert(t.clone());
            }
            if let Some(a) = &rec.activity {
                vocab.activities.insert(a.clone());
            }
        }
        vocab
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn activities(&self) -> impl Iterator<Item = &str> {
        self.activities.iter().map(String::as_str)
    }
}

/// Apply `spec` to `records`, borrowing the survivors in input order.
///
/// Fails when the spec names a type or activity outside `vocab`; a
/// caller that would rather no-match can pass a spec it built from the
/// vocabulary in the first place.
pub fn apply<'a>(
    records: &'a [PermitRecord],
    spec: &FilterSpec,
    vocab: &Vocabulary,
) -> Result<Vec<&'a PermitRecord>, FilterError> {
    for t in &spec.types {
        if !vocab.types.contains(t) {
            return Err(FilterError::UnknownType(t.clone()));
        }
    }
    for a in &spec.activities {
        if !vocab.activities.contains(a) {
            return Err(FilterError::UnknownActivity(a.clone()));
        }
    }

    let needle = spec.active_text().map(str::to_lowercase);

    Ok(records
        .iter()
        .filter(|rec| keeps(rec, spec, needle.as_deref()))
        .collect())
}

fn keeps(rec: &PermitRecord, spec: &FilterSpec, needle: Option<&str>) -> bool {
    // A record missing the field fails an active restriction.
    if !spec.types.is_empty() {
        match &rec.permit_type {
            Some(t) if spec.types.contains(t) => {}
            _ => return false,
        }
    }
    if !spec.activities.is_empty() {
        match &rec.activity {
            Some(a) if spec.activities.contains(a) => {}
            _ => return false,
        }
    }
    if let Some(needle) = needle {
        let hit = contains_ci(rec.description.as_deref(), needle)
            || contains_ci(rec.comments.as_deref(), needle);
        if !hit {
            return false;
        }
    }
    true
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle))
        .unwrap_or(false)
}
