//! Option set computation
//!
//! For each dimension the builder answers: "which values could the user pick
//! right now, and how many organisms would each leave?" Counts honor the
//! rest of the selection, except the dimension's own constraint and its
//! taxonomy descendants, so sibling values stay visible and switchable
//! without clearing the filter first. Option sets are recomputed on every
//! selection change, never cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::selection::{Dimension, FilterSelection};
use crate::models::Organism;

/// One pickable value with its result count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub count: usize,
}

/// The valid, non-empty choices for one dimension given the rest of the
/// selection. Serialized as-is into responses so the client can rebuild its
/// widgets from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    pub dimension: Dimension,
    pub options: Vec<FilterOption>,
}

impl OptionSet {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Compute the option set for `dimension` against a snapshot of organism
/// records.
///
/// Counts ignore the dimension's own constraint and, for taxonomy
/// dimensions, the constraints of its descendants: a held phylum must not
/// hide sibling kingdoms, or the user could never switch kingdom without
/// clearing the phylum first (the downstream invalidation in the resolver
/// handles the dependent values instead). Ancestor, organism and query
/// constraints all apply.
///
/// Ordering is count descending with ties broken by value ascending. The
/// tie-break matters: values come out of an unordered scan, and a
/// deterministic order is required for stable rendering and testing. Values
/// with zero matches are never emitted, and the free-text query dimension
/// has no enumerable options.
pub fn build_options(
    records: &[Organism],
    selection: &FilterSelection,
    dimension: Dimension,
) -> OptionSet {
    if dimension == Dimension::Query {
        return OptionSet {
            dimension,
            options: Vec::new(),
        };
    }

    let mut skipped = vec![dimension];
    skipped.extend_from_slice(dimension.descendants());

    // BTreeMap gives value-ascending order; the stable sort below then only
    // reorders by count, preserving the alphabetical tie-break.
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for organism in records {
        if !selection.matches_excluding(organism, &skipped) {
            continue;
        }
        let Some(value) = dimension.value_of(organism) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut options: Vec<FilterOption> = counts
        .into_iter()
        .map(|(value, count)| FilterOption {
            value: value.to_string(),
            label: value.to_string(),
            count,
        })
        .collect();
    options.sort_by(|a, b| b.count.cmp(&a.count));

    OptionSet { dimension, options }
}
