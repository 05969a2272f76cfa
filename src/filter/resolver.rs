//! Cascading filter resolution
//!
//! The resolver turns an incoming selection (or a single-field change) into
//! a consistent new selection, recomputed option sets for every dimension,
//! and the filtered result page. The central invariant: a selection never
//! holds a value inconsistent with its taxonomy ancestors — changing kingdom
//! from Animalia to Plantae clears a phylum or class that only occurs under
//! Animalia.
//!
//! Every handled inconsistency degrades to "unconstrained" for the affected
//! field; nothing in here errors. All operations are pure reads over the
//! snapshot, so re-applying the same change is idempotent.

use serde::Serialize;

use super::options::{build_options, OptionSet};
use super::page::{slice, ResultPage};
use super::selection::{Dimension, FilterSelection};
use crate::models::Organism;

/// Everything one filter request needs to render a self-describing response:
/// the (possibly trimmed) selection, the result page, and full option sets
/// for widget reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub selection: FilterSelection,
    pub page: ResultPage<Organism>,
    pub options: Vec<OptionSet>,
}

impl FilterOutcome {
    pub fn option_set(&self, dimension: Dimension) -> Option<&OptionSet> {
        self.options.iter().find(|set| set.dimension == dimension)
    }
}

/// Resolves selections against a per-request snapshot of organism records
pub struct CascadeResolver<'a> {
    records: &'a [Organism],
    page_size: usize,
}

impl<'a> CascadeResolver<'a> {
    pub fn new(records: &'a [Organism], page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
        }
    }

    /// Resolve a decoded selection for a plain GET: sanitize it against the
    /// hierarchy, then compute options and the requested (clamped) page.
    pub fn resolve(&self, selection: FilterSelection, page: usize) -> FilterOutcome {
        let selection = self.sanitize(selection);
        self.outcome(selection, page)
    }

    /// Apply a single-field change: set or clear the dimension, drop a stale
    /// value, invalidate downstream taxonomy dimensions, and return to the
    /// first page (a filter change never preserves a page number that might
    /// now be out of range).
    pub fn apply_change(
        &self,
        previous: FilterSelection,
        changed: Dimension,
        new_value: Option<String>,
    ) -> FilterOutcome {
        let new_value = new_value.filter(|v| !v.is_empty());

        // A value the current option set does not offer is stale client
        // state; treat it as "clear" rather than erroring. Free text has no
        // option set and is always accepted.
        let new_value = match new_value {
            Some(value) if changed != Dimension::Query => {
                let current = build_options(self.records, &previous, changed);
                current.contains(&value).then_some(value)
            }
            other => other,
        };

        let mut next = previous;
        next.set(changed, new_value);

        for descendant in changed.descendants() {
            if let Some(held) = next.get(*descendant).map(str::to_string) {
                if !self.valid_taxon(&next, *descendant, &held) {
                    next.set(*descendant, None);
                }
            }
        }

        self.outcome(next, 1)
    }

    /// Whether `value` occurs for `dimension` under the hierarchy ancestors
    /// currently held in `selection` (kingdom for phylum; kingdom and phylum
    /// for class).
    fn valid_taxon(&self, selection: &FilterSelection, dimension: Dimension, value: &str) -> bool {
        self.records
            .iter()
            .filter(|organism| {
                dimension.ancestors().iter().all(|ancestor| {
                    match selection.get(*ancestor) {
                        Some(wanted) => ancestor.value_of(organism) == Some(wanted),
                        None => true,
                    }
                })
            })
            .any(|organism| dimension.value_of(organism) == Some(value))
    }

    /// Enforce hierarchy consistency on a freshly decoded selection. Phylum
    /// is checked under the selected kingdom, class under the selected
    /// kingdom and (surviving) phylum, and an organism name absent from the
    /// snapshot is dropped. Invalid values degrade to unconstrained.
    fn sanitize(&self, mut selection: FilterSelection) -> FilterSelection {
        for dimension in [Dimension::Phylum, Dimension::ClassName] {
            if let Some(held) = selection.get(dimension).map(str::to_string) {
                if !self.valid_taxon(&selection, dimension, &held) {
                    selection.set(dimension, None);
                }
            }
        }

        if let Some(name) = selection.get(Dimension::Organism).map(str::to_string) {
            let known = self
                .records
                .iter()
                .any(|organism| organism.scientific_name == name);
            if !known {
                selection.set(Dimension::Organism, None);
            }
        }

        selection
    }

    fn outcome(&self, selection: FilterSelection, page: usize) -> FilterOutcome {
        let options = Dimension::ALL
            .iter()
            .filter(|d| **d != Dimension::Query)
            .map(|d| build_options(self.records, &selection, *d))
            .collect();

        let mut matches: Vec<Organism> = self
            .records
            .iter()
            .filter(|organism| selection.matches(organism))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.scientific_name.cmp(&b.scientific_name));

        let page = slice(&matches, self.page_size, page);

        FilterOutcome {
            selection,
            page,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(name: &str, kingdom: &str, phylum: &str, class_name: &str) -> Organism {
        Organism {
            scientific_name: name.to_string(),
            common_name: None,
            kingdom: Some(kingdom.to_string()),
            phylum: Some(phylum.to_string()),
            class_name: Some(class_name.to_string()),
            ncbi_url: None,
        }
    }

    fn records() -> Vec<Organism> {
        vec![
            org("Bos taurus", "Animalia", "Chordata", "Mammalia"),
            org("Gallus gallus", "Animalia", "Chordata", "Aves"),
            org("Homo sapiens", "Animalia", "Chordata", "Mammalia"),
            org("Apis mellifera", "Animalia", "Arthropoda", "Insecta"),
            org("Zea mays", "Plantae", "Streptophyta", "Magnoliopsida"),
            org("Oryza sativa", "Plantae", "Streptophyta", "Liliopsida"),
        ]
    }

    #[test]
    fn test_changing_kingdom_clears_inconsistent_descendants() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 20);
        let previous = FilterSelection::default()
            .with(Dimension::Kingdom, "Animalia")
            .with(Dimension::Phylum, "Chordata")
            .with(Dimension::ClassName, "Mammalia");

        let outcome =
            resolver.apply_change(previous, Dimension::Kingdom, Some("Plantae".to_string()));

        assert_eq!(outcome.selection.kingdom.as_deref(), Some("Plantae"));
        assert!(outcome.selection.phylum.is_none());
        assert!(outcome.selection.class_name.is_none());
        assert_eq!(outcome.page.total_count, 2);
    }

    #[test]
    fn test_descendants_surviving_the_change_are_kept() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 20);
        let previous = FilterSelection::default()
            .with(Dimension::Kingdom, "Animalia")
            .with(Dimension::Phylum, "Chordata")
            .with(Dimension::ClassName, "Aves");

        // Re-selecting the same kingdom keeps the whole chain intact.
        let outcome =
            resolver.apply_change(previous, Dimension::Kingdom, Some("Animalia".to_string()));
        assert_eq!(outcome.selection.phylum.as_deref(), Some("Chordata"));
        assert_eq!(outcome.selection.class_name.as_deref(), Some("Aves"));
    }

    #[test]
    fn test_stale_value_degrades_to_clear() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 20);
        let previous = FilterSelection::default().with(Dimension::Kingdom, "Plantae");

        // Mammalia has zero results under Plantae, so the client offering it
        // was out of date; the change degrades to clearing class_name.
        let outcome = resolver.apply_change(
            previous,
            Dimension::ClassName,
            Some("Mammalia".to_string()),
        );
        assert!(outcome.selection.class_name.is_none());
        assert_eq!(outcome.selection.kingdom.as_deref(), Some("Plantae"));
    }

    #[test]
    fn test_apply_change_is_idempotent() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 2);
        let previous = FilterSelection::default().with(Dimension::Kingdom, "Animalia");

        let first = resolver.apply_change(
            previous.clone(),
            Dimension::Phylum,
            Some("Chordata".to_string()),
        );
        let second = resolver.apply_change(
            previous,
            Dimension::Phylum,
            Some("Chordata".to_string()),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_change_resets_to_first_page() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 2);
        let at_page_three = resolver.resolve(FilterSelection::default(), 3);
        assert_eq!(at_page_three.page.page, 3);

        let outcome = resolver.apply_change(
            at_page_three.selection,
            Dimension::Query,
            Some("a".to_string()),
        );
        assert_eq!(outcome.page.page, 1);
    }

    #[test]
    fn test_resolve_sanitizes_inconsistent_deep_link() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 20);
        // Hand-edited URL: Chordata never occurs under Plantae.
        let selection = FilterSelection::default()
            .with(Dimension::Kingdom, "Plantae")
            .with(Dimension::Phylum, "Chordata")
            .with(Dimension::Organism, "Nonexistent species");

        let outcome = resolver.resolve(selection, 1);
        assert_eq!(outcome.selection.kingdom.as_deref(), Some("Plantae"));
        assert!(outcome.selection.phylum.is_none());
        assert!(outcome.selection.organism.is_none());
    }

    #[test]
    fn test_empty_selection_returns_everything() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 20);
        let outcome = resolver.resolve(FilterSelection::default(), 1);

        assert_eq!(outcome.page.total_count, records.len());
        assert_eq!(outcome.page.page, 1);
        let kingdoms = outcome.option_set(Dimension::Kingdom).unwrap();
        assert_eq!(kingdoms.options.len(), 2);
        // Results are ordered by scientific name.
        assert_eq!(outcome.page.items[0].scientific_name, "Apis mellifera");
    }

    #[test]
    fn test_clearing_a_dimension_widens_results() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 20);
        let previous = FilterSelection::default()
            .with(Dimension::Kingdom, "Animalia")
            .with(Dimension::Phylum, "Arthropoda");

        let outcome = resolver.apply_change(previous, Dimension::Phylum, None);
        assert!(outcome.selection.phylum.is_none());
        assert_eq!(outcome.page.total_count, 4);
    }
}
