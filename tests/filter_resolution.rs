//! End-to-end behavior of the cascading filter core: decode a query string,
//! resolve it against a catalog snapshot, apply deltas, paginate.

use peptide_catalog::filter::{
    build_options, decode, encode, slice, CascadeResolver, Dimension, FilterSelection,
};
use peptide_catalog::models::Organism;

fn org(name: &str, common: Option<&str>, kingdom: &str, phylum: &str, class_name: &str) -> Organism {
    Organism {
        scientific_name: name.to_string(),
        common_name: common.map(str::to_string),
        kingdom: Some(kingdom.to_string()),
        phylum: Some(phylum.to_string()),
        class_name: Some(class_name.to_string()),
        ncbi_url: None,
    }
}

/// Two kingdoms, three phyla, five classes — enough structure for cascades
fn catalog() -> Vec<Organism> {
    vec![
        org("Bos taurus", Some("cattle"), "Animalia", "Chordata", "Mammalia"),
        org("Homo sapiens", Some("human"), "Animalia", "Chordata", "Mammalia"),
        org("Gallus gallus", Some("chicken"), "Animalia", "Chordata", "Aves"),
        org("Apis mellifera", Some("honey bee"), "Animalia", "Arthropoda", "Insecta"),
        org("Bombyx mori", Some("silk moth"), "Animalia", "Arthropoda", "Insecta"),
        org("Zea mays", Some("maize"), "Plantae", "Streptophyta", "Magnoliopsida"),
        org("Oryza sativa", Some("rice"), "Plantae", "Streptophyta", "Liliopsida"),
    ]
}

#[test]
fn selection_round_trips_through_the_query_string() {
    let selection = FilterSelection::default()
        .with(Dimension::Kingdom, "Animalia")
        .with(Dimension::Phylum, "Chordata")
        .with(Dimension::Organism, "Bos taurus")
        .with(Dimension::Query, "milk & whey");
    assert_eq!(decode(&encode(&selection)), selection);
}

#[test]
fn every_offered_option_has_results() {
    let records = catalog();
    let selections = [
        FilterSelection::default(),
        FilterSelection::default().with(Dimension::Kingdom, "Animalia"),
        FilterSelection::default()
            .with(Dimension::Kingdom, "Animalia")
            .with(Dimension::Phylum, "Arthropoda"),
        FilterSelection::default().with(Dimension::Query, "bee"),
    ];

    for selection in selections {
        for dimension in Dimension::ALL {
            let set = build_options(&records, &selection, dimension);
            assert!(
                set.options.iter().all(|o| o.count >= 1),
                "zero-count option offered for {:?}",
                dimension
            );
        }
    }
}

#[test]
fn changing_kingdom_clears_foreign_phylum_and_class() {
    let records = catalog();
    let resolver = CascadeResolver::new(&records, 20);
    let previous = FilterSelection::default()
        .with(Dimension::Kingdom, "Animalia")
        .with(Dimension::Phylum, "Chordata")
        .with(Dimension::ClassName, "Mammalia");

    let outcome = resolver.apply_change(previous, Dimension::Kingdom, Some("Plantae".to_string()));

    assert_eq!(
        outcome.selection,
        FilterSelection::default().with(Dimension::Kingdom, "Plantae")
    );
    // And the result page reflects only the new kingdom.
    assert_eq!(outcome.page.total_count, 2);
    assert!(outcome
        .page
        .items
        .iter()
        .all(|o| o.kingdom.as_deref() == Some("Plantae")));
}

#[test]
fn changing_any_filter_resets_to_page_one() {
    let records = catalog();
    let resolver = CascadeResolver::new(&records, 2);

    let parked = resolver.resolve(FilterSelection::default(), 3);
    assert_eq!(parked.page.page, 3);

    let outcome = resolver.apply_change(
        parked.selection,
        Dimension::Query,
        Some("cattle".to_string()),
    );
    assert_eq!(outcome.page.page, 1);
    assert_eq!(outcome.page.total_count, 1);
}

#[test]
fn out_of_range_page_clamps_to_last() {
    let items: Vec<u32> = (0..25).collect();
    let page = slice(&items, 10, 999);
    assert_eq!(page.page, 3);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn applying_the_same_change_twice_is_idempotent() {
    let records = catalog();
    let resolver = CascadeResolver::new(&records, 20);
    let previous = FilterSelection::default().with(Dimension::Kingdom, "Animalia");

    let first = resolver.apply_change(
        previous.clone(),
        Dimension::ClassName,
        Some("Insecta".to_string()),
    );
    let second = resolver.apply_change(
        previous,
        Dimension::ClassName,
        Some("Insecta".to_string()),
    );

    assert_eq!(first.selection, second.selection);
    assert_eq!(first.page, second.page);
    assert_eq!(first.options, second.options);
}

#[test]
fn empty_selection_lists_the_whole_catalog() {
    let records = catalog();
    let resolver = CascadeResolver::new(&records, 20);
    let outcome = resolver.resolve(FilterSelection::default(), 1);

    assert_eq!(outcome.page.total_count, records.len());
    assert_eq!(outcome.page.page, 1);

    let kingdoms = outcome.option_set(Dimension::Kingdom).unwrap();
    let counts: Vec<(&str, usize)> = kingdoms
        .options
        .iter()
        .map(|o| (o.value.as_str(), o.count))
        .collect();
    assert_eq!(counts, vec![("Animalia", 5), ("Plantae", 2)]);
}

#[test]
fn deep_link_with_stale_state_degrades_gracefully() {
    let records = catalog();
    let resolver = CascadeResolver::new(&records, 20);

    // A bookmarked URL from before the data changed: unknown key, foreign
    // phylum, organism that no longer exists, page out of range.
    let qs = "kingdom=Plantae&phylum=Chordata&organism=Canis+lupus&highlight=1&query=maize";
    let selection = decode(qs);
    let outcome = resolver.resolve(selection, 42);

    assert_eq!(outcome.selection.kingdom.as_deref(), Some("Plantae"));
    assert!(outcome.selection.phylum.is_none());
    assert!(outcome.selection.organism.is_none());
    assert_eq!(outcome.selection.query.as_deref(), Some("maize"));
    assert_eq!(outcome.page.page, 1);
    assert_eq!(outcome.page.total_count, 1);
    assert_eq!(outcome.page.items[0].scientific_name, "Zea mays");
}

#[test]
fn option_counts_follow_the_rest_of_the_selection() {
    let records = catalog();
    let resolver = CascadeResolver::new(&records, 20);
    let outcome = resolver.resolve(
        FilterSelection::default()
            .with(Dimension::Kingdom, "Animalia")
            .with(Dimension::Phylum, "Arthropoda"),
        1,
    );

    // Class options are narrowed by kingdom and phylum...
    let classes = outcome.option_set(Dimension::ClassName).unwrap();
    assert_eq!(classes.options.len(), 1);
    assert_eq!(classes.options[0].value, "Insecta");
    assert_eq!(classes.options[0].count, 2);

    // ...while phylum options ignore the phylum constraint itself, so the
    // sibling Chordata stays switchable.
    let phyla = outcome.option_set(Dimension::Phylum).unwrap();
    assert!(phyla.contains("Chordata"));
    assert!(phyla.contains("Arthropoda"));
}
