//! Organism listing with cascading taxonomy filters
//!
//! One stateless handler serves the full page, the partial update and the
//! selection-delta protocol. Every response embeds the resolved selection
//! and the full option sets as JSON, so the client rebuilds its filter
//! widgets from scratch and a late-arriving response still yields a
//! consistent UI.

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::Html,
};
use serde_json::json;

use peptide_catalog::database::OrganismRepository;
use peptide_catalog::filter::{
    decode, decode_param, encode, CascadeResolver, Dimension, FilterOutcome,
};

use crate::render::page_context;
use crate::routes::wants_partial;
use crate::state::AppState;

pub async fn organism_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Result<Html<String>, StatusCode> {
    let query_string = raw.unwrap_or_default();

    let repo = OrganismRepository::new(state.pool.clone());
    let records = repo.list_all().await.map_err(|e| {
        tracing::error!(error = %e, "failed to load organism snapshot");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let resolver = CascadeResolver::new(&records, state.config.page_size);
    let outcome = resolve_request(&resolver, &query_string);
    let selection = &outcome.selection;

    let context = json!({
        "page": page_context(&outcome.page),
        "organisms": outcome.page.items,
        "query": selection.query,
        "query_string": encode(selection),
        // Machine-readable payload for the client-side widget rebuild
        "filter_data": {
            "selection": selection,
            "options": outcome.options,
        },
    });

    let template = if wants_partial(&headers) {
        "organism_results"
    } else {
        "organism_list"
    };

    state.templates.render(template, &context).map(Html).map_err(|e| {
        tracing::error!(template, error = %e, "template render failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Decode the query string and run it through the resolver. A request
/// carrying `changed=<dimension>` is a selection delta: the changed field's
/// value in the query string is the new value, the remaining fields are the
/// previous selection, and the result returns to page 1. Anything else is a
/// plain (deep-link or pagination) request.
fn resolve_request(resolver: &CascadeResolver<'_>, query_string: &str) -> FilterOutcome {
    let selection = decode(query_string);
    let changed = decode_param(query_string, "changed")
        .as_deref()
        .and_then(Dimension::parse);

    match changed {
        Some(dimension) => {
            let new_value = selection.get(dimension).map(str::to_string);
            let mut previous = selection;
            previous.set(dimension, None);
            resolver.apply_change(previous, dimension, new_value)
        }
        None => {
            let page = decode_param(query_string, "page")
                .and_then(|p| p.parse::<usize>().ok())
                .unwrap_or(1);
            resolver.resolve(selection, page)
        }
    }
}

#[cfg(test)]
mod tests {
    use peptide_catalog::models::Organism;

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
            org("Apis mellifera", "Animalia", "Arthropoda", "Insecta"),
            org("Zea mays", "Plantae", "Streptophyta", "Magnoliopsida"),
        ]
    }

    #[test]
    fn test_delta_request_applies_downstream_invalidation() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 20);
        // The client switched kingdom to Plantae while phylum still showed
        // the old Chordata value.
        let outcome = resolve_request(
            &resolver,
            "kingdom=Plantae&phylum=Chordata&changed=kingdom",
        );

        assert_eq!(outcome.selection.kingdom.as_deref(), Some("Plantae"));
        assert!(outcome.selection.phylum.is_none());
        assert_eq!(outcome.page.page, 1);
    }

    #[test]
    fn test_plain_request_honors_page_parameter() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 1);
        let outcome = resolve_request(&resolver, "page=2");
        assert_eq!(outcome.page.page, 2);

        // Unparseable page numbers default to the first page.
        let outcome = resolve_request(&resolver, "page=abc");
        assert_eq!(outcome.page.page, 1);
    }

    #[test]
    fn test_unknown_changed_dimension_is_ignored() {
        let records = records();
        let resolver = CascadeResolver::new(&records, 20);
        let outcome = resolve_request(&resolver, "kingdom=Animalia&changed=sort");
        assert_eq!(outcome.selection.kingdom.as_deref(), Some("Animalia"));
        assert_eq!(outcome.page.total_count, 2);
    }
}
