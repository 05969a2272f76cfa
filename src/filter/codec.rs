//! Query-string codec for filter selections
//!
//! Selections are deep-linkable: the whole filter state round-trips through
//! the URL. Decoding is tolerant — unknown keys are ignored, empty values
//! mean unconstrained, and on duplicate keys the first occurrence wins — so
//! a mistyped or legacy query string degrades instead of failing the request.

use url::form_urlencoded;

use super::selection::{Dimension, FilterSelection};

/// Serialize a selection to a query string. Unconstrained dimensions are
/// omitted entirely, so `decode(encode(s)) == s` holds for every selection.
pub fn encode(selection: &FilterSelection) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for dimension in Dimension::ALL {
        if let Some(value) = selection.get(dimension) {
            serializer.append_pair(dimension.key(), value);
        }
    }
    serializer.finish()
}

/// Parse a query string into a selection, ignoring everything that is not a
/// known dimension key.
pub fn decode(query_string: &str) -> FilterSelection {
    let mut selection = FilterSelection::default();
    for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
        let Some(dimension) = Dimension::parse(&key) else {
            continue;
        };
        if selection.get(dimension).is_none() {
            selection.set(dimension, Some(value.into_owned()));
        }
    }
    selection
}

/// Extract a single non-dimension parameter (e.g. `page`, `changed`) from
/// the same query string, first occurrence wins.
pub fn decode_param(query_string: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query_string.as_bytes())
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use proptest::option;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_encode_omits_unconstrained_dimensions() {
        let selection = FilterSelection::default()
            .with(Dimension::Kingdom, "Animalia")
            .with(Dimension::Query, "milk protein");
        assert_eq!(encode(&selection), "kingdom=Animalia&query=milk+protein");
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let selection = decode("kingdom=Animalia&sort=asc&utm_source=newsletter");
        assert_eq!(selection.kingdom.as_deref(), Some("Animalia"));
        assert!(selection.phylum.is_none());
        assert!(selection.query.is_none());
    }

    #[test]
    fn test_decode_empty_value_means_unconstrained() {
        let selection = decode("kingdom=&phylum=Chordata");
        assert!(selection.kingdom.is_none());
        assert_eq!(selection.phylum.as_deref(), Some("Chordata"));
    }

    #[test]
    fn test_decode_first_duplicate_wins() {
        let selection = decode("kingdom=Animalia&kingdom=Plantae");
        assert_eq!(selection.kingdom.as_deref(), Some("Animalia"));
    }

    #[test]
    fn test_round_trip_with_reserved_characters() {
        let selection = FilterSelection::default()
            .with(Dimension::Organism, "Gallus gallus")
            .with(Dimension::Query, "50% inhibition & more");
        assert_eq!(decode(&encode(&selection)), selection);
    }

    #[test]
    fn test_decode_param_reads_page() {
        assert_eq!(
            decode_param("kingdom=Animalia&page=3", "page").as_deref(),
            Some("3")
        );
        assert_eq!(decode_param("kingdom=Animalia&page=", "page"), None);
        assert_eq!(decode_param("kingdom=Animalia", "page"), None);
    }

    fn value_strategy() -> impl Strategy<Value = Option<String>> {
        // Any non-empty printable value, including whitespace and separators
        option::of("[ -~&=+%]{1,24}".prop_filter("non-empty", |s: &String| !s.is_empty()))
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            kingdom in value_strategy(),
            phylum in value_strategy(),
            class_name in value_strategy(),
            organism in value_strategy(),
            query in value_strategy(),
        ) {
            let selection = FilterSelection {
                kingdom,
                phylum,
                class_name,
                organism,
                query,
            };
            prop_assert_eq!(decode(&encode(&selection)), selection);
        }
    }
}
