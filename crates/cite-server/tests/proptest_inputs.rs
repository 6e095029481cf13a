//! Property-based tests for metadata normalization.

use proptest::prelude::*;
use serde_json::json;

use cite_server::models::{BibliographicItem, Name};
use cite_server::normalize::{parse_author_list, parse_metadata};

/// A name part without separators or surrounding whitespace.
fn arb_part() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z .'-]{0,15}[A-Za-z]"
}

fn arb_names() -> impl Strategy<Value = Vec<Name>> {
    proptest::collection::vec((arb_part(), arb_part()), 0..6)
        .prop_map(|pairs| pairs.into_iter().map(|(f, g)| Name::new(f, g)).collect())
}

proptest! {
    /// Well-formed author strings come back in order.
    #[test]
    fn author_list_preserves_order(names in arb_names()) {
        let raw = names
            .iter()
            .map(|n| format!("{},{}", n.family, n.given))
            .collect::<Vec<_>>()
            .join(";");

        prop_assert_eq!(parse_author_list(&raw), names);
    }

    /// Parsing never panics and never yields an empty name.
    #[test]
    fn author_list_never_yields_empty_names(raw in ".{0,200}") {
        for name in parse_author_list(&raw) {
            prop_assert!(!name.is_empty());
            prop_assert_eq!(name.family.trim(), name.family.as_str());
            prop_assert_eq!(name.given.trim(), name.given.as_str());
        }
    }

    /// Separators and whitespace alone produce no authors.
    #[test]
    fn separators_only_yield_nothing(raw in "[;, \t]{0,30}") {
        prop_assert!(parse_author_list(&raw).is_empty());
    }

    /// Objects of free-text fields always normalize.
    #[test]
    fn metadata_with_text_fields_normalizes(
        title in ".{0,40}",
        author in ".{0,40}",
        year in ".{0,8}",
    ) {
        let item = parse_metadata(json!({"title": title, "author": author, "year": year}));
        let item: BibliographicItem = item.unwrap();

        prop_assert_eq!(item.title.is_some(), !title.trim().is_empty());
        prop_assert_eq!(item.issued_year, year.trim().parse::<i32>().ok());
    }
}
