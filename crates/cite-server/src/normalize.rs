//! Metadata normalization.
//!
//! Turns what users type into the reference form into a canonical
//! [`BibliographicItem`]. Everything here is pure.

use crate::error::{CitationError, CitationResult};
use crate::models::{AuthorField, BibliographicItem, FormFields, Name, YearField};

/// Parse `"Family,Given;Family,Given"` into names, in order.
///
/// Best effort and never fails: an author without a comma becomes
/// `family = <input>, given = ""`, and entries that are empty after
/// trimming are dropped.
#[must_use]
pub fn parse_author_list(raw: &str) -> Vec<Name> {
    raw.split(';')
        .filter_map(|entry| {
            let (family, given) = entry.split_once(',').unwrap_or((entry, ""));
            let name = Name::new(family.trim(), given.trim());
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

/// Map raw form fields onto a canonical item.
///
/// Blank optional fields become `None`. The year is kept only when it parses
/// as an integer; an explicit `issued` date is used when no year was typed.
#[must_use]
pub fn build_item(fields: FormFields) -> BibliographicItem {
    let authors = match fields.author {
        Some(AuthorField::Raw(raw)) => parse_author_list(&raw),
        Some(AuthorField::Names(names)) => names
            .into_iter()
            .map(|n| Name::new(n.family.trim(), n.given.trim()))
            .filter(|n| !n.is_empty())
            .collect(),
        None => Vec::new(),
    };

    let issued_year = match fields.year {
        Some(year) => parse_year(&year),
        None => fields.issued,
    };

    BibliographicItem {
        item_type: fields.item_type.unwrap_or_default(),
        title: non_blank(fields.title),
        authors,
        issued_year,
        container_title: non_blank(fields.container_title),
        pages: non_blank(fields.pages),
        publisher: non_blank(fields.publisher),
        url: non_blank(fields.url),
    }
}

/// Parse a request's `metadata` object and normalize it.
pub fn parse_metadata(metadata: serde_json::Value) -> CitationResult<BibliographicItem> {
    if !metadata.is_object() {
        return Err(CitationError::validation("metadata", "must be a JSON object"));
    }

    let fields: FormFields = serde_json::from_value(metadata)
        .map_err(|e| CitationError::validation("metadata", e.to_string()))?;

    Ok(build_item(fields))
}

fn parse_year(year: &YearField) -> Option<i32> {
    match year {
        YearField::Number(n) => i32::try_from(*n).ok(),
        YearField::Text(s) => s.trim().parse().ok(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
