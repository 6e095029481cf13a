//! Canonical bibliographic item in CSL-JSON shape.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CitationError, CitationResult};

/// Page ranges may only contain these characters ("12-19", "iv, 3–7", "A1.2").
static PAGES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z\-\u{2013},. ]+$").expect("valid pages pattern"));

/// Publication years the renderer can print as a plain Gregorian year.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Kind of referenced work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    /// Journal article.
    #[default]
    ArticleJournal,
    Book,
    /// Chapter in an edited book.
    Chapter,
    Report,
    Thesis,
    Webpage,
    /// Paper published in conference proceedings.
    PaperConference,
    Patent,
    /// Letter, email or interview.
    PersonalCommunication,
}

impl ItemType {
    /// CSL-JSON name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ArticleJournal => "article-journal",
            Self::Book => "book",
            Self::Chapter => "chapter",
            Self::Report => "report",
            Self::Thesis => "thesis",
            Self::Webpage => "webpage",
            Self::PaperConference => "paper-conference",
            Self::Patent => "patent",
            Self::PersonalCommunication => "personal-communication",
        }
    }
}

/// A personal name split into family and given parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Name {
    /// Family name (surname).
    #[serde(default)]
    pub family: String,

    /// Given name(s).
    #[serde(default)]
    pub given: String,
}

impl Name {
    /// Create a name from its parts.
    #[must_use]
    pub fn new(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self { family: family.into(), given: given.into() }
    }

    /// Both parts are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.family.is_empty() && self.given.is_empty()
    }
}

/// A bibliographic item as submitted to the CSL engine.
///
/// Optional fields are `None` when unset, never empty strings, so the
/// renderer can tell "not provided" apart from "provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BibliographicItem {
    /// Reference kind.
    #[serde(rename = "type", default)]
    pub item_type: ItemType,

    /// Title of the work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Authors in citation order.
    #[serde(rename = "author", default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Name>,

    /// Year of publication, `{"date-parts": [[year]]}` on the wire.
    #[serde(
        rename = "issued",
        default,
        skip_serializing_if = "Option::is_none",
        with = "date_parts"
    )]
    pub issued_year: Option<i32>,

    /// Journal or book title.
    #[serde(rename = "container-title", default, skip_serializing_if = "Option::is_none")]
    pub container_title: Option<String>,

    /// Free-form page range.
    #[serde(rename = "page", default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,

    /// Publisher name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Link to the work.
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl BibliographicItem {
    /// At least a title or one author is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.title.is_some() || self.authors.iter().any(|a| !a.is_empty())
    }

    /// Fail with [`CitationError::IncompleteItem`] unless [`Self::is_complete`].
    pub fn ensure_complete(&self) -> CitationResult<()> {
        if self.is_complete() { Ok(()) } else { Err(CitationError::IncompleteItem) }
    }

    /// Check field shapes the engine cannot be trusted to reject cleanly.
    pub fn validate(&self) -> CitationResult<()> {
        if let Some(year) = self.issued_year {
            if !YEAR_RANGE.contains(&year) {
                return Err(CitationError::validation(
                    "issued",
                    format!(
                        "year {year} is outside {}..={}",
                        YEAR_RANGE.start(),
                        YEAR_RANGE.end()
                    ),
                ));
            }
        }

        if let Some(pages) = &self.pages {
            if !PAGES_PATTERN.is_match(pages) {
                return Err(CitationError::validation(
                    "page",
                    "may only contain digits, letters, dashes, commas, periods and spaces",
                ));
            }
        }

        if let Some(url) = &self.url {
            url::Url::parse(url).map_err(|e| {
                CitationError::validation("URL", format!("'{url}' is not an absolute URL ({e})"))
            })?;
        }

        Ok(())
    }
}

/// Serde helpers for the CSL-JSON `{"date-parts": [[year, month, day]]}` shape.
///
/// Only the year of the first date is kept. Year parts may be numbers or
/// numeric strings, both of which appear in CSL-JSON in the wild.
pub(crate) mod date_parts {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct DateParts {
        #[serde(rename = "date-parts")]
        date_parts: Vec<Vec<DatePart>>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum DatePart {
        Number(i64),
        Text(String),
    }

    impl DatePart {
        fn year(&self) -> Option<i32> {
            match self {
                Self::Number(n) => i32::try_from(*n).ok(),
                Self::Text(s) => s.trim().parse().ok(),
            }
        }
    }

    pub fn serialize<S: Serializer>(year: &Option<i32>, serializer: S) -> Result<S::Ok, S::Error> {
        match year {
            Some(year) => DateParts { date_parts: vec![vec![DatePart::Number(i64::from(*year))]] }
                .serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
        let Some(parts) = Option::<DateParts>::deserialize(deserializer)? else {
            return Ok(None);
        };

        match parts.date_parts.first().and_then(|date| date.first()) {
            None => Ok(None),
            Some(part) => part
                .year()
                .map(Some)
                .ok_or_else(|| D::Error::custom("date-parts year must be an integer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_item_type_wire_names() {
        let ty: ItemType = serde_json::from_value(json!("paper-conference")).unwrap();
        assert_eq!(ty, ItemType::PaperConference);
        assert_eq!(ItemType::PersonalCommunication.as_str(), "personal-communication");
        assert_eq!(serde_json::to_value(ItemType::Webpage).unwrap(), json!("webpage"));
    }

    #[test]
    fn test_issued_year_encoded_as_date_parts() {
        let item = BibliographicItem {
            title: Some("On Growth".into()),
            issued_year: Some(1952),
            ..Default::default()
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["issued"], json!({"date-parts": [[1952]]}));
        assert!(value.get("author").is_none(), "empty authors are omitted");
        assert!(value.get("URL").is_none());
    }

    #[test]
    fn test_date_parts_accepts_string_year_and_full_dates() {
        let item: BibliographicItem = serde_json::from_value(json!({
            "title": "x",
            "issued": {"date-parts": [["2003", 4, 12]]}
        }))
        .unwrap();
        assert_eq!(item.issued_year, Some(2003));

        let item: BibliographicItem =
            serde_json::from_value(json!({"title": "x", "issued": {"date-parts": [[]]}})).unwrap();
        assert_eq!(item.issued_year, None);
    }

    #[test]
    fn test_date_parts_rejects_non_numeric_year() {
        let result = serde_json::from_value::<BibliographicItem>(json!({
            "title": "x",
            "issued": {"date-parts": [["spring"]]}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = serde_json::from_value::<BibliographicItem>(json!({
            "title": "x",
            "abstract": "not supported"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_completeness() {
        assert!(!BibliographicItem::default().is_complete());

        let only_blank_author =
            BibliographicItem { authors: vec![Name::default()], ..Default::default() };
        assert!(!only_blank_author.is_complete());

        let authored =
            BibliographicItem { authors: vec![Name::new("Turing", "Alan")], ..Default::default() };
        assert!(authored.is_complete());
        assert!(matches!(
            BibliographicItem::default().ensure_complete(),
            Err(CitationError::IncompleteItem)
        ));
    }

    #[test]
    fn test_validate_pages() {
        let mut item = BibliographicItem { title: Some("x".into()), ..Default::default() };
        for ok in ["37-72", "iv, 3\u{2013}7", "A1.2", "e1001"] {
            item.pages = Some(ok.into());
            assert!(item.validate().is_ok(), "{ok} should be accepted");
        }

        item.pages = Some("12<script>".into());
        assert!(matches!(item.validate(), Err(CitationError::Validation { field, .. }) if field == "page"));
    }

    #[test]
    fn test_validate_year_range() {
        let mut item = BibliographicItem { title: Some("x".into()), ..Default::default() };
        for ok in [1, 1952, 9999] {
            item.issued_year = Some(ok);
            assert!(item.validate().is_ok(), "{ok} should be accepted");
        }
        for bad in [0, -44, 10_000, i32::MAX] {
            item.issued_year = Some(bad);
            assert!(
                matches!(item.validate(), Err(CitationError::Validation { ref field, .. }) if field == "issued"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_url() {
        let mut item = BibliographicItem {
            title: Some("x".into()),
            url: Some("https://doi.org/10.1098/rstb.1952.0012".into()),
            ..Default::default()
        };
        assert!(item.validate().is_ok());

        item.url = Some("not a url".into());
        assert!(matches!(item.validate(), Err(CitationError::Validation { field, .. }) if field == "URL"));
    }
}
