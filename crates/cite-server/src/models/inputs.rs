//! Request payloads as sent by the web layer.
//!
//! These are deliberately loose: the reference form posts whatever the user
//! typed. The normalizer turns them into a [`BibliographicItem`](super::BibliographicItem).

use serde::{Deserialize, Serialize};

use super::{ItemType, Name, OutputKind};

/// Raw form fields for a single reference.
///
/// Unknown keys are rejected so typos surface as client errors instead of
/// silently dropped data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormFields {
    /// Reference kind (defaults to a journal article).
    #[serde(rename = "type", default)]
    pub item_type: Option<ItemType>,

    /// Title as typed.
    #[serde(default)]
    pub title: Option<String>,

    /// Authors, either `"Family,Given;Family,Given"` or structured names.
    #[serde(default, alias = "authors")]
    pub author: Option<AuthorField>,

    /// Publication year as typed ("1952") or as a number.
    #[serde(default)]
    pub year: Option<YearField>,

    /// Pre-built CSL-JSON date, used when no `year` is given.
    #[serde(default, with = "super::item::date_parts")]
    pub issued: Option<i32>,

    /// Journal or book title.
    #[serde(
        rename = "container-title",
        alias = "containerTitle",
        alias = "journal",
        default
    )]
    pub container_title: Option<String>,

    /// Page range.
    #[serde(rename = "page", alias = "pages", default)]
    pub pages: Option<String>,

    /// Publisher name.
    #[serde(default)]
    pub publisher: Option<String>,

    /// Link to the work.
    #[serde(alias = "URL", default)]
    pub url: Option<String>,
}

/// Author input: a raw string to parse or an already structured list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    /// `"Smith,John;Doe,Jane"`
    Raw(String),
    /// `[{"family": "Smith", "given": "John"}]`
    Names(Vec<Name>),
}

/// Year input as a number or free text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Number(i64),
    Text(String),
}

/// Body of `POST /format`.
///
/// `metadata` and `style` are optional at the type level so that their
/// absence is reported as a validation error rather than a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatRequest {
    /// Raw metadata object, parsed into [`FormFields`].
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    /// Style id.
    #[serde(default)]
    pub style: Option<String>,

    /// Output kind (defaults to HTML).
    #[serde(default)]
    pub output: Option<OutputKind>,
}
