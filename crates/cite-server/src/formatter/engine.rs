//! hayagriva-backed CSL engine.
//!
//! Items are mapped onto hayagriva entries field by field. User text goes in
//! as plain string chunks, never through hayagriva's string syntax, so `$`,
//! braces and " and " inside names survive unchanged.

use hayagriva::citationberg::{IndependentStyle, Locale, LocaleCode};
use hayagriva::types::{
    Date, EntryType, FormatString, MaybeTyped, PageRanges, Person, Publisher, QualifiedUrl,
};
use hayagriva::{
    BibliographyDriver, BibliographyRequest, BufWriteFormat, CitationItem, CitationRequest,
    ElemChild, ElemChildren, Entry,
};

use super::CslEngine;
use crate::catalog::StyleDefinition;
use crate::error::{CitationError, CitationResult};
use crate::models::{BibliographicItem, ItemType, Name, OutputKind};

/// Key of the single entry handed to the driver.
const ENTRY_KEY: &str = "item";

/// CSL engine backed by `hayagriva`.
pub struct HayagrivaEngine {
    locale: LocaleCode,
    locale_files: Vec<Locale>,
}

impl HayagrivaEngine {
    /// Engine rendering every entry in `locale` (e.g. "en-US").
    #[must_use]
    pub fn new(locale: &str) -> Self {
        Self { locale: LocaleCode(locale.to_string()), locale_files: hayagriva::archive::locales() }
    }

    fn parse_style(style: &StyleDefinition) -> CitationResult<IndependentStyle> {
        IndependentStyle::from_xml(&style.source).map_err(|e| {
            CitationError::rendering(format!(
                "style '{}' is not an independent CSL style: {e}",
                style.id()
            ))
        })
    }
}

impl CslEngine for HayagrivaEngine {
    fn name(&self) -> &'static str {
        "hayagriva"
    }

    fn render(
        &self,
        item: &BibliographicItem,
        style: &StyleDefinition,
        output: OutputKind,
    ) -> CitationResult<String> {
        let csl = Self::parse_style(style)?;
        let entry = to_entry(item)?;

        let mut driver = BibliographyDriver::new();
        driver.citation(CitationRequest::new(
            vec![CitationItem::with_entry(&entry)],
            &csl,
            Some(self.locale.clone()),
            &self.locale_files,
            None,
        ));

        let mut rendered = driver.finish(BibliographyRequest {
            style: &csl,
            locale: Some(self.locale.clone()),
            locale_files: &self.locale_files,
        });

        let format = match output {
            OutputKind::Html => BufWriteFormat::Html,
            OutputKind::Text => BufWriteFormat::Plain,
        };

        let html = output == OutputKind::Html;
        let mut buf = String::new();
        let written = match rendered.bibliography.as_mut() {
            Some(bibliography) => {
                let entry = bibliography.items.first_mut().ok_or_else(|| {
                    CitationError::rendering("engine produced an empty bibliography")
                })?;

                // Numeric styles put the label ("[1]") in a separate field.
                if let Some(first) = entry.first_field.as_mut() {
                    if html {
                        escape_child(first);
                    }
                    first.write_buf(&mut buf, format).map_err(|e| {
                        CitationError::rendering(format!("cannot write entry label: {e}"))
                    })?;
                    buf.push(' ');
                }
                if html {
                    escape_children(&mut entry.content);
                }
                write_children(&mut buf, &entry.content, format)
            }
            // Styles without a <bibliography> still define a citation layout.
            None => {
                let citation = rendered.citations.first_mut().ok_or_else(|| {
                    CitationError::rendering("engine produced neither bibliography nor citation")
                })?;
                if html {
                    escape_children(&mut citation.citation);
                }
                write_children(&mut buf, &citation.citation, format)
            }
        };
        written?;

        let text = buf.trim().to_string();
        if text.is_empty() {
            return Err(CitationError::rendering(format!(
                "style '{}' rendered an empty entry",
                style.id()
            )));
        }
        Ok(text)
    }
}

fn write_children(
    buf: &mut String,
    children: &ElemChildren,
    format: BufWriteFormat,
) -> CitationResult<()> {
    children
        .write_buf(buf, format)
        .map_err(|e| CitationError::rendering(format!("cannot write rendered entry: {e}")))
}

/// Escape text leaves in place before HTML serialization.
///
/// hayagriva writes text verbatim between its own `<span>`/`<div>` tags.
fn escape_children(children: &mut ElemChildren) {
    for child in &mut children.0 {
        escape_child(child);
    }
}

fn escape_child(child: &mut ElemChild) {
    match child {
        ElemChild::Text(formatted) => formatted.text = escape_html(&formatted.text),
        ElemChild::Elem(elem) => escape_children(&mut elem.children),
        ElemChild::Markup(markup) => *markup = escape_html(markup),
        ElemChild::Link { text, url } => {
            text.text = escape_html(&text.text);
            *url = escape_html(url);
        }
        ElemChild::Transparent { .. } => {}
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// hayagriva entry type and parent type used for `container-title`.
const fn entry_types(kind: ItemType) -> (EntryType, EntryType) {
    match kind {
        ItemType::ArticleJournal => (EntryType::Article, EntryType::Periodical),
        ItemType::Book => (EntryType::Book, EntryType::Book),
        ItemType::Chapter => (EntryType::Chapter, EntryType::Book),
        ItemType::Report => (EntryType::Report, EntryType::Book),
        ItemType::Thesis => (EntryType::Thesis, EntryType::Book),
        ItemType::Webpage => (EntryType::Web, EntryType::Web),
        ItemType::PaperConference => (EntryType::Article, EntryType::Proceedings),
        ItemType::Patent => (EntryType::Patent, EntryType::Misc),
        ItemType::PersonalCommunication => (EntryType::Misc, EntryType::Misc),
    }
}

/// User text as a single plain chunk, bypassing hayagriva's `$math$` and
/// `{verbatim}` syntax.
fn plain(value: &str) -> FormatString {
    FormatString::with_value(value)
}

/// Structured person; the family part is never split on " and " or commas.
fn person(name: &Name) -> Person {
    let (family, given) = if name.family.is_empty() {
        (name.given.clone(), None)
    } else {
        (name.family.clone(), Some(name.given.clone()).filter(|g| !g.is_empty()))
    };

    Person { name: family, given_name: given, prefix: None, suffix: None, alias: None }
}

fn page_range(pages: &str) -> MaybeTyped<PageRanges> {
    pages
        .parse::<PageRanges>()
        .map_or_else(|_| MaybeTyped::String(pages.to_string()), MaybeTyped::Typed)
}

/// Convert a canonical item into a hayagriva entry.
fn to_entry(item: &BibliographicItem) -> CitationResult<Entry> {
    let (entry_type, parent_type) = entry_types(item.item_type);
    let mut entry = Entry::new(ENTRY_KEY, entry_type);

    if let Some(title) = &item.title {
        entry.set_title(plain(title));
    }
    let authors: Vec<Person> =
        item.authors.iter().filter(|n| !n.is_empty()).map(person).collect();
    if !authors.is_empty() {
        entry.set_authors(authors);
    }
    if let Some(year) = item.issued_year {
        entry.set_date(Date::from_year(year));
    }
    if let Some(pages) = &item.pages {
        entry.set_page_range(page_range(pages));
    }
    if let Some(publisher) = &item.publisher {
        entry.set_publisher(Publisher::new(Some(plain(publisher)), None));
    }
    if let Some(url) = &item.url {
        let value = url::Url::parse(url)
            .map_err(|e| CitationError::rendering(format!("engine rejected URL '{url}': {e}")))?;
        entry.set_url(QualifiedUrl { value, visit_date: None });
    }
    if let Some(container) = &item.container_title {
        let mut parent = Entry::new(&format!("{ENTRY_KEY}-parent"), parent_type);
        parent.set_title(plain(container));
        entry.set_parents(vec![parent]);
    }

    Ok(entry)
}
