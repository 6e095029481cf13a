//! Citation service.
//!
//! Ties the catalog, the normalizer and the formatter together behind the
//! operations the HTTP layer exposes. Rendered citations are cached on
//! `(item, style id, output kind)`; the cache is dropped whenever the
//! catalog is reloaded.

use std::sync::Arc;

use moka::future::Cache;

use crate::catalog::{CatalogHandle, StyleCatalog};
use crate::config::Config;
use crate::error::{CitationError, CitationResult};
use crate::formatter::CitationFormatter;
use crate::models::{
    BibliographicItem, FormatRequest, OutputKind, Reference, StyleDescriptor, User,
};
use crate::normalize;

/// Cache key for a rendered citation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FormatKey {
    item: BibliographicItem,
    style: String,
    output: OutputKind,
}

/// A rendered citation and the kind it was rendered as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedCitation {
    pub output: OutputKind,
    pub text: String,
}

impl FormattedCitation {
    /// `{"citationHtml": ...}` or `{"citationText": ...}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(self.output.response_key().to_string(), self.text.clone().into());
        serde_json::Value::Object(body)
    }
}

/// Citation formatting operations over a shared style catalog.
#[derive(Debug, Clone)]
pub struct CitationService {
    catalog: CatalogHandle,
    formatter: CitationFormatter,
    cache: Cache<FormatKey, String>,
}

impl CitationService {
    /// Build the service from configuration, loading the style directory.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            CatalogHandle::open(&config.styles_dir),
            CitationFormatter::hayagriva(&config.locale),
            config,
        )
    }

    /// Build the service from explicit parts (custom engines, preloaded catalogs).
    #[must_use]
    pub fn with_parts(catalog: CatalogHandle, formatter: CitationFormatter, config: &Config) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Self { catalog, formatter, cache }
    }

    /// Current catalog snapshot.
    pub async fn catalog(&self) -> CitationResult<Arc<StyleCatalog>> {
        self.catalog.snapshot().await
    }

    /// All available styles.
    pub async fn list_styles(&self) -> CitationResult<Vec<StyleDescriptor>> {
        Ok(self.catalog.snapshot().await?.list_styles())
    }

    /// Render a canonical item.
    pub async fn format_item(
        &self,
        item: &BibliographicItem,
        style_id: &str,
        output: OutputKind,
    ) -> CitationResult<String> {
        // Incomplete items are rejected even when the catalog is down.
        item.ensure_complete()?;

        let key = FormatKey { item: item.clone(), style: style_id.to_string(), output };
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(style = style_id, "Citation cache hit");
            return Ok(hit);
        }

        let catalog = self.catalog.snapshot().await?;
        let rendered = self.formatter.format(&catalog, item, style_id, output)?;

        self.cache.insert(key, rendered.clone()).await;
        Ok(rendered)
    }

    /// Handle a `POST /format` body.
    pub async fn format(&self, request: FormatRequest) -> CitationResult<FormattedCitation> {
        let metadata = request
            .metadata
            .filter(|m| !m.is_null())
            .ok_or_else(|| CitationError::validation("metadata", "is required"))?;
        let style = request
            .style
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CitationError::validation("style", "is required"))?;
        let output = request.output.unwrap_or_default();

        let item = normalize::parse_metadata(metadata)?;

        tracing::info!(
            style = %style,
            output = ?output,
            authors = item.authors.len(),
            "Formatting citation"
        );

        let text = self.format_item(&item, &style, output).await?;
        Ok(FormattedCitation { output, text })
    }

    /// Render a stored reference with its own style.
    pub async fn format_reference(
        &self,
        reference: &Reference,
        output: OutputKind,
    ) -> CitationResult<String> {
        self.format_item(&reference.citation_data, &reference.formatting_style, output).await
    }

    /// Styles to offer `user`, in preference order.
    pub async fn styles_for(&self, user: &User) -> CitationResult<Vec<StyleDescriptor>> {
        Ok(user.offered_styles(&*self.catalog.snapshot().await?))
    }

    /// Rescan the style directory. Returns the number of styles now available.
    pub async fn reload(&self) -> CitationResult<usize> {
        let catalog = self.catalog.reload().await?;
        self.cache.invalidate_all();

        tracing::info!(
            dir = %self.catalog.dir().display(),
            styles = catalog.len(),
            "Dropped cached citations after style reload"
        );
        Ok(catalog.len())
    }
}
