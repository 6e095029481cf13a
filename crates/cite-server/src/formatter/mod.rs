//! Citation formatting.
//!
//! [`CitationFormatter`] enforces the preconditions (complete item, known
//! style, well-formed fields) and hands the work to a [`CslEngine`]. The CSL
//! rules themselves are never evaluated here.

mod engine;

use std::sync::Arc;

pub use self::engine::HayagrivaEngine;
use crate::catalog::{StyleCatalog, StyleDefinition};
use crate::error::CitationResult;
use crate::models::{BibliographicItem, OutputKind};

/// A CSL processor able to render one bibliography entry.
///
/// Implementations must be deterministic: the same item, style and output
/// kind always yield the same string.
pub trait CslEngine: Send + Sync {
    /// Engine name for logs.
    fn name(&self) -> &'static str;

    /// Render `item` as a single bibliography entry.
    ///
    /// Fails with [`CitationError::RenderingFailure`](crate::error::CitationError::RenderingFailure)
    /// when the style or the item is rejected.
    fn render(
        &self,
        item: &BibliographicItem,
        style: &StyleDefinition,
        output: OutputKind,
    ) -> CitationResult<String>;
}

/// Formats canonical items against styles from a catalog snapshot.
#[derive(Clone)]
pub struct CitationFormatter {
    engine: Arc<dyn CslEngine>,
}

impl CitationFormatter {
    #[must_use]
    pub fn new(engine: Arc<dyn CslEngine>) -> Self {
        Self { engine }
    }

    /// Formatter backed by hayagriva with the given locale.
    #[must_use]
    pub fn hayagriva(locale: &str) -> Self {
        Self::new(Arc::new(HayagrivaEngine::new(locale)))
    }

    /// Render `item` with the style `style_id`.
    ///
    /// Checks run in a fixed order: an incomplete item is rejected before
    /// the style is looked up, and nothing reaches the engine until both
    /// pass.
    pub fn format(
        &self,
        catalog: &StyleCatalog,
        item: &BibliographicItem,
        style_id: &str,
        output: OutputKind,
    ) -> CitationResult<String> {
        item.ensure_complete()?;
        let style = catalog.resolve_style(style_id)?;
        item.validate()?;

        let rendered = self.engine.render(item, style, output)?;

        tracing::debug!(
            engine = self.engine.name(),
            style = style_id,
            output = ?output,
            len = rendered.len(),
            "Rendered citation"
        );

        Ok(rendered)
    }
}

impl std::fmt::Debug for CitationFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationFormatter").field("engine", &self.engine.name()).finish()
    }
}
