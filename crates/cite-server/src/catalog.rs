//! Style catalog.
//!
//! A [`StyleCatalog`] is an immutable snapshot of the style directory taken
//! at load time. [`CatalogHandle`] shares the current snapshot between
//! requests and replaces it wholesale on reload, so readers always see
//! either the old table or the new one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::config::defaults;
use crate::error::{CitationError, CitationResult};
use crate::models::StyleDescriptor;

/// One style file.
#[derive(Debug, Clone)]
pub struct StyleDefinition {
    pub descriptor: StyleDescriptor,

    /// CSL XML, handed to the engine as-is.
    pub source: Arc<str>,
}

impl StyleDefinition {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

/// Immutable snapshot of the style directory.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    dir: PathBuf,
    styles: BTreeMap<String, StyleDefinition>,
    loaded_at: DateTime<Utc>,
}

impl StyleCatalog {
    /// Scan `dir` for `<id>.csl` files.
    ///
    /// Individual files that cannot be read are skipped with a warning; a
    /// directory that cannot be listed is an error.
    pub fn load(dir: impl AsRef<Path>) -> CitationResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CitationError::catalog_unavailable(format!("{}: {e}", dir.display()))
        })?;

        let mut styles = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|e| {
                CitationError::catalog_unavailable(format!("{}: {e}", dir.display()))
            })?;
            let path = entry.path();

            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(defaults::STYLE_EXTENSION)
            {
                continue;
            }

            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                tracing::warn!(path = %path.display(), "Skipping style with non UTF-8 name");
                continue;
            };

            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable style");
                    continue;
                }
            };

            let label = style_title(&source).unwrap_or_else(|| id.clone());
            styles.insert(
                id.clone(),
                StyleDefinition {
                    descriptor: StyleDescriptor::new(id, label),
                    source: source.into(),
                },
            );
        }

        tracing::info!(dir = %dir.display(), styles = styles.len(), "Loaded style catalog");

        Ok(Self { dir: dir.to_path_buf(), styles, loaded_at: Utc::now() })
    }

    /// All styles, sorted by id.
    #[must_use]
    pub fn list_styles(&self) -> Vec<StyleDescriptor> {
        self.styles.values().map(|s| s.descriptor.clone()).collect()
    }

    /// Exact, case-sensitive lookup.
    pub fn resolve_style(&self, id: &str) -> CitationResult<&StyleDefinition> {
        self.styles.get(id).ok_or_else(|| CitationError::style_not_found(id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// `<info><title>` of a CSL document.
fn style_title(source: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(source).ok()?;
    let info = doc.root_element().children().find(|n| n.has_tag_name("info"))?;
    let title = info.children().find(|n| n.has_tag_name("title"))?.text()?.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// State of the shared catalog.
#[derive(Debug)]
enum Snapshot {
    Ready(Arc<StyleCatalog>),
    /// The directory has never been readable; holds the last error.
    Unavailable(String),
}

/// Shared handle to the current catalog snapshot.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    dir: PathBuf,
    current: Arc<RwLock<Snapshot>>,
}

impl CatalogHandle {
    /// Load the initial snapshot from `dir`.
    ///
    /// An unreadable directory does not fail construction: lookups report
    /// [`CitationError::CatalogUnavailable`] until a reload succeeds.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let snapshot = match StyleCatalog::load(&dir) {
            Ok(catalog) => Snapshot::Ready(Arc::new(catalog)),
            Err(e) => {
                tracing::error!(dir = %dir.display(), error = %e, "Style catalog unavailable");
                Snapshot::Unavailable(e.to_string())
            }
        };
        Self { dir, current: Arc::new(RwLock::new(snapshot)) }
    }

    /// Wrap an already loaded snapshot.
    #[must_use]
    pub fn new(catalog: StyleCatalog) -> Self {
        Self {
            dir: catalog.dir.clone(),
            current: Arc::new(RwLock::new(Snapshot::Ready(Arc::new(catalog)))),
        }
    }

    /// Directory scanned on reload.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The current snapshot. Holding it keeps that version alive across a reload.
    pub async fn snapshot(&self) -> CitationResult<Arc<StyleCatalog>> {
        match &*self.current.read().await {
            Snapshot::Ready(catalog) => Ok(Arc::clone(catalog)),
            Snapshot::Unavailable(reason) => Err(CitationError::catalog_unavailable(reason.clone())),
        }
    }

    /// Rescan the directory and swap in the new snapshot.
    ///
    /// On failure the previous snapshot, if any, stays in place.
    pub async fn reload(&self) -> CitationResult<Arc<StyleCatalog>> {
        let dir = self.dir.clone();
        let catalog = tokio::task::spawn_blocking(move || StyleCatalog::load(dir))
            .await
            .map_err(|e| CitationError::catalog_unavailable(format!("reload task failed: {e}")))?
            .inspect_err(|e| tracing::warn!(error = %e, "Style catalog reload failed"))?;

        let catalog = Arc::new(catalog);
        *self.current.write().await = Snapshot::Ready(Arc::clone(&catalog));

        tracing::info!(styles = catalog.len(), "Style catalog reloaded");
        Ok(catalog)
    }
}
