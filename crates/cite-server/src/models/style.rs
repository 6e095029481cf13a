//! Style descriptors and output kinds.

use serde::{Deserialize, Serialize};

/// A catalog entry as shown to users.
///
/// Serialized as `{"label": ..., "value": ...}` for select widgets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleDescriptor {
    /// Catalog key, the style file name without extension.
    #[serde(rename = "value")]
    pub id: String,

    /// Display name.
    pub label: String,
}

impl StyleDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

/// Rendered output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// HTML with inline styling (`<span style="font-style: italic;">`, ...) and
    /// escaped text.
    #[default]
    Html,
    /// Plain text without markup.
    Text,
}

impl OutputKind {
    /// Response body key carrying the rendered citation.
    #[must_use]
    pub const fn response_key(self) -> &'static str {
        match self {
            Self::Html => "citationHtml",
            Self::Text => "citationText",
        }
    }
}
