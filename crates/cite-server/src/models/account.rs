//! Users and their stored references.
//!
//! Persistence lives in the document database; these types carry the
//! invariants the citation pipeline relies on (owner scoping, style
//! preferences).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BibliographicItem, StyleDescriptor};
use crate::catalog::StyleCatalog;
use crate::config::defaults;
use crate::error::{CitationError, CitationResult};

/// Identity tuple returned by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifiedIdentity {
    /// Provider-side subject id.
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Ordered set of style ids, in the user's order of preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PreferredStyles(Vec<String>);

impl PreferredStyles {
    /// Add a style at the end unless already present. Returns true if added.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Remove a style. Returns true if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|s| s != id);
        self.0.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for PreferredStyles {
    fn default() -> Self {
        Self(vec![defaults::DEFAULT_STYLE.to_string()])
    }
}

impl From<Vec<String>> for PreferredStyles {
    fn from(ids: Vec<String>) -> Self {
        let mut styles = Self(Vec::with_capacity(ids.len()));
        for id in ids {
            styles.insert(id);
        }
        styles
    }
}

impl From<PreferredStyles> for Vec<String> {
    fn from(styles: PreferredStyles) -> Self {
        styles.0
    }
}

/// An application user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    /// Subject id at the identity provider.
    pub external_identity_id: String,

    pub email: String,

    pub name: String,

    #[serde(default)]
    pub picture_url: Option<String>,

    /// Styles offered when formatting a reference.
    #[serde(default)]
    pub preferred_styles: PreferredStyles,

    /// Provider refresh credential. Never serialized.
    #[serde(skip_serializing, default)]
    pub refresh_credential: Option<String>,
}

impl User {
    /// Create a user from a freshly verified identity.
    #[must_use]
    pub fn from_identity(identity: VerifiedIdentity, refresh_credential: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_identity_id: identity.id,
            email: identity.email,
            name: identity.name,
            picture_url: identity.picture,
            preferred_styles: PreferredStyles::default(),
            refresh_credential,
        }
    }

    /// Preferred styles that exist in the catalog, in preference order.
    ///
    /// Preferences naming styles that were removed from the style directory
    /// are skipped rather than reported.
    #[must_use]
    pub fn offered_styles(&self, catalog: &StyleCatalog) -> Vec<StyleDescriptor> {
        self.preferred_styles
            .iter()
            .filter_map(|id| catalog.resolve_style(id).ok())
            .map(|definition| definition.descriptor.clone())
            .collect()
    }
}

/// Editable part of a reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDraft {
    pub citation_data: BibliographicItem,

    /// Style id used when rendering this reference.
    pub formatting_style: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

/// A reference saved by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub citation_data: BibliographicItem,
    pub formatting_style: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

impl Reference {
    /// Create a reference owned by `owner_id`.
    #[must_use]
    pub fn new(owner_id: Uuid, draft: ReferenceDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            citation_data: draft.citation_data,
            formatting_style: draft.formatting_style,
            url: draft.url,
            notes: draft.notes,
            created_at: now,
            last_edited: now,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Replace all editable fields on behalf of `user_id`.
    ///
    /// A reference owned by someone else is reported as not found so its
    /// existence does not leak.
    pub fn edit(&mut self, user_id: Uuid, draft: ReferenceDraft) -> CitationResult<()> {
        if !self.is_owned_by(user_id) {
            return Err(CitationError::reference_not_found(self.id.to_string()));
        }

        self.citation_data = draft.citation_data;
        self.formatting_style = draft.formatting_style;
        self.url = draft.url;
        self.notes = draft.notes;
        self.last_edited = Utc::now();
        Ok(())
    }
}

/// References visible to `user_id`.
pub fn owned_by(
    references: &[Reference],
    user_id: Uuid,
) -> impl Iterator<Item = &Reference> + '_ {
    references.iter().filter(move |r| r.is_owned_by(user_id))
}
