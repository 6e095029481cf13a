//! Data models for bibliographic items, styles and user-owned references.
//!
//! Canonical items serialize with CSL-JSON field names (`container-title`,
//! `URL`, `issued`) so they can be handed to any CSL processor.

pub mod account;
mod inputs;
mod item;
mod style;

pub use account::{PreferredStyles, Reference, ReferenceDraft, User, VerifiedIdentity};
pub use inputs::{AuthorField, FormFields, FormatRequest, YearField};
pub use item::{BibliographicItem, ItemType, Name};
pub use style::{OutputKind, StyleDescriptor};
