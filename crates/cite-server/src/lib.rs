//! Citation formatting service.
//!
//! Renders bibliography entries for a reference manager: users pick a CSL
//! style, type in the metadata of a work, and get back one formatted entry
//! as HTML or plain text.
//!
//! # Pipeline
//!
//! - **Catalog**: `<id>.csl` files in a style directory, loaded into an
//!   immutable snapshot and swapped wholesale on reload
//! - **Normalizer**: loose form fields become a CSL-JSON item
//! - **Formatter**: the item and style go to a CSL engine (hayagriva)
//! - **Service**: request validation and a rendered-citation cache
//!
//! # Example
//!
//! ```no_run
//! use cite_server::{CitationService, Config, models::FormatRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = CitationService::new(&Config::from_env()?);
//!
//!     let request: FormatRequest = serde_json::from_value(serde_json::json!({
//!         "metadata": {"title": "On Growth", "author": "Turing,Alan", "year": "1952"},
//!         "style": "apa"
//!     }))?;
//!     println!("{}", service.format(request).await?.text);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod normalize;
pub mod server;
pub mod service;

pub use catalog::{CatalogHandle, StyleCatalog};
pub use config::Config;
pub use error::{CitationError, CitationResult};
pub use formatter::{CitationFormatter, CslEngine};
pub use service::CitationService;
