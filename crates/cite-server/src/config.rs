//! Configuration for the citation service.

use std::path::PathBuf;
use std::time::Duration;

/// Default configuration values.
pub mod defaults {
    use std::time::Duration;

    /// Directory scanned for `<id>.csl` style files.
    pub const STYLES_DIR: &str = "styles";

    /// File extension of style definitions.
    pub const STYLE_EXTENSION: &str = "csl";

    /// Locale used for every rendered entry.
    pub const LOCALE: &str = "en-US";

    /// Style offered to users who have not chosen any.
    pub const DEFAULT_STYLE: &str = "apa";

    /// HTTP port.
    pub const PORT: u16 = 5000;

    /// Rendered-citation cache TTL (10 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(600);

    /// Maximum number of cached rendered citations.
    pub const CACHE_MAX_SIZE: u64 = 10_000;

    /// Per-request timeout enforced by the HTTP layer.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the style definitions.
    pub styles_dir: PathBuf,

    /// Locale passed to the CSL engine.
    pub locale: String,

    /// Bearer token guarding administrative routes (optional).
    pub admin_token: Option<String>,

    /// Rendered-citation cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Config {
    /// Create a new configuration for the given style directory.
    #[must_use]
    pub fn new(styles_dir: impl Into<PathBuf>, admin_token: Option<String>) -> Self {
        Self {
            styles_dir: styles_dir.into(),
            locale: defaults::LOCALE.to_string(),
            admin_token,
            cache_ttl: defaults::CACHE_TTL,
            cache_max_size: defaults::CACHE_MAX_SIZE,
            request_timeout: defaults::REQUEST_TIMEOUT,
        }
    }

    /// Create a test configuration with caching disabled.
    #[must_use]
    pub fn for_testing(styles_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_ttl: Duration::from_secs(0),
            cache_max_size: 0,
            request_timeout: Duration::from_secs(5),
            ..Self::new(styles_dir, None)
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `CITE_STYLES_DIR`, `CITE_LOCALE` and `CITE_ADMIN_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let styles_dir =
            std::env::var("CITE_STYLES_DIR").unwrap_or_else(|_| defaults::STYLES_DIR.to_string());
        let admin_token = std::env::var("CITE_ADMIN_TOKEN").ok().filter(|t| !t.is_empty());

        let mut config = Self::new(styles_dir, admin_token);
        if let Ok(locale) = std::env::var("CITE_LOCALE") {
            config = config.with_locale(locale)?;
        }
        Ok(config)
    }

    /// Override the rendering locale.
    ///
    /// # Errors
    ///
    /// Returns error if the locale is blank.
    pub fn with_locale(mut self, locale: impl Into<String>) -> anyhow::Result<Self> {
        let locale = locale.into();
        let locale = locale.trim();
        anyhow::ensure!(!locale.is_empty(), "locale must not be empty");
        self.locale = locale.to_string();
        Ok(self)
    }

    /// Check if administrative routes require a token.
    #[must_use]
    pub const fn has_admin_token(&self) -> bool {
        self.admin_token.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(defaults::STYLES_DIR, None)
    }
}
