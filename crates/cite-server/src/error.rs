//! Error types for the citation service.
//!
//! Uses `thiserror` for structured error handling. Every variant maps to a
//! distinct HTTP status so callers can tell their own mistakes apart from
//! server-side failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from catalog lookup, metadata validation and rendering.
#[derive(thiserror::Error, Debug)]
pub enum CitationError {
    /// A required request field is missing or malformed.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// No style definition matches the requested id.
    #[error("Style not found: {id}")]
    StyleNotFound {
        /// The requested style id
        id: String,
    },

    /// No reference with this id is visible to the caller.
    #[error("Reference not found: {id}")]
    ReferenceNotFound {
        /// The requested reference id
        id: String,
    },

    /// The item has neither a title nor any authors.
    #[error("Citation data must include at least a title or one author")]
    IncompleteItem,

    /// The CSL engine rejected the style or the item.
    #[error("Rendering failed: {0}")]
    RenderingFailure(String),

    /// The style directory could not be read.
    #[error("Style catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Missing or wrong bearer token on an administrative route.
    #[error("Unauthorized")]
    Unauthorized,
}

impl CitationError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create a style not found error.
    #[must_use]
    pub fn style_not_found(id: impl Into<String>) -> Self {
        Self::StyleNotFound { id: id.into() }
    }

    /// Create a reference not found error.
    #[must_use]
    pub fn reference_not_found(id: impl Into<String>) -> Self {
        Self::ReferenceNotFound { id: id.into() }
    }

    /// Create a rendering failure.
    #[must_use]
    pub fn rendering(message: impl Into<String>) -> Self {
        Self::RenderingFailure(message.into())
    }

    /// Create a catalog unavailable error.
    #[must_use]
    pub fn catalog_unavailable(message: impl Into<String>) -> Self {
        Self::CatalogUnavailable(message.into())
    }

    /// HTTP status for this error kind.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::StyleNotFound { .. } | Self::IncompleteItem => {
                StatusCode::BAD_REQUEST
            }
            Self::ReferenceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RenderingFailure(_) | Self::CatalogUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns true if the caller can fix this by changing the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Convert to a user-friendly message for the response body.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            Self::StyleNotFound { id } => {
                format!("Unknown citation style '{id}'. Use GET /styles to list available styles.")
            }
            Self::RenderingFailure(_) => {
                "The citation could not be rendered with the selected style.".to_string()
            }
            Self::CatalogUnavailable(_) => "Citation styles are currently unavailable.".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for CitationError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Citation request failed");
        } else {
            tracing::debug!(error = %self, "Rejected citation request");
        }

        (status, Json(serde_json::json!({ "error": self.to_user_message() }))).into_response()
    }
}

/// Result type alias for citation operations.
pub type CitationResult<T> = Result<T, CitationError>;
