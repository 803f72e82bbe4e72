//! Error types for catalog loading.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while building a [`SignalCatalog`](crate::SignalCatalog) from data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A pattern string failed to compile.
    #[error("Invalid pattern '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Catalog JSON could not be parsed.
    #[error("Invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The marker table has no row for the fallback language.
    #[error("Marker table must contain the fallback language '{0}'")]
    MissingFallbackLanguage(String),

    /// A phrase set contains a blank entry.
    #[error("Empty phrase in '{set}'")]
    EmptyPhrase { set: String },

    /// Sentence-length bounds are inverted.
    #[error("Invalid sentence length range {min}..={max}")]
    InvalidSentenceRange { min: usize, max: usize },
}
