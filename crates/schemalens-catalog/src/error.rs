//! Error types for catalog population and reduction

use schemalens_core::ObjectKind;

use crate::provider::ProviderError;

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by catalog operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A reducer was passed for a kind it does not reduce
    #[error("Cannot reduce {kind} with a reducer for {reducer_kind}")]
    ReducerKindMismatch { kind: ObjectKind, reducer_kind: ObjectKind },
}

/// Errors that abandon a crawl
///
/// Every provider failure surfaces as [`CrawlError::Provider`], carrying the
/// step that failed and the original cause.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("Could not retrieve {operation}: {source}")]
    Provider {
        operation: &'static str,
        #[source]
        source: ProviderError,
    },
}

impl CrawlError {
    /// Name of the population step that failed
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Provider { operation, .. } => operation,
        }
    }
}
