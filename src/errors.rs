use thiserror::Error;

/// Custom error types for the Taxon system
#[derive(Debug, Error)]
pub enum TaxonError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Remote request failed: {0}")]
    RemoteRequestError(String),

    #[error("System error: {0}")]
    SystemError(String),
}

/// Result type specific to Taxon operations
pub type TaxonResult<T> = Result<T, TaxonError>;

impl TaxonError {
    /// True for failures of the service boundary, where re-issuing the same
    /// action is reasonable without any local state change first
    pub fn is_remote(&self) -> bool {
        matches!(self, TaxonError::RemoteRequestError(_))
    }
}
