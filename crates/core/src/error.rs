/// Classified failure of a storage operation.
///
/// Every backend maps its driver errors into one of these variants before
/// returning, so callers of [`MovieStore`](crate::store::MovieStore) only
/// ever see a status and a payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Service Unavailable: Database is still connecting")]
    NotReady,

    #[error("Movie not found")]
    NotFound,

    #[error("No movies found")]
    NoMovies,

    #[error("Invalid ID format")]
    InvalidId,

    #[error("Invalid genre")]
    InvalidGenre,

    /// The detail is for logs only; the display text is fixed.
    #[error("Internal server error")]
    Internal(String),
}

/// Convenience alias for fallible backend operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// HTTP status code this error surfaces as.
    pub fn status(&self) -> u16 {
        match self {
            StoreError::NotReady => 503,
            StoreError::NotFound | StoreError::NoMovies => 404,
            StoreError::InvalidId | StoreError::InvalidGenre => 400,
            StoreError::Internal(_) => 500,
        }
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        StoreError::Internal(detail.to_string())
    }
}
