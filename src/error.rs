//! Store error types.

use std::error::Error;

use thiserror::Error;

/// Errors surfaced by [`SessionStore`](crate::store::SessionStore)
/// operations.
///
/// The variants carry rendered messages rather than source errors so that
/// a failure can be cloned into the store's event channel in addition to
/// being returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    /// Session data could not be serialized into its stored form. Reported
    /// to the caller only; no repository call is made.
    #[error("session store: failed to encode session data: {0}")]
    Encode(String),
    /// A stored payload could not be decoded into session data.
    #[error("session store: failed to decode session data: {0}")]
    Decode(String),
    /// The underlying repository reported a failure.
    #[error("session store: repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for SessionStoreError {
    fn from(error: RepositoryError) -> Self {
        Self::Repository(error.to_string())
    }
}

/// A failure reported by a [`SessionRepository`] implementation.
///
/// Concrete repositories wrap whatever their ORM or driver raises.
///
/// # Examples
///
/// ```
/// use orm_session_store::RepositoryError;
///
/// let error = RepositoryError::new(std::io::Error::other("connection reset"));
/// assert!(error.to_string().contains("connection reset"));
/// ```
///
/// [`SessionRepository`]: crate::repository::SessionRepository
#[derive(Debug, Error)]
#[error(transparent)]
pub struct RepositoryError(#[from] Box<dyn Error + Send + Sync>);

impl RepositoryError {
    /// Wraps an arbitrary driver-level error.
    pub fn new(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_error_converts_with_message() {
        let error = RepositoryError::new(std::io::Error::other("deadlock detected"));
        let store_error = SessionStoreError::from(error);
        assert!(matches!(store_error, SessionStoreError::Repository(_)));
        assert!(store_error.to_string().contains("deadlock detected"));
    }
}
