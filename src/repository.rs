//! The outbound persistence contract.
//!
//! A [`SessionRepository`] is the seam between the store and a concrete
//! ORM or driver. The store issues one repository call per logical
//! operation and owns no consistency machinery of its own: atomicity of
//! `upsert` and idempotency of `delete` are repository guarantees.

pub mod memory;

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::record::{SessionRecord, SessionUpsert};

/// Point lookup, upsert, delete and full scan against the session table.
///
/// Implementations are expected to be cheap to share (`Arc`) and safe to
/// call concurrently; the store never serializes same-id operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Looks up the row with the given id, filtered to `expired_at >
    /// now_ms`. A logically expired row must be reported as absent even
    /// though it may still physically exist (passive expiry).
    async fn find_one(
        &self,
        id: &str,
        now_ms: i64,
    ) -> Result<Option<SessionRecord>, RepositoryError>;

    /// Inserts the row, or renews an existing row (including a logically
    /// expired one) in place. Must be atomic with respect to concurrent
    /// callers: no lookup-then-insert races. A `json` of `None` renews the
    /// expiry only.
    async fn upsert(&self, update: SessionUpsert) -> Result<(), RepositoryError>;

    /// Deletes the row with the given id. Deleting a missing id succeeds.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Fetches every stored row.
    async fn find_all(&self) -> Result<Vec<SessionRecord>, RepositoryError>;
}
