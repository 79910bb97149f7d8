//! Store lifecycle notifications.
//!
//! Instead of an ambient event bus, the store pushes lifecycle events into
//! a bounded channel that the owning process subscribes to at startup via
//! [`SessionStore::subscribe`](crate::store::SessionStore::subscribe).
//! Events are best-effort: when nothing consumes the channel they are
//! dropped with a log line rather than blocking a data operation.

use crate::error::SessionStoreError;

/// Capacity of the store's event channel.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A lifecycle notification emitted by the store.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum StoreEvent {
    /// The store was bound to a repository and is ready for use.
    Connected,
    /// A repository operation failed and no error handler was configured
    /// to consume the failure.
    Disconnected(SessionStoreError),
}
