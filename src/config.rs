//! Store configuration.

use std::fmt;
use std::sync::Arc;

use crate::error::SessionStoreError;
use crate::store::SessionStore;
use crate::ttl::Ttl;

/// A callback invoked with the store and the failure when a repository
/// operation fails.
pub type ErrorHandler = Arc<dyn Fn(&SessionStore, &SessionStoreError) + Send + Sync>;

/// What to do with a repository failure besides returning it to the
/// caller.
///
/// Every repository failure travels both channels: it is returned from the
/// failing operation *and* routed through this policy, so operational
/// monitoring stays decoupled from per-call control flow.
#[derive(Clone, Default)]
pub enum ErrorPolicy {
    /// Forward the failure as a
    /// [`StoreEvent::Disconnected`](crate::events::StoreEvent::Disconnected)
    /// on the store's event channel.
    #[default]
    Notify,
    /// Invoke the configured handler. No event is emitted.
    Handler(ErrorHandler),
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notify => f.write_str("Notify"),
            Self::Handler(_) => f.debug_tuple("Handler").field(&"..").finish(),
        }
    }
}

/// Options accepted by [`SessionStore::with_config`].
///
/// # Examples
///
/// ```
/// use orm_session_store::{SessionStoreConfig, Ttl};
///
/// let config = SessionStoreConfig::new()
///     .ttl(Ttl::Fixed(3600))
///     .on_error(|_store, error| eprintln!("session store failure: {error}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionStoreConfig {
    /// TTL policy for `set` and `touch`; cookie `maxAge` and then the
    /// one-day default apply when absent.
    pub ttl: Option<Ttl>,
    /// Where repository failures go besides the caller.
    pub on_error: ErrorPolicy,
}

impl SessionStoreConfig {
    /// Creates the default configuration: no TTL override, failures
    /// forwarded to the event channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TTL policy.
    #[must_use]
    pub fn ttl(mut self, ttl: impl Into<Ttl>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    /// Routes repository failures to the given handler instead of the
    /// event channel.
    #[must_use]
    pub fn on_error(
        mut self,
        handler: impl Fn(&SessionStore, &SessionStoreError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = ErrorPolicy::Handler(Arc::new(handler));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_notifies() {
        let config = SessionStoreConfig::new();
        assert!(config.ttl.is_none());
        assert!(matches!(config.on_error, ErrorPolicy::Notify));
    }

    #[test]
    fn builder_sets_ttl_and_handler() {
        let config = SessionStoreConfig::new().ttl(60).on_error(|_, _| {});
        assert!(matches!(config.ttl, Some(Ttl::Fixed(60))));
        assert!(matches!(config.on_error, ErrorPolicy::Handler(_)));
    }
}
