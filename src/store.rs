//! The session store.
//!
//! [`SessionStore`] translates middleware lifecycle calls into repository
//! operations, applying the TTL policy and payload serialization, and
//! routes repository failures both to the caller and to the configured
//! error policy.

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::Utc;
use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::config::{ErrorPolicy, SessionStoreConfig};
use crate::data::SessionData;
use crate::error::SessionStoreError;
use crate::events::{EVENT_CHANNEL_CAPACITY, StoreEvent};
use crate::record::SessionUpsert;
use crate::repository::SessionRepository;
use crate::ttl::{DEFAULT_TTL_SECS, Ttl};

/// A session persistence adapter between an HTTP session middleware and a
/// repository-backed session table.
///
/// The store is constructed first and bound to a concrete repository with
/// [`connect`](Self::connect); invoking a data operation on an unbound
/// store is a programming error and panics. Once connected the store is
/// immutable and safe to share behind an `Arc`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use orm_session_store::{MemoryRepository, SessionData, SessionStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), orm_session_store::SessionStoreError> {
/// let store = SessionStore::new();
/// store.connect(Arc::new(MemoryRepository::new()));
///
/// let mut data = SessionData::new();
/// data.insert("user_name", "world");
/// store.set("session-1", &data).await?;
/// assert!(store.get("session-1").await?.is_some());
/// # Ok(())
/// # }
/// ```
pub struct SessionStore {
    repository: OnceLock<Arc<dyn SessionRepository>>,
    config: SessionStoreConfig,
    events: mpsc::Sender<StoreEvent>,
    receiver: Mutex<Option<mpsc::Receiver<StoreEvent>>>,
}

impl SessionStore {
    /// Creates an unconnected store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionStoreConfig::default())
    }

    /// Creates an unconnected store with the given configuration.
    #[must_use]
    pub fn with_config(config: SessionStoreConfig) -> Self {
        let (events, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            repository: OnceLock::new(),
            config,
            events,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    /// Binds the store to a concrete repository and emits
    /// [`StoreEvent::Connected`].
    ///
    /// The binding is set once for the lifetime of the store.
    ///
    /// # Panics
    ///
    /// Panics if the store is already connected.
    pub fn connect(&self, repository: Arc<dyn SessionRepository>) -> &Self {
        assert!(
            self.repository.set(repository).is_ok(),
            "session store is already connected to a repository"
        );
        tracing::debug!("session store connected");
        self.emit(StoreEvent::Connected);
        self
    }

    /// Takes the receiving end of the store's lifecycle event channel.
    ///
    /// There is a single receiver; the first caller gets it and later
    /// calls return `None`. Subscribe before [`connect`](Self::connect) to
    /// observe the `Connected` event. While nothing consumes the channel,
    /// events are dropped once it fills up.
    pub fn subscribe(&self) -> Option<mpsc::Receiver<StoreEvent>> {
        self.receiver
            .lock()
            .expect("session store event receiver lock poisoned")
            .take()
    }

    /// Fetches the session with the given id.
    ///
    /// An absent or logically expired record yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Repository`] if the lookup fails and
    /// [`SessionStoreError::Decode`] if the stored payload is not a valid
    /// session document. Either failure is also routed through the error
    /// policy.
    ///
    /// # Panics
    ///
    /// Panics if the store is not connected.
    pub async fn get(&self, id: &str) -> Result<Option<SessionData>, SessionStoreError> {
        tracing::debug!(id, "session get");

        let found = match self.repository().find_one(id, now_ms()).await {
            Ok(found) => found,
            Err(error) => return Err(self.report(error.into())),
        };
        let Some(record) = found else {
            return Ok(None);
        };

        match record.json.decode() {
            Ok(data) => Ok(Some(data)),
            Err(error) => Err(self.report(SessionStoreError::Decode(error.to_string()))),
        }
    }

    /// Stores the session data under the given id, inserting a new row or
    /// renewing an existing one (even a logically expired one) in place.
    ///
    /// The payload is serialized before anything else; a serialization
    /// failure is a pure failure with no repository call and no partial
    /// write.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Encode`] if the payload cannot be
    /// serialized (reported to the caller only) and
    /// [`SessionStoreError::Repository`] if the upsert fails (also routed
    /// through the error policy).
    ///
    /// # Panics
    ///
    /// Panics if the store is not connected.
    pub async fn set(&self, id: &str, data: &SessionData) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string(data)
            .map_err(|error| SessionStoreError::Encode(error.to_string()))?;
        let ttl_secs = self.resolve_ttl(data, Some(id));
        tracing::debug!(id, ttl_secs, "session set");

        let update = SessionUpsert {
            id: id.to_owned(),
            json: Some(json),
            expired_at: expiry_from(ttl_secs),
        };
        match self.repository().upsert(update).await {
            Ok(()) => Ok(()),
            Err(error) => Err(self.report(error.into())),
        }
    }

    /// Deletes the sessions with the given id or ids.
    ///
    /// Deletions are issued concurrently and all of them are awaited
    /// before completion is reported; deleting a missing id is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Repository`] carrying the first
    /// failure once every deletion has settled; the failure is also routed
    /// through the error policy.
    ///
    /// # Panics
    ///
    /// Panics if the store is not connected.
    pub async fn destroy(&self, ids: impl Into<SessionIds>) -> Result<(), SessionStoreError> {
        let ids = ids.into();
        tracing::debug!(?ids, "session destroy");

        let repository = self.repository();
        let results = join_all(ids.as_slice().iter().map(|id| repository.delete(id))).await;
        for result in results {
            if let Err(error) = result {
                return Err(self.report(error.into()));
            }
        }
        Ok(())
    }

    /// Renews the stored expiry of the session with the given id, leaving
    /// its payload untouched.
    ///
    /// When the session cookie carries an explicit `expires` value the
    /// middleware owns the deadline: the call reports success immediately
    /// and makes no repository call. Note that this path does not confirm
    /// the underlying row still exists or is unexpired.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Repository`] if the renewal fails,
    /// also routed through the error policy.
    ///
    /// # Panics
    ///
    /// Panics if the store is not connected.
    pub async fn touch(&self, id: &str, data: &SessionData) -> Result<(), SessionStoreError> {
        if data.cookie.expires.is_some() {
            tracing::debug!(id, "session touch skipped, cookie has explicit expiry");
            return Ok(());
        }

        let ttl_secs = self.resolve_ttl(data, None);
        tracing::debug!(id, ttl_secs, "session touch");

        let update = SessionUpsert {
            id: id.to_owned(),
            json: None,
            expired_at: expiry_from(ttl_secs),
        };
        match self.repository().upsert(update).await {
            Ok(()) => Ok(()),
            Err(error) => Err(self.report(error.into())),
        }
    }

    /// Fetches every stored session, with each decoded payload carrying
    /// its originating record id in the reserved `id` field.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Repository`] if the scan fails and
    /// [`SessionStoreError::Decode`] if any payload is invalid; either
    /// failure is also routed through the error policy.
    ///
    /// # Panics
    ///
    /// Panics if the store is not connected.
    pub async fn all(&self) -> Result<Vec<SessionData>, SessionStoreError> {
        tracing::debug!("session scan");

        let records = match self.repository().find_all().await {
            Ok(records) => records,
            Err(error) => return Err(self.report(error.into())),
        };

        let mut sessions = Vec::with_capacity(records.len());
        for record in records {
            let mut data = match record.json.decode() {
                Ok(data) => data,
                Err(error) => {
                    return Err(self.report(SessionStoreError::Decode(error.to_string())));
                }
            };
            data.id = Some(record.id);
            sessions.push(data);
        }
        Ok(sessions)
    }

    fn repository(&self) -> &dyn SessionRepository {
        self.repository
            .get()
            .expect("session store used before connect(); bind a repository first")
            .as_ref()
    }

    /// Resolves the TTL in seconds for a write: a configured policy wins,
    /// then the cookie's `maxAge`, then the one-day default.
    fn resolve_ttl(&self, data: &SessionData, id: Option<&str>) -> i64 {
        match &self.config.ttl {
            Some(Ttl::Fixed(seconds)) => *seconds,
            Some(Ttl::Computed(f)) => f(self, data, id),
            None => match data.cookie.max_age {
                // Floor semantics, also for negative remaining lifetimes.
                Some(max_age_ms) => max_age_ms.div_euclid(1000),
                None => DEFAULT_TTL_SECS,
            },
        }
    }

    /// Routes a failure through the error policy and hands it back for the
    /// caller, so both channels observe it.
    fn report(&self, error: SessionStoreError) -> SessionStoreError {
        tracing::debug!(%error, "repository operation failed");
        match &self.config.on_error {
            ErrorPolicy::Handler(handler) => handler(self, &error),
            ErrorPolicy::Notify => self.emit(StoreEvent::Disconnected(error.clone())),
        }
        error
    }

    fn emit(&self, event: StoreEvent) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "store event channel full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                tracing::debug!(?event, "store event channel closed, dropping event");
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("connected", &self.repository.get().is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// One or more session identifiers accepted by
/// [`SessionStore::destroy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIds {
    /// A single identifier.
    One(String),
    /// An ordered list of identifiers.
    Many(Vec<String>),
}

impl SessionIds {
    /// Views the identifiers as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(id) => std::slice::from_ref(id),
            Self::Many(ids) => ids,
        }
    }
}

impl From<&str> for SessionIds {
    fn from(id: &str) -> Self {
        Self::One(id.to_owned())
    }
}

impl From<String> for SessionIds {
    fn from(id: String) -> Self {
        Self::One(id)
    }
}

impl From<Vec<String>> for SessionIds {
    fn from(ids: Vec<String>) -> Self {
        Self::Many(ids)
    }
}

impl From<Vec<&str>> for SessionIds {
    fn from(ids: Vec<&str>) -> Self {
        Self::Many(ids.into_iter().map(str::to_owned).collect())
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn expiry_from(ttl_secs: i64) -> i64 {
    now_ms().saturating_add(ttl_secs.saturating_mul(1000))
}
