//! ORM-backed session persistence for HTTP session middleware.
//!
//! This crate provides a [`SessionStore`] that stores, retrieves,
//! refreshes and expires opaque session records in a relational session
//! table reached through a [`SessionRepository`]. The middleware owns the
//! session shape and the session ids; the repository owns SQL, pooling and
//! transactional consistency. What lives here is the contract between the
//! two: TTL and expiry policy, payload serialization (including rows
//! written before the payload column was stringified), and dual-channel
//! error routing.
//!
//! Expiry is passive: a row whose `expiredAt` has passed is never returned
//! by a lookup, but deleting it is left to external garbage collection.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use orm_session_store::{
//!     MemoryRepository, SessionData, SessionStore, SessionStoreConfig, Ttl,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), orm_session_store::SessionStoreError> {
//! let store = SessionStore::with_config(SessionStoreConfig::new().ttl(Ttl::Fixed(3600)));
//! store.connect(Arc::new(MemoryRepository::new()));
//!
//! let mut data = SessionData::new();
//! data.insert("user_name", "world");
//!
//! store.set("session-1", &data).await?;
//! let loaded = store.get("session-1").await?.expect("session was stored");
//! assert_eq!(loaded.get("user_name").and_then(|v| v.as_str()), Some("world"));
//!
//! store.destroy("session-1").await?;
//! assert!(store.get("session-1").await?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod record;
pub mod repository;
pub mod store;
pub mod ttl;

pub use crate::config::{ErrorHandler, ErrorPolicy, SessionStoreConfig};
pub use crate::data::{SessionCookie, SessionData};
pub use crate::error::{RepositoryError, SessionStoreError};
pub use crate::events::StoreEvent;
pub use crate::record::{SessionPayload, SessionRecord, SessionUpsert};
pub use crate::repository::SessionRepository;
pub use crate::repository::memory::MemoryRepository;
pub use crate::store::{SessionIds, SessionStore};
pub use crate::ttl::{DEFAULT_TTL_SECS, Ttl, TtlFn};
