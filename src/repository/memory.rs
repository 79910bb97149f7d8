//! In-memory session repository.
//!
//! This module provides a repository implementation backed by a
//! thread-safe hashmap. It honors the same passive-expiry and
//! renew-on-conflict semantics as a database-backed repository and is
//! primarily useful for development and testing environments.
//!
//! # Examples
//!
//! ```
//! use orm_session_store::MemoryRepository;
//! let repository = MemoryRepository::new();
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::RepositoryError;
use crate::record::{SessionPayload, SessionRecord, SessionUpsert};
use crate::repository::SessionRepository;

/// An in-memory [`SessionRepository`] implementation.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository(Arc<Mutex<HashMap<String, Row>>>);

#[derive(Debug, Clone)]
struct Row {
    json: SessionPayload,
    expired_at: i64,
}

impl MemoryRepository {
    /// Creates a new, empty `MemoryRepository`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of physically stored rows, including logically
    /// expired ones.
    pub async fn len(&self) -> usize {
        self.0.lock().await.len()
    }

    /// Returns `true` if no rows are stored.
    pub async fn is_empty(&self) -> bool {
        self.0.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemoryRepository {
    async fn find_one(
        &self,
        id: &str,
        now_ms: i64,
    ) -> Result<Option<SessionRecord>, RepositoryError> {
        let rows = self.0.lock().await;
        let record = rows
            .get(id)
            .filter(|row| row.expired_at > now_ms)
            .map(|row| SessionRecord {
                id: id.to_owned(),
                json: row.json.clone(),
                expired_at: row.expired_at,
            });
        Ok(record)
    }

    async fn upsert(&self, update: SessionUpsert) -> Result<(), RepositoryError> {
        let SessionUpsert {
            id,
            json,
            expired_at,
        } = update;

        let mut rows = self.0.lock().await;
        match rows.entry(id) {
            Entry::Occupied(mut entry) => {
                let row = entry.get_mut();
                if let Some(json) = json {
                    row.json = SessionPayload::Text(json);
                }
                row.expired_at = expired_at;
            }
            Entry::Vacant(entry) => {
                entry.insert(Row {
                    json: SessionPayload::Text(json.unwrap_or_else(|| "{}".to_owned())),
                    expired_at,
                });
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.0.lock().await.remove(id);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<SessionRecord>, RepositoryError> {
        let rows = self.0.lock().await;
        let records = rows
            .iter()
            .map(|(id, row)| SessionRecord {
                id: id.clone(),
                json: row.json.clone(),
                expired_at: row.expired_at,
            })
            .collect();
        Ok(records)
    }
}
