//! Persisted session row shapes.
//!
//! The field names used on the wire (`id`, `json`, `expiredAt`) are part
//! of the storage contract: repositories map them onto the session table,
//! and rows written by earlier store implementations must keep decoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::SessionData;

/// A session row as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque identifier supplied by the middleware; primary key.
    pub id: String,
    /// The serialized session payload.
    pub json: SessionPayload,
    /// Absolute expiry in epoch milliseconds. Rows past this instant are
    /// filtered out on lookup but not proactively deleted.
    #[serde(rename = "expiredAt")]
    pub expired_at: i64,
}

/// The stored payload column.
///
/// Rows written before the column was stringified hold a structured JSON
/// object rather than a JSON document in a string; both decode to the same
/// [`SessionData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionPayload {
    /// A JSON document held in a string column.
    Text(String),
    /// A pre-migration structured value, stored as-is.
    Structured(Map<String, Value>),
}

impl SessionPayload {
    /// Decodes the payload into middleware-owned session data.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if the stored payload
    /// is not a valid session document.
    pub fn decode(&self) -> Result<SessionData, serde_json::Error> {
        match self {
            Self::Text(json) => serde_json::from_str(json),
            Self::Structured(map) => serde_json::from_value(Value::Object(map.clone())),
        }
    }
}

/// The write shape handed to [`SessionRepository::upsert`].
///
/// `json: None` renews the row's expiry without touching its payload.
///
/// [`SessionRepository::upsert`]: crate::repository::SessionRepository::upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUpsert {
    /// Identifier of the row to insert or renew.
    pub id: String,
    /// New payload, or `None` for an expiry-only renewal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
    /// New absolute expiry in epoch milliseconds.
    #[serde(rename = "expiredAt")]
    pub expired_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_payload_decodes() {
        let payload = SessionPayload::Text(r#"{"cookie":{},"user":"alice"}"#.to_owned());
        let data = payload.decode().unwrap();
        assert_eq!(data.get("user").and_then(|v| v.as_str()), Some("alice"));
    }

    #[test]
    fn structured_payload_decodes() {
        let row = r#"{"id":"s1","json":{"cookie":{"maxAge":1000},"user":"bob"},"expiredAt":42}"#;
        let record: SessionRecord = serde_json::from_str(row).unwrap();
        assert!(matches!(record.json, SessionPayload::Structured(_)));

        let data = record.json.decode().unwrap();
        assert_eq!(data.cookie.max_age, Some(1000));
        assert_eq!(data.get("user").and_then(|v| v.as_str()), Some("bob"));
    }

    #[test]
    fn string_column_decodes_as_text() {
        let row = r#"{"id":"s1","json":"{\"cookie\":{}}","expiredAt":42}"#;
        let record: SessionRecord = serde_json::from_str(row).unwrap();
        assert!(matches!(record.json, SessionPayload::Text(_)));
        assert_eq!(record.expired_at, 42);
    }

    #[test]
    fn invalid_text_payload_fails_to_decode() {
        let payload = SessionPayload::Text("not json".to_owned());
        assert!(payload.decode().is_err());
    }
}
