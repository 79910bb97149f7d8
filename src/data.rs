//! Middleware-owned session state.
//!
//! The session middleware treats the session as a bag of arbitrary
//! JSON-compatible values plus a reserved `cookie` sub-object. The store
//! never interprets the payload beyond the cookie fields driving the TTL
//! policy and the reserved `id` field attached by
//! [`SessionStore::all`](crate::store::SessionStore::all).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded session state as exchanged with the session middleware.
///
/// All keys other than `cookie` and `id` pass through the store opaquely
/// via the flattened `values` map, so the middleware is free to evolve its
/// own session shape without this crate knowing about it.
///
/// # Examples
///
/// ```
/// use orm_session_store::SessionData;
///
/// let mut data = SessionData::new();
/// data.insert("user_name", "world");
/// assert_eq!(data.get("user_name").and_then(|v| v.as_str()), Some("world"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Originating record identifier; populated only by
    /// [`SessionStore::all`](crate::store::SessionStore::all).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Reserved cookie sub-object carrying the middleware's expiry hints.
    #[serde(default)]
    pub cookie: SessionCookie,
    /// Everything else the middleware stored in the session.
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl SessionData {
    /// Creates empty session data with a default cookie.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under the given key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the value stored under the given key, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// The reserved `cookie` sub-object of [`SessionData`].
///
/// Field names follow the wire shape produced by the middleware, so rows
/// written by other store implementations against the same table decode
/// unchanged. Unknown cookie attributes (`httpOnly`, `path`, ...) are
/// preserved round-trip through the flattened `values` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCookie {
    /// Remaining lifetime of the cookie in milliseconds.
    #[serde(
        rename = "maxAge",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_age: Option<i64>,
    /// Absolute cookie expiry. When populated, the middleware manages the
    /// session deadline itself and `touch` leaves the stored row alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    /// Remaining cookie attributes, carried opaquely.
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_middleware_wire_shape() {
        let json = r#"{
            "cookie": {
                "originalMaxAge": null,
                "maxAge": 60000,
                "expires": "2026-08-28T12:00:00.000Z",
                "httpOnly": true,
                "path": "/"
            },
            "user_name": "alice"
        }"#;

        let data: SessionData = serde_json::from_str(json).unwrap();
        assert_eq!(data.cookie.max_age, Some(60_000));
        assert!(data.cookie.expires.is_some());
        assert_eq!(data.cookie.values["httpOnly"], Value::Bool(true));
        assert_eq!(
            data.get("user_name").and_then(|v| v.as_str()),
            Some("alice")
        );
        assert_eq!(data.id, None);
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let json = r#"{"cookie":{"httpOnly":true},"views":3}"#;
        let data: SessionData = serde_json::from_str(json).unwrap();
        let encoded = serde_json::to_string(&data).unwrap();
        let decoded: SessionData = serde_json::from_str(&encoded).unwrap();
        assert_eq!(data, decoded);
        assert_eq!(decoded.get("views"), Some(&Value::from(3)));
        assert_eq!(decoded.cookie.values["httpOnly"], Value::Bool(true));
    }

    #[test]
    fn missing_cookie_defaults_to_empty() {
        let data: SessionData = serde_json::from_str(r#"{"user":"bob"}"#).unwrap();
        assert_eq!(data.cookie, SessionCookie::default());
        assert_eq!(data.cookie.max_age, None);
    }

    #[test]
    fn null_expires_decodes_as_none() {
        let data: SessionData =
            serde_json::from_str(r#"{"cookie":{"expires":null,"maxAge":null}}"#).unwrap();
        assert_eq!(data.cookie.expires, None);
        assert_eq!(data.cookie.max_age, None);
    }
}
