//! Grove Cursor Codec
//!
//! Opaque resume tokens for collection-group scans. Cross-collection order
//! can only be rebuilt from the sort value plus the document path, so the
//! token carries both as URL-safe base64 of a small versioned JSON object.
//!
//! Decoding fails closed: any malformed, oversized, or foreign token decodes
//! to `None` and the caller proceeds as if no cursor had been sent.
//!
//! @version 0.1.0
//! @author Grove Development Team

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use grove_document::{DocumentPath, Value};
use serde::{Deserialize, Serialize};

const CURSOR_VERSION: u8 = 1;

// Untrusted input bound.
const MAX_CURSOR_TOKEN_LEN: usize = 4 * 1024;

// =============================================================================
// Group Cursor
// =============================================================================

/// Resume position of a collection-group scan.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCursor {
    /// Sort-field value of the last record. None when sorting by identity.
    pub sort_value: Option<Value>,
    /// Fully-qualified path of the last record.
    pub path: String,
}

impl GroupCursor {
    pub fn new(sort_value: Option<Value>, path: impl Into<String>) -> Self {
        Self {
            sort_value,
            path: path.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CursorPayload {
    v: u8,
    #[serde(rename = "sortValue")]
    sort_value: Option<SortKey>,
    path: String,
}

/// Typed sort value. Keeps timestamps distinct from strings across the
/// round trip.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum SortKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// JSON has no NaN or infinity; they travel by name.
    NonFinite(NonFinite),
    Timestamp(DateTime<Utc>),
    String(String),
    Json(serde_json::Value),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NonFinite {
    Nan,
    Inf,
    NegInf,
}

impl From<&Value> for SortKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(n) => Self::Int(*n),
            Value::Float(f) if f.is_nan() => Self::NonFinite(NonFinite::Nan),
            Value::Float(f) if f.is_infinite() && *f > 0.0 => Self::NonFinite(NonFinite::Inf),
            Value::Float(f) if f.is_infinite() => Self::NonFinite(NonFinite::NegInf),
            Value::Float(f) => Self::Float(*f),
            Value::Timestamp(ts) => Self::Timestamp(*ts),
            Value::String(s) => Self::String(s.clone()),
            other => Self::Json(other.to_json()),
        }
    }
}

impl From<SortKey> for Value {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Null => Value::Null,
            SortKey::Bool(b) => Value::Bool(b),
            SortKey::Int(n) => Value::Int(n),
            SortKey::Float(f) => Value::Float(f),
            SortKey::NonFinite(NonFinite::Nan) => Value::Float(f64::NAN),
            SortKey::NonFinite(NonFinite::Inf) => Value::Float(f64::INFINITY),
            SortKey::NonFinite(NonFinite::NegInf) => Value::Float(f64::NEG_INFINITY),
            SortKey::Timestamp(ts) => Value::Timestamp(ts),
            SortKey::String(s) => Value::String(s),
            SortKey::Json(json) => Value::from_json(json),
        }
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Encode a group cursor as an opaque token.
pub fn encode(cursor: &GroupCursor) -> String {
    let payload = CursorPayload {
        v: CURSOR_VERSION,
        sort_value: cursor.sort_value.as_ref().map(SortKey::from),
        path: cursor.path.clone(),
    };
    // Plain structs of strings and numbers; serde_json cannot fail here.
    let json = serde_json::to_vec(&payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a token produced by [`encode`]. Returns None for anything else.
pub fn decode(token: &str) -> Option<GroupCursor> {
    let token = token.trim();
    if token.is_empty() || token.len() > MAX_CURSOR_TOKEN_LEN {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
    let payload: CursorPayload = serde_json::from_slice(&bytes).ok()?;

    if payload.v != CURSOR_VERSION {
        return None;
    }
    DocumentPath::parse(&payload.path).ok()?;

    Some(GroupCursor {
        sort_value: payload.sort_value.map(Value::from),
        path: payload.path,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn round_trip(cursor: GroupCursor) {
        let token = encode(&cursor);
        assert_eq!(decode(&token), Some(cursor));
    }

    #[test]
    fn test_round_trip_identity_cursor() {
        round_trip(GroupCursor::new(None, "orgs/a/users/u1"));
    }

    #[test]
    fn test_round_trip_typed_values() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap();
        round_trip(GroupCursor::new(Some(Value::Timestamp(ts)), "orgs/a/users/u1"));
        round_trip(GroupCursor::new(Some(Value::from("2024-02-29")), "orgs/a/users/u1"));
        round_trip(GroupCursor::new(Some(Value::Int(-7)), "orgs/b/users/u2"));
        round_trip(GroupCursor::new(Some(Value::Float(1.25)), "orgs/b/users/u2"));
        round_trip(GroupCursor::new(Some(Value::Bool(true)), "orgs/b/users/u2"));
        round_trip(GroupCursor::new(Some(Value::Null), "orgs/b/users/u2"));
    }

    #[test]
    fn test_non_finite_floats_survive_round_trip() {
        round_trip(GroupCursor::new(Some(Value::Float(f64::INFINITY)), "orgs/a/users/u1"));
        round_trip(GroupCursor::new(Some(Value::Float(f64::NEG_INFINITY)), "orgs/a/users/u1"));

        let decoded = decode(&encode(&GroupCursor::new(Some(Value::Float(f64::NAN)), "orgs/a/users/u1")))
            .unwrap();
        assert!(matches!(decoded.sort_value, Some(Value::Float(f)) if f.is_nan()));
        assert_eq!(decoded.path, "orgs/a/users/u1");

        let unknown = URL_SAFE_NO_PAD
            .encode(br#"{"v":1,"sortValue":{"type":"nonfinite","value":"huge"},"path":"users/u1"}"#);
        assert_eq!(decode(&unknown), None);
    }

    #[test]
    fn test_timestamp_stays_distinct_from_string() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let decoded = decode(&encode(&GroupCursor::new(Some(Value::Timestamp(ts)), "users/u1"))).unwrap();
        assert!(matches!(decoded.sort_value, Some(Value::Timestamp(_))));
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode(&GroupCursor::new(Some(Value::from("a+b/c?")), "orgs/a/users/u1"));
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_garbage_decodes_to_none() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("   "), None);
        assert_eq!(decode("not base64!!"), None);
        assert_eq!(decode(&URL_SAFE_NO_PAD.encode(b"{not json")), None);
        assert_eq!(decode(&URL_SAFE_NO_PAD.encode(b"[1,2,3]")), None);
        assert_eq!(decode(&"A".repeat(MAX_CURSOR_TOKEN_LEN + 1)), None);
    }

    #[test]
    fn test_foreign_version_and_bad_path_rejected() {
        let future = URL_SAFE_NO_PAD.encode(br#"{"v":2,"sortValue":null,"path":"users/u1"}"#);
        assert_eq!(decode(&future), None);

        let collection_path = URL_SAFE_NO_PAD.encode(br#"{"v":1,"sortValue":null,"path":"users"}"#);
        assert_eq!(decode(&collection_path), None);

        let valid = URL_SAFE_NO_PAD.encode(br#"{"v":1,"sortValue":null,"path":"users/u1"}"#);
        assert_eq!(decode(&valid), Some(GroupCursor::new(None, "users/u1")));
    }
}
