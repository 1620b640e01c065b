//! Grove Record Mapper
//!
//! Turns a raw stored document into the public record shape. Each display
//! attribute is resolved from an ordered table of candidate field names,
//! first non-empty wins, so documents written under older naming
//! conventions map without a migration. Adding a convention means adding a
//! name to a table.
//!
//! @version 0.1.0
//! @author Grove Development Team

use crate::stats::{RecordStats, StatFanout};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use grove_document::{Document, Value};
use serde::Serialize;

// =============================================================================
// Field Fallback Tables
// =============================================================================

pub const EMAIL_FIELDS: &[&str] = &["email", "emailAddress", "mail"];
pub const DISPLAY_NAME_FIELDS: &[&str] = &["displayName", "display_name", "name", "fullName"];
pub const PHONE_FIELDS: &[&str] = &["phone", "phoneNumber", "phone_number", "mobile"];
pub const SOURCE_FIELDS: &[&str] = &["source", "origin", "signupSource", "channel"];
pub const TYPE_FIELDS: &[&str] = &["type", "userType", "kind"];
pub const PARTITION_FIELDS: &[&str] = &["partition", "tenant", "tenantId", "org"];
pub const CREATED_AT_FIELDS: &[&str] = &["createdAt", "created_at", "creationTime", "created"];

// =============================================================================
// Record
// =============================================================================

/// Public projection of a record. Raw store fields never appear here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub stats: RecordStats,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub partition: Option<String>,
}

// =============================================================================
// Record Mapper
// =============================================================================

pub struct RecordMapper {
    stats: StatFanout,
}

impl RecordMapper {
    pub fn new(stats: StatFanout) -> Self {
        Self { stats }
    }

    /// Map a stored document, fetching its stats.
    pub async fn map(&self, doc: &Document) -> Record {
        let stats = self.stats.fetch(doc.id()).await;
        project(doc, stats)
    }
}

/// Build the public record from a document and already-fetched stats.
pub fn project(doc: &Document, stats: RecordStats) -> Record {
    Record {
        id: doc.id().to_string(),
        email: first_text(doc, EMAIL_FIELDS),
        display_name: first_text(doc, DISPLAY_NAME_FIELDS),
        phone: first_text(doc, PHONE_FIELDS),
        source: first_text(doc, SOURCE_FIELDS),
        created_at: first_timestamp(doc, CREATED_AT_FIELDS),
        stats,
        record_type: first_text(doc, TYPE_FIELDS),
        partition: first_text(doc, PARTITION_FIELDS),
    }
}

/// First candidate holding a non-empty string. Numbers are rendered as text
/// (phone numbers are sometimes stored numerically).
fn first_text(doc: &Document, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|field| match doc.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Int(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First candidate that normalizes to a timestamp.
fn first_timestamp(doc: &Document, candidates: &[&str]) -> Option<DateTime<Utc>> {
    candidates
        .iter()
        .find_map(|field| doc.get(field).and_then(normalize_timestamp))
}

// =============================================================================
// Timestamp Normalization
// =============================================================================

/// Normalize any timestamp-like value. Accepts native timestamps, serialized
/// `{seconds, nanoseconds}` objects (with or without leading underscores),
/// epoch milliseconds, and RFC 3339 / `YYYY-MM-DD[ HH:MM:SS]` strings.
/// Anything else is None.
pub fn normalize_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Int(millis) => Utc.timestamp_millis_opt(*millis).single(),
        Value::Float(millis) if millis.is_finite() => {
            Utc.timestamp_millis_opt(*millis as i64).single()
        }
        Value::Object(obj) => {
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            let nanos = u32::try_from(nanos).ok()?;
            Utc.timestamp_opt(seconds, nanos).single()
        }
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// =============================================================================
// Tests
// =============================================================================
