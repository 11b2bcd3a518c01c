// src/models/timestamp.rs

//! Normalization of stored time values.
//!
//! Documents may carry times as a native date string, as a server timestamp
//! object, as an exported server timestamp, or as epoch milliseconds. Every
//! read goes through [`normalize`] so the rest of the crate only ever sees
//! `DateTime<Utc>`. Writes always use the server timestamp shape.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::store::Fields;

/// Every shape a stored time value may take.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    Server {
        seconds: i64,
        #[serde(default)]
        nanoseconds: u32,
    },
    Exported {
        #[serde(rename = "_seconds")]
        seconds: i64,
        #[serde(rename = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    Millis(i64),
    Text(String),
}

impl StoredTimestamp {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredTimestamp::Server {
                seconds,
                nanoseconds,
            }
            | StoredTimestamp::Exported {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            StoredTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            StoredTimestamp::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Converts any accepted stored time value into UTC.
/// Returns `None` for null, unknown shapes and out-of-range values.
pub fn normalize(value: &Value) -> Option<DateTime<Utc>> {
    StoredTimestamp::deserialize(value).ok()?.to_utc()
}

/// Reads a time field, falling back to a legacy field name when the
/// current one is absent or unreadable.
pub fn read(data: &Fields, field: &str, legacy: Option<&str>) -> Option<DateTime<Utc>> {
    data.get(field)
        .and_then(normalize)
        .or_else(|| legacy.and_then(|name| data.get(name)).and_then(normalize))
}

/// Like [`read`], but substitutes `fallback` when no value can be read.
pub fn read_or(
    data: &Fields,
    field: &str,
    legacy: Option<&str>,
    fallback: DateTime<Utc>,
) -> DateTime<Utc> {
    read(data, field, legacy).unwrap_or(fallback)
}

/// Server timestamp representation used for every write.
pub fn to_stored(time: DateTime<Utc>) -> Value {
    json!({
        "seconds": time.timestamp(),
        "nanoseconds": time.timestamp_subsec_nanos(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fields;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn accepts_server_timestamp_object() {
        let v = json!({"seconds": noon().timestamp(), "nanoseconds": 0});
        assert_eq!(normalize(&v), Some(noon()));
    }

    #[test]
    fn accepts_exported_timestamp_object() {
        let v = json!({"_seconds": noon().timestamp(), "_nanoseconds": 0});
        assert_eq!(normalize(&v), Some(noon()));
    }

    #[test]
    fn accepts_native_date_string() {
        assert_eq!(normalize(&json!("2024-03-15T12:00:00Z")), Some(noon()));
        assert_eq!(normalize(&json!("2024-03-15T19:00:00+07:00")), Some(noon()));
    }

    #[test]
    fn accepts_epoch_millis() {
        assert_eq!(normalize(&json!(noon().timestamp_millis())), Some(noon()));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(normalize(&json!(null)), None);
        assert_eq!(normalize(&json!("yesterday")), None);
        assert_eq!(normalize(&json!({"when": 1})), None);
    }

    #[test]
    fn stored_form_reads_back() {
        let t = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(normalize(&to_stored(t)), Some(t));
    }

    #[test]
    fn legacy_field_is_used_only_when_current_is_missing() {
        let legacy_only = fields(json!({"showAt": "2024-03-15T12:00:00Z"}));
        assert_eq!(read(&legacy_only, "startDate", Some("showAt")), Some(noon()));

        let both = fields(json!({
            "startDate": "2025-01-01T00:00:00Z",
            "showAt": "2024-03-15T12:00:00Z",
        }));
        assert_eq!(
            read(&both, "startDate", Some("showAt")),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn read_or_substitutes_fallback() {
        let empty = fields(json!({}));
        assert_eq!(read_or(&empty, "createdAt", None, noon()), noon());
    }
}
