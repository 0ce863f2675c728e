/// Timestamp canonicalization
///
/// The connector sends `creat_time`/`updat_time` either as preformatted text
/// or as an epoch number whose unit depends on the source table. Numbers are
/// rendered as local ISO-8601 (`YYYY-MM-DDTHH:MM:SS[.ffffff]`); text is
/// passed through untouched.
///
/// Epoch numbers with a magnitude above 1e12 are read as milliseconds,
/// anything else as seconds. This is a heuristic: a seconds value above
/// 1e12 is more than 30,000 years out and not expected from the connector.

use chrono::{DateTime, Local, Utc};
use serde_json::Value;
use tracing::warn;

pub const MILLIS_THRESHOLD: f64 = 1e12;

const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Raw timestamp as it arrived on the wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawTimestamp<'a> {
    Integer(i64),
    Float(f64),
    Text(&'a str),
}

pub struct TimestampNormalizer;

impl TimestampNormalizer {
    /// Canonical string for `value`; `None` stays `None`.
    /// Numbers that cannot be represented as a date fall back to their
    /// plain text so the surrounding decode still succeeds.
    pub fn normalize(value: Option<RawTimestamp<'_>>) -> Option<String> {
        let value = value?;
        let converted = match value {
            RawTimestamp::Text(s) => return Some(s.to_string()),
            RawTimestamp::Integer(v) => from_integer(v),
            RawTimestamp::Float(v) => from_float(v),
        };

        match converted {
            Some(dt) => Some(format_canonical(&dt.with_timezone(&Local))),
            None => {
                let fallback = match value {
                    RawTimestamp::Integer(v) => v.to_string(),
                    RawTimestamp::Float(v) => v.to_string(),
                    RawTimestamp::Text(s) => s.to_string(),
                };
                warn!(value = %fallback, "timestamp out of range, keeping raw value");
                Some(fallback)
            }
        }
    }

    /// Normalize a JSON value. Strings and numbers follow `normalize`;
    /// booleans keep their text; objects and arrays are not timestamps.
    pub fn normalize_json(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Self::normalize(Some(RawTimestamp::Text(s))),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Self::normalize(Some(RawTimestamp::Integer(v)))
                } else if n.is_f64() {
                    n.as_f64()
                        .and_then(|v| Self::normalize(Some(RawTimestamp::Float(v))))
                } else {
                    // u64 beyond i64::MAX
                    warn!(value = %n, "timestamp out of range, keeping raw value");
                    Some(n.to_string())
                }
            }
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Current local time in canonical form
    pub fn now() -> String {
        format_canonical(&Local::now())
    }
}

fn from_integer(v: i64) -> Option<DateTime<Utc>> {
    if (v as f64).abs() > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(v)
    } else {
        DateTime::from_timestamp(v, 0)
    }
}

fn from_float(v: f64) -> Option<DateTime<Utc>> {
    if !v.is_finite() {
        return None;
    }
    let secs = if v.abs() > MILLIS_THRESHOLD { v / 1000.0 } else { v };
    let whole = secs.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }

    let mut whole = whole as i64;
    let mut nanos = ((secs - secs.floor()) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        whole = whole.checked_add(1)?;
        nanos = 0;
    }
    DateTime::from_timestamp(whole, nanos)
}

fn format_canonical(dt: &DateTime<Local>) -> String {
    let base = dt.format(CANONICAL_FORMAT).to_string();
    match dt.timestamp_subsec_micros() {
        0 => base,
        micros => format!("{}.{:06}", base, micros),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn local(secs: i64, micros: u32) -> String {
        let dt = Local.timestamp_opt(secs, micros * 1000).unwrap();
        let base = dt.format(CANONICAL_FORMAT).to_string();
        if micros == 0 {
            base
        } else {
            format!("{}.{:06}", base, micros)
        }
    }

    #[test]
    fn test_null_stays_null() {
        assert_eq!(TimestampNormalizer::normalize(None), None);
        assert_eq!(TimestampNormalizer::normalize_json(&Value::Null), None);
    }

    #[test]
    fn test_text_passthrough() {
        let out = TimestampNormalizer::normalize(Some(RawTimestamp::Text("2024-01-02 03:04:05")));
        assert_eq!(out.as_deref(), Some("2024-01-02 03:04:05"));
    }

    #[test]
    fn test_seconds_and_millis() {
        let secs = TimestampNormalizer::normalize(Some(RawTimestamp::Integer(1_700_000_000)));
        let millis = TimestampNormalizer::normalize(Some(RawTimestamp::Integer(1_700_000_000_000)));
        assert_eq!(secs, Some(local(1_700_000_000, 0)));
        assert_eq!(millis, secs);
    }

    #[test]
    fn test_threshold_boundary_is_seconds() {
        let out = TimestampNormalizer::normalize(Some(RawTimestamp::Integer(1_000_000_000_000)));
        assert_eq!(out, Some(local(1_000_000_000_000, 0)));

        let above = TimestampNormalizer::normalize(Some(RawTimestamp::Integer(1_000_000_000_001)));
        assert_eq!(above, Some(local(1_000_000_000, 1_000)));
    }

    #[test]
    fn test_negative_magnitude() {
        let millis = TimestampNormalizer::normalize(Some(RawTimestamp::Integer(-1_700_000_000_000)));
        assert_eq!(millis, Some(local(-1_700_000_000, 0)));

        let secs = TimestampNormalizer::normalize(Some(RawTimestamp::Integer(-86_400)));
        assert_eq!(secs, Some(local(-86_400, 0)));
    }

    #[test]
    fn test_millis_fraction() {
        let out = TimestampNormalizer::normalize(Some(RawTimestamp::Integer(1_700_000_000_123)));
        assert_eq!(out, Some(local(1_700_000_000, 123_000)));
    }

    #[test]
    fn test_float_seconds() {
        let out = TimestampNormalizer::normalize(Some(RawTimestamp::Float(1_700_000_000.5)));
        assert_eq!(out, Some(local(1_700_000_000, 500_000)));
    }

    #[test]
    fn test_overflow_falls_back_to_text() {
        let out = TimestampNormalizer::normalize(Some(RawTimestamp::Integer(i64::MAX)));
        assert_eq!(out.as_deref(), Some("9223372036854775807"));

        let out = TimestampNormalizer::normalize_json(&json!(18446744073709551615u64));
        assert_eq!(out.as_deref(), Some("18446744073709551615"));
    }

    #[test]
    fn test_json_shapes() {
        assert_eq!(
            TimestampNormalizer::normalize_json(&json!(1_700_000_000)),
            Some(local(1_700_000_000, 0))
        );
        assert_eq!(TimestampNormalizer::normalize_json(&json!("x")).as_deref(), Some("x"));
        assert_eq!(TimestampNormalizer::normalize_json(&json!({"a": 1})), None);
    }
}
