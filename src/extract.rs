/// Field extraction
///
/// Two strategies map a delivery onto `BusinessFields`:
/// - structured: look fields up by key in a parsed JSON object, after
///   stripping one `value`/`payload` envelope
/// - pattern: scan raw text for `"field": ...` fragments, used when the
///   body is an Avro console dump or otherwise not valid JSON
///
/// Both resolve every field independently; a missing or unusable value is
/// `None`, never an error.

use crate::decoder::DecodeError;
use crate::record::{BusinessFields, FieldValue};
use crate::schema::{FieldKind, FieldSpec, FIELDS};
use crate::timestamp::{RawTimestamp, TimestampNormalizer};
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::trace;

/// Envelope keys, checked in this order
pub const ENVELOPE_KEYS: [&str; 2] = ["value", "payload"];

/// Avro union branch names unwrapped during structured extraction
const UNION_BRANCHES: [&str; 6] = ["int", "long", "string", "float", "double", "boolean"];

/// Container left after envelope unwrapping
#[derive(Debug, Clone, Copy)]
pub enum Envelope<'a> {
    Fields(&'a Map<String, Value>),
    Text(&'a str),
}

/// Strip one level of `value`/`payload` wrapping. A wrapped string is
/// handed back as text for pattern scanning; any other wrapped shape is
/// rejected.
pub fn unwrap_envelope(doc: &Map<String, Value>) -> Result<Envelope<'_>, DecodeError> {
    for key in ENVELOPE_KEYS {
        if let Some(inner) = doc.get(key) {
            return match inner {
                Value::Object(map) => Ok(Envelope::Fields(map)),
                Value::String(text) => Ok(Envelope::Text(text)),
                other => Err(DecodeError::InvalidEnvelope {
                    key,
                    found: json_type_name(other),
                }),
            };
        }
    }
    Ok(Envelope::Fields(doc))
}

/// Look up every known field directly in `container`
pub fn extract_structured(container: &Map<String, Value>) -> BusinessFields {
    let mut fields = BusinessFields::default();
    for spec in FIELDS.iter() {
        if let Some(value) = container.get(spec.name).and_then(|v| coerce_json(spec.kind, v)) {
            fields.set(spec.name, value);
        }
    }
    fields
}

/// Scan `text` for every known field, trying strategies in priority order
pub fn extract_patterns(text: &str) -> BusinessFields {
    let mut fields = BusinessFields::default();
    for rule in field_rules() {
        let Some((strategy, raw)) = rule.find(text) else {
            continue;
        };
        trace!(field = rule.spec.name, ?strategy, "pattern matched");
        if let Some(value) = coerce_capture(rule.spec.kind, &unescape(raw)) {
            fields.set(rule.spec.name, value);
        }
    }
    fields
}

/// Text shapes recognized by the pattern extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternStrategy {
    /// `"field": {"int": 123}`
    WrappedInt,
    /// `"field": {"string": "abc"}`
    WrappedString,
    /// `"field": 123`
    BareInt,
    /// `"field": "abc"`
    BareString,
}

/// Non-empty JSON string body; escaped quotes do not terminate it
const QUOTED_BODY: &str = r#"(?:[^"\\]|\\.)+"#;

impl PatternStrategy {
    /// First match wins
    pub const PRIORITY: [PatternStrategy; 4] = [
        PatternStrategy::WrappedInt,
        PatternStrategy::WrappedString,
        PatternStrategy::BareInt,
        PatternStrategy::BareString,
    ];

    fn pattern(self, field: &str) -> String {
        let f = regex::escape(field);
        match self {
            PatternStrategy::WrappedInt => {
                format!(r#""{f}"\s*:\s*\{{\s*"int"\s*:\s*([0-9]+)\s*\}}"#)
            }
            PatternStrategy::WrappedString => {
                format!(r#""{f}"\s*:\s*\{{\s*"string"\s*:\s*"({QUOTED_BODY})"\s*\}}"#)
            }
            PatternStrategy::BareInt => format!(r#""{f}"\s*:\s*([0-9]+)"#),
            PatternStrategy::BareString => format!(r#""{f}"\s*:\s*"({QUOTED_BODY})""#),
        }
    }
}

struct FieldRule {
    spec: &'static FieldSpec,
    matchers: Vec<(PatternStrategy, Regex)>,
}

impl FieldRule {
    /// First matching strategy and its capture
    fn find<'t>(&self, text: &'t str) -> Option<(PatternStrategy, &'t str)> {
        self.matchers.iter().find_map(|(strategy, re)| {
            let raw = re.captures(text)?.get(1)?.as_str();
            Some((*strategy, raw))
        })
    }
}

fn field_rules() -> &'static [FieldRule] {
    static RULES: OnceLock<Vec<FieldRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        FIELDS
            .iter()
            .map(|spec| FieldRule {
                spec,
                matchers: PatternStrategy::PRIORITY
                    .iter()
                    .map(|&strategy| {
                        let re = Regex::new(&strategy.pattern(spec.name))
                            .expect("valid field pattern");
                        (strategy, re)
                    })
                    .collect(),
            })
            .collect()
    })
}

fn coerce_json(kind: FieldKind, value: &Value) -> Option<FieldValue> {
    let value = unwrap_union(value);
    match kind {
        FieldKind::Integer => match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => parse_integer(s),
            _ => None,
        }
        .map(FieldValue::Int),
        FieldKind::Text => match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
        .map(FieldValue::Text),
        FieldKind::Timestamp => TimestampNormalizer::normalize_json(value).map(FieldValue::Text),
    }
}

fn coerce_capture(kind: FieldKind, raw: &str) -> Option<FieldValue> {
    let as_int = if raw.bytes().all(|b| b.is_ascii_digit()) {
        raw.parse::<i64>().ok()
    } else {
        None
    };

    match kind {
        FieldKind::Integer => as_int.or_else(|| parse_integer(raw)).map(FieldValue::Int),
        FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
        FieldKind::Timestamp => {
            let ts = match as_int {
                Some(v) => RawTimestamp::Integer(v),
                None => RawTimestamp::Text(raw),
            };
            TimestampNormalizer::normalize(Some(ts)).map(FieldValue::Text)
        }
    }
}

/// Decode JSON string escapes in a captured body; text that is not a
/// valid JSON string body is kept as captured
fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }
    serde_json::from_str::<String>(&format!("\"{}\"", raw))
        .map(Cow::Owned)
        .unwrap_or(Cow::Borrowed(raw))
}

/// `{"int": 5}` -> `5`
fn unwrap_union(value: &Value) -> &Value {
    match value {
        Value::Object(map) if map.len() == 1 => map
            .iter()
            .next()
            .filter(|(branch, _)| UNION_BRANCHES.contains(&branch.as_str()))
            .map(|(_, inner)| inner)
            .unwrap_or(value),
        _ => value,
    }
}

/// Optional `-` followed by ASCII digits only
fn parse_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
