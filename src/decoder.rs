/// Connector payload decoder
///
/// Turns a raw HTTP body into a `NormalizedRecord`. The body is parsed as
/// JSON when possible and scanned with field patterns otherwise. Decoding
/// never fails outward: a body that yields nothing usable becomes an error
/// record (`record_id = -1`, `name = "PARSING_FAILED"`) so the connector
/// never sees a rejection for payload shape alone.

use crate::extract::{self, Envelope};
use crate::record::{truncate_with_marker, BusinessFields, NormalizedRecord};
use crate::timestamp::TimestampNormalizer;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub const ERROR_RECORD_ID: i64 = -1;
pub const PARSE_FAILED_NAME: &str = "PARSING_FAILED";
pub const PARSE_ERROR_PREFIX: &str = "PARSE_ERROR: ";
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid utf-8 sequence at byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("envelope key `{key}` holds {found}, expected an object or text")]
    InvalidEnvelope { key: &'static str, found: &'static str },

    #[error("no recoverable fields")]
    NoRecoverableFields,
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Outcome of the structured parse attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload<'a> {
    /// Body is a JSON object
    Structured(Map<String, Value>),
    /// Anything else, including empty bodies and non-object JSON
    Unstructured(&'a str),
}

impl<'a> ParsedPayload<'a> {
    pub fn parse(text: &'a str) -> Self {
        // blank bodies are not treated as an empty document
        if text.trim().is_empty() {
            return ParsedPayload::Unstructured(text);
        }
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => ParsedPayload::Structured(map),
            _ => ParsedPayload::Unstructured(text),
        }
    }
}

/// Stateless decoder; safe to share across threads
#[derive(Debug, Clone, Copy)]
pub struct MessageDecoder {
    preview_chars: usize,
}

impl MessageDecoder {
    pub fn new() -> Self {
        MessageDecoder {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Set how much of the raw body an error record keeps in `description`
    pub fn with_preview_chars(preview_chars: usize) -> Self {
        MessageDecoder { preview_chars }
    }

    /// Decode a delivery. Always returns a record.
    pub fn decode(&self, raw: &[u8]) -> NormalizedRecord {
        match self.extract(raw) {
            Ok(fields) => NormalizedRecord::new(fields),
            Err(err) => {
                warn!(error = %err, bytes = raw.len(), "payload could not be decoded, storing error record");
                NormalizedRecord::new(self.error_fields(raw, &err))
            }
        }
    }

    /// Extract business fields, reporting why nothing could be recovered
    pub fn extract(&self, raw: &[u8]) -> DecodeResult<BusinessFields> {
        let text = std::str::from_utf8(raw).map_err(|e| DecodeError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;

        match ParsedPayload::parse(text) {
            ParsedPayload::Structured(doc) => match extract::unwrap_envelope(&doc)? {
                Envelope::Fields(container) => {
                    let fields = extract::extract_structured(container);
                    debug!(path = "structured", fields = fields.present_count(), "payload decoded");
                    Ok(fields)
                }
                Envelope::Text(inner) => Self::extract_unstructured(inner),
            },
            ParsedPayload::Unstructured(text) => Self::extract_unstructured(text),
        }
    }

    fn extract_unstructured(text: &str) -> DecodeResult<BusinessFields> {
        let fields = extract::extract_patterns(text);
        let recovered = fields.present_count();
        if recovered == 0 {
            return Err(DecodeError::NoRecoverableFields);
        }
        debug!(path = "pattern", fields = recovered, "payload decoded");
        Ok(fields)
    }

    fn error_fields(&self, raw: &[u8], err: &DecodeError) -> BusinessFields {
        let text = String::from_utf8_lossy(raw);
        BusinessFields {
            record_id: Some(ERROR_RECORD_ID),
            name: Some(PARSE_FAILED_NAME.to_string()),
            data: Some(format!("{}{}", PARSE_ERROR_PREFIX, err)),
            description: Some(truncate_with_marker(&text, self.preview_chars)),
            creat_time: Some(TimestampNormalizer::now()),
            ..BusinessFields::default()
        }
    }
}

impl Default for MessageDecoder {
    fn default() -> Self {
        Self::new()
    }
}
