/// Canonical change record
///
/// A `NormalizedRecord` is built once by the decoder and never changes
/// afterwards: the store hands out `Arc`s and the business fields are only
/// reachable through a shared reference.

use crate::schema::FIELDS;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single extracted value, already coerced to its field's kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Text(s) => s,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! business_fields {
    (integer: [$($int:ident),* $(,)?], text: [$($text:ident),* $(,)?]) => {
        /// The 21 business columns; every one of them is independently nullable
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct BusinessFields {
            $(pub $int: Option<i64>,)*
            $(pub $text: Option<String>,)*
        }

        impl BusinessFields {
            /// Read a field by wire name
            pub fn get(&self, name: &str) -> Option<FieldValue> {
                match name {
                    $(stringify!($int) => self.$int.map(FieldValue::Int),)*
                    $(stringify!($text) => self.$text.clone().map(FieldValue::Text),)*
                    _ => None,
                }
            }

            /// Write a field by wire name. Text is not parsed into integer
            /// fields here; callers coerce before setting.
            pub fn set(&mut self, name: &str, value: FieldValue) {
                match name {
                    $(stringify!($int) => self.$int = value.as_int(),)*
                    $(stringify!($text) => self.$text = Some(value.into_text()),)*
                    _ => {}
                }
            }
        }
    };
}

business_fields! {
    integer: [
        authorizer_usrnbr,
        creat_usrnbr,
        four_eye_on,
        next_seqnbr,
        oper,
        owner_usrnbr,
        protection,
        record_id,
        seqnbr,
        size,
        transnbr,
        trans_record_type,
        updat_usrnbr,
        version,
    ],
    text: [
        creat_time,
        data,
        description,
        description2,
        external_user,
        name,
        updat_time,
    ]
}

impl BusinessFields {
    /// Number of non-null fields
    pub fn present_count(&self) -> usize {
        FIELDS.iter().filter(|f| self.get(f.name).is_some()).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedRecord {
    #[serde(flatten)]
    fields: BusinessFields,
    received_at: DateTime<Local>,
    processing_id: Uuid,
}

impl NormalizedRecord {
    /// Stamp extracted fields with capture time and a fresh processing id
    pub fn new(fields: BusinessFields) -> Self {
        NormalizedRecord {
            fields,
            received_at: Local::now(),
            processing_id: Uuid::new_v4(),
        }
    }

    pub fn fields(&self) -> &BusinessFields {
        &self.fields
    }

    pub fn record_id(&self) -> Option<i64> {
        self.fields.record_id
    }

    pub fn creat_usrnbr(&self) -> Option<i64> {
        self.fields.creat_usrnbr
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    pub fn received_at(&self) -> DateTime<Local> {
        self.received_at
    }

    pub fn processing_id(&self) -> Uuid {
        self.processing_id
    }

    /// Non-null fields as (label, value) pairs in display order, values
    /// longer than `max_chars` cut short with `...`
    pub fn display_fields(&self, max_chars: usize) -> Vec<(&'static str, String)> {
        FIELDS
            .iter()
            .filter_map(|spec| {
                self.fields
                    .get(spec.name)
                    .map(|v| (spec.label, truncate_with_marker(&v.to_string(), max_chars)))
            })
            .collect()
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut
pub(crate) fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
