/// CDC Ingest - Change Record Normalization
///
/// Normalizes change-data-capture deliveries pushed by an HTTP sink
/// connector into a fixed 21-field record and keeps a small window of recent
/// records for inspection. Features include:
/// - JSON decoding with Confluent envelope and Avro union unwrapping
/// - Pattern-based fallback for Avro console dumps and truncated text
/// - Epoch timestamp canonicalization
/// - Error records instead of rejected deliveries
/// - Thread-safe bounded record store and window statistics

pub mod schema;
pub mod record;
pub mod timestamp;
pub mod extract;
pub mod decoder;
pub mod store;
pub mod stats;
pub mod config;
pub mod service;
pub mod logging;

pub use schema::{FieldKind, FieldSpec, FIELDS};
pub use record::{BusinessFields, FieldValue, NormalizedRecord};
pub use timestamp::{RawTimestamp, TimestampNormalizer};
pub use extract::PatternStrategy;
pub use decoder::{DecodeError, MessageDecoder, ParsedPayload};
pub use store::{RecordStore, SnapshotOrder};
pub use stats::{Stats, StatsComputer};
pub use config::{ConfigError, LogFormat, ServiceConfig};
pub use service::{IngestError, IngestReceipt, WebhookService};
