/// Webhook service facade
///
/// Performs the call sequences the HTTP layer needs (ingest, read, stats,
/// reset, health) and returns serializable bodies. Routing and rendering
/// live outside this crate.

use crate::config::ServiceConfig;
use crate::decoder::MessageDecoder;
use crate::record::NormalizedRecord;
use crate::stats::{Stats, StatsComputer};
use crate::store::{RecordStore, SnapshotOrder};
use crate::timestamp::TimestampNormalizer;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("payload too large: {size} bytes exceeds limit of {limit}")]
    PayloadTooLarge { size: usize, limit: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub status: &'static str,
    pub message: &'static str,
    pub total_count: u64,
    pub record_id: Option<i64>,
    pub processing_id: Uuid,
    pub received_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordsResponse {
    pub total_received: u64,
    pub last_10_records: Vec<Arc<NormalizedRecord>>,
    pub last_updated: DateTime<Local>,
    pub service_status: &'static str,
    pub topic_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: Stats,
    pub service_uptime: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetReceipt {
    pub status: &'static str,
    pub message: String,
    pub previous_total: u64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Local>,
    pub total_processed: u64,
    pub uptime_info: &'static str,
}

pub struct WebhookService {
    config: ServiceConfig,
    decoder: MessageDecoder,
    store: Arc<RecordStore>,
}

impl WebhookService {
    pub fn new(config: ServiceConfig) -> Self {
        let store = Arc::new(RecordStore::with_capacity(config.capacity));
        Self::with_store(config, store)
    }

    /// Share an existing store, e.g. with a dashboard renderer
    pub fn with_store(config: ServiceConfig, store: Arc<RecordStore>) -> Self {
        WebhookService {
            decoder: MessageDecoder::with_preview_chars(config.preview_chars),
            config,
            store,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Decode and store one delivery. Only oversized bodies are refused;
    /// malformed ones are stored as error records.
    pub fn ingest(&self, body: &[u8]) -> Result<IngestReceipt, IngestError> {
        let limit = self.config.max_payload_bytes;
        if body.len() > limit {
            warn!(size = body.len(), limit, "rejecting oversized payload");
            return Err(IngestError::PayloadTooLarge {
                size: body.len(),
                limit,
            });
        }

        let record = self.decoder.decode(body);
        let record_id = record.record_id();
        let processing_id = record.processing_id();
        let received_at = record.received_at();
        let total = self.store.append(record);

        info!(bytes = body.len(), total, ?record_id, "record ingested");

        Ok(IngestReceipt {
            status: "success",
            message: "Bronze record received successfully",
            total_count: total,
            record_id,
            processing_id,
            received_at,
        })
    }

    /// Newest-first window with the running total
    pub fn records(&self) -> RecordsResponse {
        let (records, total) = self.store.snapshot_with_total(SnapshotOrder::NewestFirst);
        RecordsResponse {
            total_received: total,
            last_10_records: records,
            last_updated: Local::now(),
            service_status: "active",
            topic_name: self.config.topic_name.clone(),
        }
    }

    pub fn stats(&self) -> StatsResponse {
        StatsResponse {
            stats: StatsComputer::from_store(&self.store),
            service_uptime: "active",
            timestamp: TimestampNormalizer::now(),
        }
    }

    pub fn reset(&self) -> ResetReceipt {
        let previous = self.store.reset();
        ResetReceipt {
            status: "success",
            message: format!("Counters reset successfully. Previous count: {}", previous),
            previous_total: previous,
            timestamp: TimestampNormalizer::now(),
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy",
            service: self.config.service_name.clone(),
            version: self.config.service_version.clone(),
            timestamp: Local::now(),
            total_processed: self.store.current_total(),
            uptime_info: "running",
        }
    }
}

impl Default for WebhookService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_receipt() {
        let service = WebhookService::default();
        let receipt = service.ingest(br#"{"record_id": 8}"#).unwrap();
        assert_eq!(receipt.status, "success");
        assert_eq!(receipt.total_count, 1);
        assert_eq!(receipt.record_id, Some(8));

        let stored = service.store().snapshot(SnapshotOrder::Arrival);
        assert_eq!(stored[0].processing_id(), receipt.processing_id);
    }

    #[test]
    fn test_oversized_rejected_before_decode() {
        let config = ServiceConfig {
            max_payload_bytes: 4,
            ..ServiceConfig::default()
        };
        let service = WebhookService::new(config);
        let err = service.ingest(b"{\"a\":1}").unwrap_err();
        assert_eq!(err, IngestError::PayloadTooLarge { size: 7, limit: 4 });
        assert_eq!(service.store().current_total(), 0);
    }

    #[test]
    fn test_reset_message() {
        let service = WebhookService::default();
        service.ingest(b"{}").unwrap();
        service.ingest(b"{}").unwrap();
        let receipt = service.reset();
        assert_eq!(receipt.previous_total, 2);
        assert_eq!(receipt.message, "Counters reset successfully. Previous count: 2");
        assert_eq!(service.health().total_processed, 0);
    }
}
