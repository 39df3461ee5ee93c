//! JSON-file usage tracker.
//!
//! Persists usage records to a single JSON file: each recording reads the
//! existing file, appends the new record, and writes the file back. If the
//! file does not exist it is created on the first recorded request.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::ports::{UsageRecord, UsageSummary, UsageTracker, UsageTrackerError};

use super::in_memory_usage_tracker::summarize;

/// Tracks usage in a JSON file so totals accumulate across process runs.
#[derive(Debug)]
pub struct JsonFileUsageTracker {
    path: PathBuf,
    // Serializes the read-modify-write cycle within this process.
    lock: Mutex<()>,
}

impl JsonFileUsageTracker {
    /// Creates a tracker backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<UsageRecord>, UsageTrackerError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| UsageTrackerError::Corrupted(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(UsageTrackerError::Storage(e.to_string())),
        }
    }

    async fn write_records(&self, records: &[UsageRecord]) -> Result<(), UsageTrackerError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| UsageTrackerError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| UsageTrackerError::Storage(e.to_string()))
    }
}

#[async_trait]
impl UsageTracker for JsonFileUsageTracker {
    async fn record_usage(&self, record: UsageRecord) -> Result<(), UsageTrackerError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        records.push(record);
        self.write_records(&records).await
    }

    async fn total_usage(&self) -> Result<UsageSummary, UsageTrackerError> {
        let _guard = self.lock.lock().await;
        let records = self.read_records().await?;
        Ok(summarize(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ConversationId;
    use crate::ports::RequestPurpose;

    fn record(cost: u32) -> UsageRecord {
        UsageRecord::new(
            ConversationId::new(),
            "openai",
            "gpt-3.5-turbo-1106",
            30,
            20,
            cost,
            RequestPurpose::FinalReply,
        )
    }

    #[tokio::test]
    async fn tracker_creates_file_on_first_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        let tracker = JsonFileUsageTracker::new(&path);

        assert!(!path.exists());
        tracker.record_usage(record(2)).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn tracker_accumulates_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");

        let first = JsonFileUsageTracker::new(&path);
        first.record_usage(record(2)).await.unwrap();
        drop(first);

        // A new instance over the same file keeps adding to the totals.
        let second = JsonFileUsageTracker::new(&path);
        second.record_usage(record(3)).await.unwrap();

        let summary = second.total_usage().await.unwrap();
        assert_eq!(summary.request_count, 2);
        assert_eq!(summary.total_cost_cents, 5);
        assert_eq!(summary.total_tokens, 100);
    }

    #[tokio::test]
    async fn missing_file_reads_as_zero_usage() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = JsonFileUsageTracker::new(dir.path().join("absent.json"));

        let summary = tracker.total_usage().await.unwrap();
        assert_eq!(summary.request_count, 0);
    }

    #[tokio::test]
    async fn corrupted_file_is_reported_not_clobbered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let tracker = JsonFileUsageTracker::new(&path);
        let err = tracker.record_usage(record(1)).await.unwrap_err();
        assert!(matches!(err, UsageTrackerError::Corrupted(_)));

        // The bad file is left alone for inspection.
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert_eq!(bytes, b"not json");
    }
}
