//! In-memory usage tracker.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::ports::{
    PurposeUsage, RequestPurpose, UsageRecord, UsageSummary, UsageTracker, UsageTrackerError,
};

/// Keeps usage records in memory. Suitable for tests and short-lived
/// processes; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryUsageTracker {
    records: Mutex<Vec<UsageRecord>>,
}

impl InMemoryUsageTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded usage.
    pub fn records(&self) -> Vec<UsageRecord> {
        self.records.lock().unwrap().clone()
    }
}

/// Folds records into a summary with a per-purpose breakdown.
pub(crate) fn summarize(records: &[UsageRecord]) -> UsageSummary {
    let mut by_purpose: HashMap<RequestPurpose, (u32, u32, u32)> = HashMap::new();
    for record in records {
        let entry = by_purpose.entry(record.purpose).or_insert((0, 0, 0));
        entry.0 += record.cost_cents;
        entry.1 += record.total_tokens();
        entry.2 += 1;
    }

    UsageSummary {
        total_cost_cents: records.iter().map(|r| r.cost_cents).sum(),
        total_tokens: records.iter().map(|r| r.total_tokens()).sum(),
        request_count: records.len() as u32,
        by_purpose: by_purpose
            .into_iter()
            .map(|(purpose, (cost, tokens, requests))| PurposeUsage {
                purpose,
                cost_cents: cost,
                tokens,
                requests,
            })
            .collect(),
    }
}

#[async_trait]
impl UsageTracker for InMemoryUsageTracker {
    async fn record_usage(&self, record: UsageRecord) -> Result<(), UsageTrackerError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn total_usage(&self) -> Result<UsageSummary, UsageTrackerError> {
        let records = self.records.lock().unwrap();
        Ok(summarize(&records))
    }
}
