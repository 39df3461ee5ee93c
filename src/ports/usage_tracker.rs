//! UsageTracker port - Interface for tracking generation-service usage.
//!
//! The orchestration engine never talks to this port directly; a metering
//! wrapper around the AI provider records usage transparently, and the
//! engine must work identically whether or not one is installed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, Timestamp};

use super::RequestPurpose;

/// Record of usage for a single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Conversation the request served.
    pub conversation_id: ConversationId,
    /// Provider used.
    pub provider: String,
    /// Model used.
    pub model: String,
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Cost in cents.
    pub cost_cents: u32,
    /// Pipeline stage that issued the request.
    pub purpose: RequestPurpose,
    /// When the usage occurred.
    pub occurred_at: Timestamp,
}

impl UsageRecord {
    /// Creates a new usage record.
    pub fn new(
        conversation_id: ConversationId,
        provider: impl Into<String>,
        model: impl Into<String>,
        prompt_tokens: u32,
        completion_tokens: u32,
        cost_cents: u32,
        purpose: RequestPurpose,
    ) -> Self {
        Self {
            conversation_id,
            provider: provider.into(),
            model: model.into(),
            prompt_tokens,
            completion_tokens,
            cost_cents,
            purpose,
            occurred_at: Timestamp::now(),
        }
    }

    /// Total tokens used.
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Accumulated usage totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    /// Total cost in cents.
    pub total_cost_cents: u32,
    /// Total tokens used.
    pub total_tokens: u32,
    /// Number of requests.
    pub request_count: u32,
    /// Breakdown by pipeline stage.
    pub by_purpose: Vec<PurposeUsage>,
}

/// Usage breakdown for one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurposeUsage {
    /// Pipeline stage.
    pub purpose: RequestPurpose,
    /// Cost in cents for this stage.
    pub cost_cents: u32,
    /// Tokens used by this stage.
    pub tokens: u32,
    /// Number of requests from this stage.
    pub requests: u32,
}

/// Port for recording and querying generation-service usage.
///
/// Implementations may store usage in memory, a JSON file, or a database.
#[async_trait]
pub trait UsageTracker: Send + Sync {
    /// Records a usage event.
    async fn record_usage(&self, record: UsageRecord) -> Result<(), UsageTrackerError>;

    /// Returns accumulated totals across all recorded usage.
    async fn total_usage(&self) -> Result<UsageSummary, UsageTrackerError>;
}

/// Errors from the usage tracker.
#[derive(Debug, thiserror::Error)]
pub enum UsageTrackerError {
    /// Storage backend failure.
    #[error("usage storage error: {0}")]
    Storage(String),

    /// Stored usage data could not be read back.
    #[error("usage data corrupted: {0}")]
    Corrupted(String),
}
