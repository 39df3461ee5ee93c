//! Ports - capability contracts consumed by the orchestration engine.
//!
//! The knowledge base and the generation service are external collaborators;
//! these traits define exactly what the engine needs from them, nothing more.

mod ai_provider;
mod knowledge_base;
mod usage_tracker;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use knowledge_base::{ClaimFilter, KnowledgeBase, KnowledgeBaseError};
pub use usage_tracker::{PurposeUsage, UsageRecord, UsageSummary, UsageTracker, UsageTrackerError};
