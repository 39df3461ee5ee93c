//! MeteredProvider - transparent usage metering around any AIProvider.
//!
//! Wraps a provider so that every completion records a [`UsageRecord`] with
//! the configured [`UsageTracker`]. The orchestration engine sees an
//! ordinary provider and must behave identically with or without the
//! wrapper; tracker failures are logged, never surfaced as completion
//! errors.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, UsageRecord,
    UsageTracker,
};

/// AIProvider decorator that records token usage per completion.
///
/// # Example
///
/// ```ignore
/// let tracked: Arc<dyn AIProvider> = Arc::new(MeteredProvider::new(
///     Arc::new(OpenAIProvider::new(config)),
///     Arc::new(InMemoryUsageTracker::new()),
/// ));
/// ```
pub struct MeteredProvider {
    inner: Arc<dyn AIProvider>,
    tracker: Arc<dyn UsageTracker>,
}

impl MeteredProvider {
    /// Wraps `inner` so its usage is recorded with `tracker`.
    pub fn new(inner: Arc<dyn AIProvider>, tracker: Arc<dyn UsageTracker>) -> Self {
        Self { inner, tracker }
    }
}

#[async_trait]
impl AIProvider for MeteredProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let metadata = request.metadata.clone();
        let response = self.inner.complete(request).await?;

        let record = UsageRecord::new(
            metadata.conversation_id,
            self.inner.provider_info().name,
            &response.model,
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.estimated_cost_cents,
            metadata.purpose,
        );
        if let Err(err) = self.tracker.record_usage(record).await {
            // Metering is best-effort; the completion already succeeded.
            tracing::warn!(error = %err, "failed to record usage");
        }

        Ok(response)
    }

    fn provider_info(&self) -> ProviderInfo {
        self.inner.provider_info()
    }
}
