//! Generation-service adapters and usage metering.

mod in_memory_usage_tracker;
mod json_usage_tracker;
mod metered_provider;
mod mock_provider;
mod openai_provider;

pub use in_memory_usage_tracker::InMemoryUsageTracker;
pub use json_usage_tracker::JsonFileUsageTracker;
pub use metered_provider::MeteredProvider;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
