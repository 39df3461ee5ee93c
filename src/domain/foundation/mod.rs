//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod rating;
mod speaker;
mod timestamp;

pub use errors::ValidationError;
pub use ids::ConversationId;
pub use rating::RelevanceRating;
pub use speaker::{SpeakerName, DEMO_SPEAKER};
pub use timestamp::Timestamp;
