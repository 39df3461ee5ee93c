//! Error types for the orchestration engine.

use crate::ports::{AIError, KnowledgeBaseError};

use super::scoring::ScoringError;
use super::selection::SelectionError;

/// Errors that end the current turn.
///
/// Generation-service failures are not handled internally; they propagate to
/// the caller, who owns retry policy. An empty retrieval result where a
/// reply is required is unrecoverable for the turn: the engine will not
/// guess.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Retrieval produced no claim to reply with.
    #[error("knowledge base returned no claims relevant to the conversation")]
    NoRelevantClaims,

    /// The dialogue contains turns, but none from a counterpart.
    #[error("dialogue has no counterpart turns to respond to")]
    NoCounterpartTurns,

    /// Generation-service failure.
    #[error("generation service failure: {0}")]
    Provider(#[from] AIError),

    /// Knowledge-base failure.
    #[error("knowledge base failure: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    /// Relevance scoring failure.
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// Claim selection failure.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_convert_transparently() {
        let err: EngineError = AIError::unavailable("down").into();
        assert!(matches!(err, EngineError::Provider(_)));
        assert_eq!(
            err.to_string(),
            "generation service failure: provider unavailable: down"
        );
    }

    #[test]
    fn no_relevant_claims_displays_clearly() {
        assert_eq!(
            EngineError::NoRelevantClaims.to_string(),
            "knowledge base returned no claims relevant to the conversation"
        );
    }
}
