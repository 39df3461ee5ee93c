//! Claim selection and per-conversation repetition state.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::ConversationId;

use super::score_vector::ScoreVector;

/// Whether an argument supports or opposes its claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Supporting argument.
    Pro,
    /// Opposing argument.
    Con,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Pro => write!(f, "pro"),
            Polarity::Con => write!(f, "con"),
        }
    }
}

/// Arguments already surfaced in this conversation, tagged by polarity.
///
/// Guarantees the agent never repeats a verbatim argument within one
/// conversation: the evidence selector takes the first list entry not yet
/// recorded here, and synthesized replacements are recorded too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedArgumentMemory {
    entries: HashMap<String, Polarity>,
}

impl UsedArgumentMemory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything (new conversation).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True when `argument` was already surfaced.
    pub fn is_used(&self, argument: &str) -> bool {
        self.entries.contains_key(argument)
    }

    /// Records a surfaced argument.
    pub fn mark_used(&mut self, argument: impl Into<String>, polarity: Polarity) {
        self.entries.insert(argument.into(), polarity);
    }

    /// First candidate not yet surfaced, in list order.
    pub fn first_unused<'a>(&self, candidates: &'a [String]) -> Option<&'a String> {
        candidates.iter().find(|c| !self.is_used(c))
    }

    /// Number of arguments surfaced so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been surfaced yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-conversation selection state.
///
/// Owned by exactly one conversation: holds the previously chosen claim
/// index (for tie-avoidance) and the used-argument memory. An agent serving
/// several conversations at once must keep one of these per conversation;
/// sharing leaks repetition-avoidance state between unrelated dialogues.
#[derive(Debug, Clone)]
pub struct SelectionState {
    conversation_id: ConversationId,
    previous_index: Option<usize>,
    used_arguments: UsedArgumentMemory,
}

impl SelectionState {
    /// Creates fresh state for a new conversation.
    pub fn new() -> Self {
        Self {
            conversation_id: ConversationId::new(),
            previous_index: None,
            used_arguments: UsedArgumentMemory::new(),
        }
    }

    /// Resets for a new conversation: fresh id, no previous index, empty
    /// argument memory. Called by the engine at turn zero.
    pub fn reset(&mut self) {
        self.conversation_id = ConversationId::new();
        self.previous_index = None;
        self.used_arguments.clear();
    }

    /// Identifier of the conversation this state belongs to.
    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Claim index chosen on the previous turn, if any.
    pub fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }

    /// The used-argument memory.
    pub fn used_arguments(&self) -> &UsedArgumentMemory {
        &self.used_arguments
    }

    /// Mutable access to the used-argument memory.
    pub fn used_arguments_mut(&mut self) -> &mut UsedArgumentMemory {
        &mut self.used_arguments
    }

    /// Picks the claim index for this turn from combined relevance scores.
    ///
    /// Takes the argmax, except when that repeats the index chosen on the
    /// immediately preceding turn: then a different index is sampled
    /// uniformly from the `tie_break_pool` highest-scoring candidates, so
    /// the agent does not fixate on one claim across consecutive turns. The
    /// chosen index becomes the new previous index.
    pub fn pick_claim_index<R: Rng + ?Sized>(
        &mut self,
        scores: &ScoreVector,
        tie_break_pool: usize,
        rng: &mut R,
    ) -> Result<usize, SelectionError> {
        let best = scores.argmax().ok_or(SelectionError::EmptyScores)?;

        let chosen = match self.previous_index {
            Some(previous) if previous == best => {
                let pool: Vec<usize> = scores
                    .top_k(tie_break_pool)
                    .into_iter()
                    .filter(|&i| i != previous)
                    .collect();
                // A single-candidate knowledge base leaves no alternative.
                pool.choose(rng).copied().unwrap_or(best)
            }
            _ => best,
        };

        self.previous_index = Some(chosen);
        Ok(chosen)
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from claim selection.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// The knowledge base scored an empty candidate set.
    #[error("cannot select a claim from an empty score vector")]
    EmptyScores,
}
