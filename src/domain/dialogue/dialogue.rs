//! Ordered transcript of turns exchanged between two parties.

use serde::{Deserialize, Serialize};

use super::Turn;
use crate::domain::foundation::SpeakerName;

/// Append-only ordered sequence of turns.
///
/// Owned by the conversation driver; the orchestration engine only reads it.
/// Insertion order is semantically meaningful: relevance scoring weights
/// recent turns more heavily than old ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    turns: Vec<Turn>,
}

impl Dialogue {
    /// Creates an empty dialogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn. Turns are never edited or removed afterwards.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Number of turns so far.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True before the opening move has been made.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn, if any.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Iterates over turns in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    /// Iterates over the turns not authored by `agent`, oldest first.
    pub fn counterpart_turns<'a>(
        &'a self,
        agent: &'a SpeakerName,
    ) -> impl Iterator<Item = &'a Turn> {
        self.turns.iter().filter(move |t| t.speaker() != agent)
    }

    /// The most recently seen speaker other than `agent`.
    pub fn counterpart_of(&self, agent: &SpeakerName) -> Option<&SpeakerName> {
        self.turns
            .iter()
            .rev()
            .map(|t| t.speaker())
            .find(|s| *s != agent)
    }

    /// Serializes the whole dialogue as one transcript, one
    /// `"<speaker>: <content>."` line per turn.
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(Turn::transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a Dialogue {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
