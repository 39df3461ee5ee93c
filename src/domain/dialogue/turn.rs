//! A single turn in a two-party dialogue.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::SpeakerName;

/// One utterance by one speaker. Immutable once appended to a dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    speaker: SpeakerName,
    content: String,
}

impl Turn {
    /// Creates a new turn.
    pub fn new(speaker: SpeakerName, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
        }
    }

    /// Who spoke this turn.
    pub fn speaker(&self) -> &SpeakerName {
        &self.speaker
    }

    /// What was said.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Renders this turn as a `"<speaker>: <content>."` transcript line.
    ///
    /// A period is appended when the content ends in a letter or digit so
    /// that serialized turns read as complete sentences.
    pub fn transcript_line(&self) -> String {
        let mut content = self.content.clone();
        if content.chars().last().is_some_and(|c| c.is_alphanumeric()) {
            content.push('.');
        }
        format!("{}: {}", self.speaker, content)
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.content)
    }
}
