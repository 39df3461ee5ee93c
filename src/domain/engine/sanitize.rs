//! Deterministic cleanup of generated replies.
//!
//! The generation service sometimes echoes the agent's own name as a
//! `"Name:"` label, or keeps going and hallucinates further turns for both
//! parties. Every generated reply passes through here before it is returned.

use crate::domain::foundation::SpeakerName;

/// Strips speaker-label artifacts from one generated reply.
#[derive(Debug, Clone)]
pub struct ResponseSanitizer {
    agent_label: String,
    counterpart_label: String,
}

impl ResponseSanitizer {
    /// Creates a sanitizer for one agent/counterpart pair.
    pub fn new(agent: &SpeakerName, counterpart: &SpeakerName) -> Self {
        Self {
            agent_label: agent.label(),
            counterpart_label: counterpart.label(),
        }
    }

    /// Cleans one generated reply.
    ///
    /// 1. Repeatedly strips a leading `"<AgentName>:"` label (plus any
    ///    whitespace after it) until the text no longer starts with one.
    /// 2. Truncates at the first later occurrence of either speaker's
    ///    label, discarding hallucinated extra turns.
    ///
    /// Idempotent: sanitized text passes through unchanged.
    pub fn sanitize(&self, text: &str) -> String {
        let mut text = text.trim_start();
        while let Some(rest) = text.strip_prefix(&self.agent_label) {
            text = rest.trim_start();
        }

        let cut = [&self.agent_label, &self.counterpart_label]
            .iter()
            .filter_map(|label| text.find(label.as_str()))
            .min();
        let text = match cut {
            Some(index) => &text[..index],
            None => text,
        };

        text.trim_end().to_string()
    }
}
