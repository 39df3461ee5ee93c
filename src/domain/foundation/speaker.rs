//! Speaker name value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Reserved speaker label used for the fixed in-context demonstration
/// exchanges. No real participant may carry this name, so the generation
/// service can be told to ignore it when extracting meaning.
pub const DEMO_SPEAKER: &str = "DemoUser";

/// Name of one party in a dialogue.
///
/// Speaker names are serialized into transcripts as `"<name>: <content>"`
/// lines and matched back out of generated text by the response sanitizer,
/// so they may not be empty or contain `:` or line breaks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerName(String);

impl SpeakerName {
    /// Creates a validated speaker name.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("speaker"));
        }
        if name.contains(':') || name.contains('\n') || name.contains('\r') {
            return Err(ValidationError::invalid_format(
                "speaker",
                "must not contain ':' or line breaks",
            ));
        }
        if name == DEMO_SPEAKER {
            return Err(ValidationError::reserved_name(name));
        }

        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `"<name>:"` label this speaker's turns carry in
    /// serialized transcripts.
    pub fn label(&self) -> String {
        format!("{}:", self.0)
    }
}

impl fmt::Display for SpeakerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SpeakerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
