//! Paraphrase & stance resolution for the counterpart's last turn.
//!
//! The counterpart's raw last turn is often elliptical ("what about
//! sanctuaries?"). Before the engine queries the knowledge base or composes
//! the final reply, it asks the generation service to restate that turn
//! explicitly; the richer variant also classifies it as question or
//! statement and arbitrates between the two readings.

use crate::domain::foundation::{ConversationId, SpeakerName, DEMO_SPEAKER};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata, RequestPurpose,
};

/// Fixed demonstration exchanges included with every rewrite request to
/// stabilize the output style. The demo speaker is a reserved identity; the
/// instructions tell the service to ignore it when extracting meaning.
const DEMO_EXCHANGES: [(&str, &str); 2] = [
    (
        "DemoUser: The vegan diet is not an option for some people.",
        "A vegan diet is not well-suited for people whose health or living \
         circumstances require specialised nutrition, and they may be unable \
         to remove animal products from their diet.",
    ),
    (
        "DemoUser: Self-checkout machines are ruining the shopping experience.",
        "Replacing staffed registers with self-checkout machines shifts the \
         work of scanning and bagging onto customers while making stores \
         feel impersonal and error-prone.",
    ),
];

/// Resolves the counterpart's last turn into an explicit restatement.
pub struct ParaphraseResolver<'a> {
    provider: &'a dyn AIProvider,
    agent: &'a SpeakerName,
    counterpart: &'a SpeakerName,
    conversation_id: ConversationId,
}

impl<'a> ParaphraseResolver<'a> {
    /// Creates a resolver for one turn of one conversation.
    pub fn new(
        provider: &'a dyn AIProvider,
        agent: &'a SpeakerName,
        counterpart: &'a SpeakerName,
        conversation_id: ConversationId,
    ) -> Self {
        Self {
            provider,
            agent,
            counterpart,
            conversation_id,
        }
    }

    /// Produces the working paraphrase of the counterpart's last turn.
    ///
    /// Always issues the explicit-rewrite request. With `classify_stance`
    /// set, a second request classifies the turn as question or statement
    /// and a third arbitrates between the two readings.
    pub async fn resolve(
        &self,
        transcript: &str,
        classify_stance: bool,
    ) -> Result<String, AIError> {
        let rewrite = self.explicit_rewrite(transcript).await?;
        if !classify_stance {
            return Ok(rewrite);
        }

        let stance = self.classify_stance(transcript).await?;
        self.arbitrate(transcript, rewrite, stance).await
    }

    /// Asks the service to restate the counterpart's last turn as an
    /// explicit first-person statement.
    async fn explicit_rewrite(&self, transcript: &str) -> Result<String, AIError> {
        let instruction = format!(
            "The following is a conversation between {counterpart} and {agent}.\n\
             {transcript}\n\n\
             Turn {counterpart}'s last reply into a more explicit reply, filling in \
             the information implied by the context of the whole conversation.\n\
             Weigh more recent turns heavier than earlier turns. The rewritten reply \
             must be in first person and must not mention the other speaker's name, \
             {agent}.\n\
             Do not add anything {counterpart} did not imply in the conversation.\n\
             Do not weigh in turns by {demo}; those are examples that show what an \
             explicit rewrite looks like.",
            counterpart = self.counterpart,
            agent = self.agent,
            transcript = transcript,
            demo = DEMO_SPEAKER,
        );

        let mut request = self
            .request(RequestPurpose::ExplicitRewrite)
            .with_message(MessageRole::User, &instruction);
        for (shown, rewritten) in DEMO_EXCHANGES {
            request = request
                .with_message(MessageRole::User, shown)
                .with_message(MessageRole::Assistant, rewritten);
        }
        request = request.with_message(MessageRole::User, &instruction);

        Ok(self.provider.complete(request).await?.content)
    }

    /// Asks whether the last turn is a question or a statement, and for the
    /// reasoning or stance behind it.
    async fn classify_stance(&self, transcript: &str) -> Result<String, AIError> {
        let prompt = format!(
            "The following is a conversation between {counterpart} and {agent}.\n\
             {transcript}\n\n\
             Is {counterpart}'s last reply a question or a statement?\n\
             If it is a question, why is {counterpart} asking it? What is the likely \
             reasoning behind the question?\n\
             If it is a statement, what is {counterpart}'s stance on the matter?",
            counterpart = self.counterpart,
            agent = self.agent,
            transcript = transcript,
        );

        let request = self
            .request(RequestPurpose::StanceClassification)
            .with_message(MessageRole::User, prompt);
        Ok(self.provider.complete(request).await?.content)
    }

    /// Presents both readings and asks for a literal score: `1` trusts the
    /// rewrite, `2` the classification, `3` both. Anything else falls back
    /// to the rewrite.
    async fn arbitrate(
        &self,
        transcript: &str,
        rewrite: String,
        stance: String,
    ) -> Result<String, AIError> {
        let prompt = format!(
            "The following is a conversation between {counterpart} and {agent}.\n\
             {transcript}\n\n\
             Here are two paragraphs. Which one describes {counterpart}'s last reply \
             more accurately?\n\
             Paragraph 1:\n{rewrite}\n\n\
             Paragraph 2:\n{stance}\n\n\
             If paragraph 1 describes {counterpart}'s last reply more accurately, \
             output a score of 1.\n\
             If paragraph 2 describes it more accurately, output a score of 2.\n\
             If both describe it equally accurately, output a score of 3.\n\
             Output only the score. Nothing else.",
            counterpart = self.counterpart,
            agent = self.agent,
            transcript = transcript,
            rewrite = rewrite,
            stance = stance,
        );

        let request = self
            .request(RequestPurpose::Arbitration)
            .with_message(MessageRole::User, prompt);
        let verdict = self.provider.complete(request).await?.content;

        match verdict.trim() {
            "1" => Ok(rewrite),
            "2" => Ok(stance),
            "3" => Ok(format!("{}\n{}", rewrite, stance)),
            other => {
                tracing::warn!(
                    verdict = other,
                    "ill-formed arbitration score; falling back to the explicit rewrite"
                );
                Ok(rewrite)
            }
        }
    }

    fn request(&self, purpose: RequestPurpose) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            self.conversation_id,
            self.agent.as_str(),
            purpose,
        ))
        .with_temperature(0.0)
    }
}
