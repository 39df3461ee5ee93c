//! Final-instruction prompt composition.

use crate::domain::foundation::SpeakerName;

use super::selection::Polarity;

/// Retrieved evidence for one claim: the claim itself plus deduplicated (or
/// full) pro and con argument lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceDocument {
    claim: String,
    pros: Vec<String>,
    cons: Vec<String>,
}

impl EvidenceDocument {
    /// Creates a document for `claim` with no arguments attached yet.
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            pros: Vec::new(),
            cons: Vec::new(),
        }
    }

    /// Attaches supporting arguments.
    pub fn with_pros(mut self, pros: Vec<String>) -> Self {
        self.pros = pros;
        self
    }

    /// Attaches opposing arguments.
    pub fn with_cons(mut self, cons: Vec<String>) -> Self {
        self.cons = cons;
        self
    }

    /// The claim this evidence belongs to.
    pub fn claim(&self) -> &str {
        &self.claim
    }

    /// True when at least one argument is attached.
    pub fn has_arguments(&self) -> bool {
        !self.pros.is_empty() || !self.cons.is_empty()
    }

    /// Renders the document the way final prompts embed it.
    pub fn render(&self) -> String {
        let mut doc = format!(
            "One possibly related claim from the debate knowledge base:\n\t\"{}\"",
            self.claim
        );
        if !self.pros.is_empty() {
            doc.push('\n');
            doc.push_str(&bullet_block(
                "Some arguments from other debaters in favor of that claim:",
                &self.pros,
            ));
        }
        if !self.cons.is_empty() {
            doc.push('\n');
            doc.push_str(&bullet_block(
                "Some arguments from other debaters against that claim:",
                &self.cons,
            ));
        }
        doc
    }
}

fn bullet_block(header: &str, items: &[String]) -> String {
    let mut block = header.to_string();
    for item in items {
        block.push_str("\n\t* ");
        block.push_str(item);
    }
    block
}

/// Assembles the final instruction sent to the generation service.
#[derive(Debug, Clone, Copy)]
pub struct PromptComposer<'a> {
    agent: &'a SpeakerName,
    counterpart: &'a SpeakerName,
}

impl<'a> PromptComposer<'a> {
    /// Creates a composer for one agent/counterpart pair.
    pub fn new(agent: &'a SpeakerName, counterpart: &'a SpeakerName) -> Self {
        Self { agent, counterpart }
    }

    /// Request to rate how similar the paraphrase and the evidence document
    /// are, on a 1-10 scale, outputting only the number.
    pub fn similarity_prompt(&self, paraphrase: &str, document: &EvidenceDocument) -> String {
        format!(
            "How similar are this paragraph:\n{paraphrase}\n\n\
             and the following document?\n\n\
             Document:\n{document}\n\n\
             Rate the similarity on a scale from 1 to 10 and output only the number.",
            paraphrase = paraphrase,
            document = document.render(),
        )
    }

    /// Grounded template: the reply is formed from the evidence document,
    /// presented as knowledge the agent already has.
    pub fn grounded_prompt(
        &self,
        transcript: &str,
        paraphrase: &str,
        document: &EvidenceDocument,
    ) -> String {
        format!(
            "The following is a conversation between {counterpart} and {agent}.\n\
             {transcript}\n\n\
             {counterpart}'s last reply can be understood more clearly using the \
             following explanation.\n\
             Explanation: {paraphrase}\n\n\
             Keep that explanation in mind when reading {counterpart}'s last reply.\n\
             Help {agent} form a response using the following document:\n\
             {document}\n\n\
             Read the document and understand it. When you form the response, treat \
             the document's contents as things {agent} already knows, and do not \
             mention where the information came from.\n\
             Look at the previous conversation to figure out what the topic is. If \
             the document is related to the conversation, rely on it to form the \
             response.\n\
             If the explanation of {counterpart}'s last reply is a statement, decide \
             whether that viewpoint aligns with {agent}'s viewpoint.\n\
             If it aligns, invite {counterpart} to think about the opposing ideas \
             people hold against this viewpoint, using the document.\n\
             If it does not align, ask {counterpart} for their reasons and give the \
             reasons why {agent} sees it differently.\n\
             If the explanation of {counterpart}'s last reply is a question, give \
             {agent}'s answer with thorough and intelligent reasons, using the \
             document.\n\
             Look at the conversation again and do not repeat what {agent} \
             previously said.\n\
             {agent} is an ethical and intelligent person, and the reply should \
             reflect their values.\n\
             The response must be in first person, from {agent}'s point of view.",
            counterpart = self.counterpart,
            agent = self.agent,
            transcript = transcript,
            paraphrase = paraphrase,
            document = document.render(),
        )
    }

    /// Ungrounded template: same framing without the evidence document, used
    /// when the relevance rating is at or below the midpoint.
    pub fn ungrounded_prompt(&self, transcript: &str, paraphrase: &str) -> String {
        format!(
            "The following is a conversation between {counterpart} and {agent}.\n\
             {transcript}\n\n\
             {counterpart}'s last reply can be understood more clearly using the \
             following explanation.\n\
             Explanation: {paraphrase}\n\n\
             Keep that explanation in mind when reading {counterpart}'s last reply.\n\
             Help {agent} form a response.\n\
             Look at the previous conversation to figure out what the topic is. The \
             response should stay on that topic.\n\
             If the explanation of {counterpart}'s last reply is a statement, decide \
             whether that viewpoint aligns with {agent}'s viewpoint.\n\
             If it aligns, invite {counterpart} to think about the opposing ideas \
             people hold against this viewpoint.\n\
             If it does not align, ask {counterpart} for their reasons and give the \
             reasons why {agent} sees it differently.\n\
             If the explanation of {counterpart}'s last reply is a question, give \
             {agent}'s answer with thorough and intelligent reasons.\n\
             Look at the conversation again and do not repeat what {agent} \
             previously said.\n\
             {agent} is an ethical and intelligent person, and the reply should \
             reflect their values.\n\
             The response must be in first person, from {agent}'s point of view.",
            counterpart = self.counterpart,
            agent = self.agent,
            transcript = transcript,
            paraphrase = paraphrase,
        )
    }

    /// Request to synthesize one more argument for or against a claim, used
    /// when the knowledge base's pool is exhausted.
    pub fn synthesis_prompt(polarity: Polarity, claim: &str) -> String {
        match polarity {
            Polarity::Pro => format!("Give me an argument supporting this statement: {claim}"),
            Polarity::Con => format!("Give me an argument opposing this statement: {claim}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speaker(name: &str) -> SpeakerName {
        SpeakerName::new(name).unwrap()
    }

    fn sample_document() -> EvidenceDocument {
        EvidenceDocument::new("Zoos should be phased out")
            .with_pros(vec!["Animals suffer in captivity".to_string()])
            .with_cons(vec![
                "Zoos fund species conservation".to_string(),
                "Zoos educate the public".to_string(),
            ])
    }

    #[test]
    fn document_renders_claim_and_bullet_blocks() {
        let rendered = sample_document().render();

        assert!(rendered.starts_with(
            "One possibly related claim from the debate knowledge base:\n\t\"Zoos should be phased out\""
        ));
        assert!(rendered.contains("in favor of that claim:\n\t* Animals suffer in captivity"));
        assert!(rendered.contains(
            "against that claim:\n\t* Zoos fund species conservation\n\t* Zoos educate the public"
        ));
    }

    #[test]
    fn document_without_arguments_renders_claim_only() {
        let document = EvidenceDocument::new("A claim");
        assert!(!document.has_arguments());
        assert_eq!(
            document.render(),
            "One possibly related claim from the debate knowledge base:\n\t\"A claim\""
        );
    }

    #[test]
    fn grounded_prompt_embeds_all_parts() {
        let agent = speaker("Aria");
        let sam = speaker("Sam");
        let composer = PromptComposer::new(&agent, &sam);

        let prompt = composer.grounded_prompt(
            "Sam: zoos are fine.",
            "I believe zoos are acceptable.",
            &sample_document(),
        );

        assert!(prompt.contains("conversation between Sam and Aria"));
        assert!(prompt.contains("Sam: zoos are fine."));
        assert!(prompt.contains("Explanation: I believe zoos are acceptable."));
        assert!(prompt.contains("Zoos fund species conservation"));
        assert!(prompt.contains("do not repeat what Aria previously said"));
        assert!(prompt.contains("first person, from Aria's point of view"));
    }

    #[test]
    fn ungrounded_prompt_omits_the_document() {
        let agent = speaker("Aria");
        let sam = speaker("Sam");
        let composer = PromptComposer::new(&agent, &sam);

        let prompt = composer.ungrounded_prompt("Sam: zoos are fine.", "I like zoos.");

        assert!(prompt.contains("Help Aria form a response."));
        assert!(!prompt.contains("document"));
        assert!(prompt.contains("first person, from Aria's point of view"));
    }

    #[test]
    fn similarity_prompt_asks_for_a_bare_number() {
        let agent = speaker("Aria");
        let sam = speaker("Sam");
        let composer = PromptComposer::new(&agent, &sam);

        let prompt = composer.similarity_prompt("a paraphrase", &sample_document());
        assert!(prompt.contains("a paraphrase"));
        assert!(prompt.contains("scale from 1 to 10"));
        assert!(prompt.ends_with("output only the number."));
    }

    #[test]
    fn synthesis_prompt_matches_polarity() {
        assert_eq!(
            PromptComposer::synthesis_prompt(Polarity::Pro, "X is good"),
            "Give me an argument supporting this statement: X is good"
        );
        assert_eq!(
            PromptComposer::synthesis_prompt(Polarity::Con, "X is good"),
            "Give me an argument opposing this statement: X is good"
        );
    }
}
