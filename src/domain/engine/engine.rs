//! The DebateEngine orchestrator: one dialogue in, one reply out.

use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::dialogue::Dialogue;
use crate::domain::foundation::{
    ConversationId, RelevanceRating, SpeakerName, ValidationError,
};
use crate::ports::{
    AIProvider, ClaimFilter, CompletionRequest, KnowledgeBase, MessageRole, RequestMetadata,
    RequestPurpose,
};

use super::errors::EngineError;
use super::paraphrase::ParaphraseResolver;
use super::prompts::{EvidenceDocument, PromptComposer};
use super::sanitize::ResponseSanitizer;
use super::scoring::RelevanceScorer;
use super::selection::{Polarity, SelectionState};

/// When the engine answers straight from the knowledge base instead of
/// generating text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetrievalGate {
    /// Every non-opening turn is answered by direct retrieval.
    Always,
    /// Direct retrieval when the last counterpart turn's best similarity
    /// score exceeds this threshold.
    AboveScore(f64),
    /// Direct retrieval is never taken.
    Disabled,
}

/// How the relevance/alignment rating that picks the final template is
/// obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingMode {
    /// Ask the generation service for a 1-10 rating (midpoint on junk).
    Rated,
    /// Fix the rating at the scale maximum, always using the grounded
    /// template. A deliberate simplification: the ungrounded branch is
    /// unreachable under this mode.
    AlwaysGrounded,
}

/// How the grounding claim is resolved in the generative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimSource {
    /// Nearest claim to the resolved paraphrase.
    ClosestToParaphrase,
    /// Temporally-weighted scoring over all counterpart turns, with
    /// tie-avoidance against the previous turn's pick.
    WeightedHistory,
}

/// Configuration of the retrieval-augmented generative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RagBehavior {
    /// How the grounding claim is resolved.
    pub claim_source: ClaimSource,
    /// Also classify the counterpart's last turn as question/statement and
    /// arbitrate between the two paraphrases.
    pub classify_stance: bool,
    /// Use the per-conversation memory to avoid repeating arguments,
    /// synthesizing fresh ones once a pool is exhausted.
    pub deduplicate_evidence: bool,
    /// How the grounded/ungrounded template decision is graded.
    pub grading: GradingMode,
}

/// What the engine does when the retrieval gate does not fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplyMode {
    /// Reply with the claim text picked by weighted-history selection.
    Claim,
    /// Send the serialized transcript as-is and return the completion.
    Plain,
    /// The full retrieval-augmented pipeline.
    Rag(RagBehavior),
}

/// Tuning knobs and stage toggles for one engine.
///
/// The agent variants are configurations of one engine, not separate
/// implementations; see the preset constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// When to answer by direct retrieval.
    pub gate: RetrievalGate,
    /// How many closest claims the retrieval gate draws from.
    pub gate_top_n: usize,
    /// Exponential base for temporal turn weighting (`> 1`).
    pub weight_base: f64,
    /// Size of the top-scoring pool used to break selection ties.
    pub tie_break_pool: usize,
    /// Optional pacing delay before processing a non-opening turn.
    pub reply_delay: Option<Duration>,
    /// What happens when the gate does not fire.
    pub mode: ReplyMode,
}

impl EngineConfig {
    fn base() -> Self {
        Self {
            gate: RetrievalGate::Disabled,
            gate_top_n: 3,
            weight_base: 4.0,
            tie_break_pool: 3,
            reply_delay: None,
            mode: ReplyMode::Plain,
        }
    }

    /// Plain retrieval: every non-opening turn is answered with a random
    /// counter-argument of a close claim. No generation calls at all.
    pub fn retrieval() -> Self {
        Self {
            gate: RetrievalGate::Always,
            ..Self::base()
        }
    }

    /// Threshold-gated retrieval with a transcript-completion fallback.
    pub fn threshold_gated(threshold: f64) -> Self {
        Self {
            gate: RetrievalGate::AboveScore(threshold),
            mode: ReplyMode::Plain,
            ..Self::base()
        }
    }

    /// Threshold-gated retrieval falling back to weighted-history claim
    /// selection; the resolved claim text is the reply.
    pub fn weighted_retrieval(threshold: f64, weight_base: f64) -> Self {
        Self {
            gate: RetrievalGate::AboveScore(threshold),
            weight_base,
            mode: ReplyMode::Claim,
            ..Self::base()
        }
    }

    /// Single-pass retrieval-augmented generation: explicit rewrite, rated
    /// grounding decision, full argument lists, no repetition memory.
    pub fn single_pass_rag() -> Self {
        Self {
            mode: ReplyMode::Rag(RagBehavior {
                claim_source: ClaimSource::ClosestToParaphrase,
                classify_stance: false,
                deduplicate_evidence: false,
                grading: GradingMode::Rated,
            }),
            ..Self::base()
        }
    }

    /// The richest variant: stance classification with arbitration,
    /// argument deduplication with on-demand synthesis, always-grounded
    /// template, and a pacing delay between turns.
    pub fn rag_with_memory(reply_delay: Duration) -> Self {
        Self {
            reply_delay: Some(reply_delay),
            mode: ReplyMode::Rag(RagBehavior {
                claim_source: ClaimSource::ClosestToParaphrase,
                classify_stance: true,
                deduplicate_evidence: true,
                grading: GradingMode::AlwaysGrounded,
            }),
            ..Self::base()
        }
    }

    /// Validates the numeric parameters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.weight_base <= 1.0 {
            return Err(ValidationError::invalid_format(
                "weight_base",
                "must be greater than 1",
            ));
        }
        if self.gate_top_n == 0 {
            return Err(ValidationError::invalid_format(
                "gate_top_n",
                "must be at least 1",
            ));
        }
        if self.tie_break_pool < 2 {
            return Err(ValidationError::invalid_format(
                "tie_break_pool",
                "needs at least two candidates to break ties",
            ));
        }
        Ok(())
    }
}

/// Orchestrates one agent's replies.
///
/// Holds the injected service handles and the stage configuration; all
/// per-conversation state lives in the [`SelectionState`] passed to
/// [`respond`](Self::respond), so one engine instance can serve many
/// conversations as long as each owns its own state.
pub struct DebateEngine {
    name: SpeakerName,
    provider: Arc<dyn AIProvider>,
    knowledge: Arc<dyn KnowledgeBase>,
    config: EngineConfig,
}

impl DebateEngine {
    /// Creates an engine after validating its configuration.
    pub fn new(
        name: SpeakerName,
        provider: Arc<dyn AIProvider>,
        knowledge: Arc<dyn KnowledgeBase>,
        config: EngineConfig,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            name,
            provider,
            knowledge,
            config,
        })
    }

    /// The agent's name.
    pub fn name(&self) -> &SpeakerName {
        &self.name
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Produces the agent's next reply for `dialogue`.
    ///
    /// Stages run strictly sequentially; every service call blocks the
    /// pipeline until it returns. `state` must belong to this conversation
    /// alone and is reset when the dialogue is empty.
    pub async fn respond(
        &self,
        dialogue: &Dialogue,
        state: &mut SelectionState,
    ) -> Result<String, EngineError> {
        let Some(last_turn) = dialogue.last() else {
            // First turn: open with a random claim, starting from clean
            // per-conversation memory.
            state.reset();
            tracing::debug!(agent = %self.name, "opening move with fresh conversation state");
            return Ok(self.knowledge.random_opening_claim().await?);
        };

        if let Some(delay) = self.config.reply_delay {
            tokio::time::sleep(delay).await;
        }

        if self.gate_fires(last_turn.content()).await? {
            return self.retrieval_reply(last_turn.content()).await;
        }

        match &self.config.mode {
            ReplyMode::Claim => self.claim_reply(dialogue, state).await,
            ReplyMode::Plain => self.plain_reply(dialogue, state).await,
            ReplyMode::Rag(behavior) => self.rag_reply(*behavior, dialogue, state).await,
        }
    }

    /// Tier A check: is the last counterpart turn close enough to a known
    /// claim for a canned counter-argument?
    async fn gate_fires(&self, last_content: &str) -> Result<bool, EngineError> {
        match self.config.gate {
            RetrievalGate::Always => Ok(true),
            RetrievalGate::Disabled => Ok(false),
            RetrievalGate::AboveScore(threshold) => {
                let score = self
                    .knowledge
                    .max_score(last_content, ClaimFilter::HasCounterArguments)
                    .await?;
                tracing::debug!(score, threshold, "retrieval gate check");
                Ok(score > threshold)
            }
        }
    }

    /// Tier A reply: a random con argument of one of the closest claims.
    async fn retrieval_reply(&self, query: &str) -> Result<String, EngineError> {
        let neighbors = self
            .knowledge
            .closest_claims(query, self.config.gate_top_n, ClaimFilter::HasCounterArguments)
            .await?;
        let neighbor = {
            let mut rng = rand::thread_rng();
            neighbors.choose(&mut rng).cloned()
        }
        .ok_or(EngineError::NoRelevantClaims)?;
        tracing::debug!(claim = %neighbor, "direct retrieval reply");

        let cons = self.knowledge.cons_of(&neighbor).await?;
        let con = {
            let mut rng = rand::thread_rng();
            cons.choose(&mut rng).cloned()
        };
        con.ok_or(EngineError::NoRelevantClaims)
    }

    /// Tier B selection over the whole dialogue, resolved back to a claim.
    async fn claim_via_weighted_history(
        &self,
        dialogue: &Dialogue,
        state: &mut SelectionState,
    ) -> Result<String, EngineError> {
        let scorer = RelevanceScorer::new(self.config.weight_base)?;
        let scores = scorer
            .score(self.knowledge.as_ref(), dialogue, &self.name)
            .await?;

        let index = {
            let mut rng = rand::thread_rng();
            state.pick_claim_index(&scores, self.config.tie_break_pool, &mut rng)?
        };

        let query = dialogue
            .counterpart_turns(&self.name)
            .last()
            .ok_or(EngineError::NoCounterpartTurns)?
            .content()
            .to_string();
        Ok(self
            .knowledge
            .resolve_by_index(&query, index, ClaimFilter::HasCounterArguments)
            .await?)
    }

    /// Weighted-retrieval reply: the selected claim text is the answer.
    async fn claim_reply(
        &self,
        dialogue: &Dialogue,
        state: &mut SelectionState,
    ) -> Result<String, EngineError> {
        let claim = self.claim_via_weighted_history(dialogue, state).await?;
        tracing::debug!(claim = %claim, "weighted-history claim reply");
        Ok(claim)
    }

    /// Transcript-completion reply with no retrieval at all.
    async fn plain_reply(
        &self,
        dialogue: &Dialogue,
        state: &SelectionState,
    ) -> Result<String, EngineError> {
        let counterpart = dialogue
            .counterpart_of(&self.name)
            .cloned()
            .ok_or(EngineError::NoCounterpartTurns)?;

        let request = self
            .request(state.conversation_id(), RequestPurpose::FinalReply)
            .with_message(MessageRole::User, dialogue.transcript());
        let response = self.provider.complete(request).await?;

        Ok(ResponseSanitizer::new(&self.name, &counterpart).sanitize(&response.content))
    }

    /// The full generative pipeline: paraphrase, claim resolution, evidence
    /// deduplication, grading, template selection, final completion.
    async fn rag_reply(
        &self,
        behavior: RagBehavior,
        dialogue: &Dialogue,
        state: &mut SelectionState,
    ) -> Result<String, EngineError> {
        let counterpart = dialogue
            .counterpart_of(&self.name)
            .cloned()
            .ok_or(EngineError::NoCounterpartTurns)?;
        let transcript = dialogue.transcript();
        let conversation = state.conversation_id();

        let resolver = ParaphraseResolver::new(
            self.provider.as_ref(),
            &self.name,
            &counterpart,
            conversation,
        );
        let paraphrase = resolver
            .resolve(&transcript, behavior.classify_stance)
            .await?;

        let claim = match behavior.claim_source {
            ClaimSource::ClosestToParaphrase => self
                .knowledge
                .closest_claims(&paraphrase, 1, ClaimFilter::HasCounterArguments)
                .await?
                .into_iter()
                .next()
                .ok_or(EngineError::NoRelevantClaims)?,
            ClaimSource::WeightedHistory => {
                self.claim_via_weighted_history(dialogue, state).await?
            }
        };
        tracing::debug!(claim = %claim, "resolved grounding claim");

        let document = self
            .evidence_for(&behavior, &claim, conversation, state)
            .await?;

        let composer = PromptComposer::new(&self.name, &counterpart);
        let rating = match behavior.grading {
            GradingMode::AlwaysGrounded => RelevanceRating::maximum(),
            GradingMode::Rated => {
                let request = self
                    .request(conversation, RequestPurpose::SimilarityRating)
                    .with_message(
                        MessageRole::User,
                        composer.similarity_prompt(&paraphrase, &document),
                    );
                let reply = self.provider.complete(request).await?.content;
                if reply.trim().parse::<i64>().is_err() {
                    tracing::warn!(
                        reply = %reply,
                        "non-numeric relevance rating; defaulting to the scale midpoint"
                    );
                }
                RelevanceRating::parse_lenient(&reply)
            }
        };

        // The grounded template needs evidence worth grounding in; a claim
        // with no surviving arguments routes to the ungrounded branch.
        let prompt = if rating.grounds_reply() && document.has_arguments() {
            composer.grounded_prompt(&transcript, &paraphrase, &document)
        } else {
            composer.ungrounded_prompt(&transcript, &paraphrase)
        };
        let request = self
            .request(conversation, RequestPurpose::FinalReply)
            .with_message(MessageRole::User, prompt);
        let response = self.provider.complete(request).await?;

        Ok(ResponseSanitizer::new(&self.name, &counterpart).sanitize(&response.content))
    }

    /// Gathers pro/con evidence for `claim`, deduplicated against the
    /// conversation memory when configured.
    async fn evidence_for(
        &self,
        behavior: &RagBehavior,
        claim: &str,
        conversation: ConversationId,
        state: &mut SelectionState,
    ) -> Result<EvidenceDocument, EngineError> {
        let pros = self.knowledge.pros_of(claim).await?;
        let cons = self.knowledge.cons_of(claim).await?;

        if !behavior.deduplicate_evidence {
            return Ok(EvidenceDocument::new(claim).with_pros(pros).with_cons(cons));
        }

        let pro = self
            .fresh_argument(claim, Polarity::Pro, &pros, conversation, state)
            .await?;
        let con = self
            .fresh_argument(claim, Polarity::Con, &cons, conversation, state)
            .await?;
        Ok(EvidenceDocument::new(claim)
            .with_pros(pro.into_iter().collect())
            .with_cons(con.into_iter().collect()))
    }

    /// Picks the first argument not yet surfaced in this conversation, or
    /// synthesizes one when the whole pool has been used. Empty pools yield
    /// no evidence of that polarity; that is not an error.
    async fn fresh_argument(
        &self,
        claim: &str,
        polarity: Polarity,
        candidates: &[String],
        conversation: ConversationId,
        state: &mut SelectionState,
    ) -> Result<Option<String>, EngineError> {
        if candidates.is_empty() {
            return Ok(None);
        }

        if let Some(fresh) = state.used_arguments().first_unused(candidates).cloned() {
            state.used_arguments_mut().mark_used(fresh.clone(), polarity);
            return Ok(Some(fresh));
        }

        tracing::debug!(claim = %claim, %polarity, "argument pool exhausted; synthesizing");
        let request = self
            .request(conversation, RequestPurpose::ArgumentSynthesis)
            .with_message(
                MessageRole::User,
                PromptComposer::synthesis_prompt(polarity, claim),
            );
        let text = self.provider.complete(request).await?.content;
        state.used_arguments_mut().mark_used(text.clone(), polarity);
        Ok(Some(text))
    }

    /// Zero-temperature request skeleton carrying attribution metadata.
    fn request(&self, conversation: ConversationId, purpose: RequestPurpose) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            conversation,
            self.name.as_str(),
            purpose,
        ))
        .with_temperature(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        assert!(EngineConfig::retrieval().validate().is_ok());
        assert!(EngineConfig::threshold_gated(7.0).validate().is_ok());
        assert!(EngineConfig::weighted_retrieval(4.0, 5.0).validate().is_ok());
        assert!(EngineConfig::single_pass_rag().validate().is_ok());
        assert!(EngineConfig::rag_with_memory(Duration::from_secs(5))
            .validate()
            .is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_weight_base() {
        let config = EngineConfig {
            weight_base: 1.0,
            ..EngineConfig::single_pass_rag()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_tiny_tie_break_pool() {
        let config = EngineConfig {
            tie_break_pool: 1,
            ..EngineConfig::weighted_retrieval(4.0, 5.0)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_gate_width() {
        let config = EngineConfig {
            gate_top_n: 0,
            ..EngineConfig::retrieval()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rag_with_memory_enables_every_stage() {
        let config = EngineConfig::rag_with_memory(Duration::from_secs(5));
        let ReplyMode::Rag(behavior) = config.mode else {
            panic!("expected RAG mode");
        };
        assert!(behavior.classify_stance);
        assert!(behavior.deduplicate_evidence);
        assert_eq!(behavior.grading, GradingMode::AlwaysGrounded);
        assert_eq!(config.reply_delay, Some(Duration::from_secs(5)));
    }

    #[test]
    fn single_pass_rag_keeps_the_rated_branch() {
        let config = EngineConfig::single_pass_rag();
        let ReplyMode::Rag(behavior) = config.mode else {
            panic!("expected RAG mode");
        };
        assert!(!behavior.classify_stance);
        assert!(!behavior.deduplicate_evidence);
        assert_eq!(behavior.grading, GradingMode::Rated);
    }
}
