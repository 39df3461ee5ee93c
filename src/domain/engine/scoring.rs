//! Temporally-weighted relevance scoring over the counterpart's turns.

use crate::domain::dialogue::Dialogue;
use crate::domain::foundation::SpeakerName;
use crate::ports::{ClaimFilter, KnowledgeBase, KnowledgeBaseError};

use super::score_vector::{ScoreVector, ScoreVectorError};

/// Normalized per-turn weights for the counterpart's turns, oldest first.
///
/// Turn `i` gets the unnormalized weight `base^i`, so the most recent turn
/// dominates exponentially over older ones. Weights always sum to 1 and are
/// strictly increasing with recency.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnWeights {
    weights: Vec<f64>,
}

impl TurnWeights {
    /// Builds the exponential weighting scheme for `count` turns.
    pub fn exponential(count: usize, base: f64) -> Result<Self, ScoringError> {
        if base <= 1.0 {
            return Err(ScoringError::InvalidBase(base));
        }
        if count == 0 {
            return Err(ScoringError::NoCounterpartTurns);
        }

        let raw: Vec<f64> = (0..count).map(|i| base.powi(i as i32)).collect();
        let sum: f64 = raw.iter().sum();
        Ok(Self {
            weights: raw.into_iter().map(|w| w / sum).collect(),
        })
    }

    /// Weights as a slice, oldest turn first.
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Number of weighted turns.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when no turns are weighted (never produced by `exponential`).
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Scores every candidate claim against the conversation so far.
///
/// Each counterpart turn is scored against the knowledge base separately,
/// then the per-turn score vectors are combined under [`TurnWeights`] into a
/// single ranking. The knowledge base must keep its candidate ordering
/// stable across the per-turn queries (see the port docs).
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    base: f64,
}

impl RelevanceScorer {
    /// Creates a scorer with the given exponential weighting base (`> 1`).
    pub fn new(base: f64) -> Result<Self, ScoringError> {
        if base <= 1.0 {
            return Err(ScoringError::InvalidBase(base));
        }
        Ok(Self { base })
    }

    /// The configured weighting base.
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Combined relevance of every candidate claim to the counterpart's
    /// side of `dialogue`.
    ///
    /// Fails with [`ScoringError::NoCounterpartTurns`] when the counterpart
    /// has not spoken yet; the first-turn branch above this component is
    /// expected to prevent that.
    pub async fn score(
        &self,
        knowledge: &dyn KnowledgeBase,
        dialogue: &Dialogue,
        agent: &SpeakerName,
    ) -> Result<ScoreVector, ScoringError> {
        let turns: Vec<_> = dialogue.counterpart_turns(agent).collect();
        let weights = TurnWeights::exponential(turns.len(), self.base)?;

        let mut vectors = Vec::with_capacity(turns.len());
        for turn in &turns {
            let vector = knowledge
                .score_all(turn.content(), ClaimFilter::HasCounterArguments)
                .await?;
            vectors.push(vector);
        }

        Ok(ScoreVector::combine(&vectors, weights.as_slice())?)
    }
}

/// Errors from relevance scoring.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// The exponential base must exceed 1 so recency strictly dominates.
    #[error("weighting base must be greater than 1, got {0}")]
    InvalidBase(f64),

    /// The counterpart has not spoken yet.
    #[error("dialogue has no counterpart turns to score")]
    NoCounterpartTurns,

    /// Per-turn score vectors could not be combined.
    #[error(transparent)]
    Combine(#[from] ScoreVectorError),

    /// Knowledge-base query failure.
    #[error(transparent)]
    KnowledgeBase(#[from] KnowledgeBaseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::Turn;
    use async_trait::async_trait;
    use proptest::prelude::*;

    #[test]
    fn exponential_weights_sum_to_one() {
        let weights = TurnWeights::exponential(5, 4.0).unwrap();
        let sum: f64 = weights.as_slice().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn exponential_weights_reject_base_at_or_below_one() {
        assert!(matches!(
            TurnWeights::exponential(3, 1.0),
            Err(ScoringError::InvalidBase(_))
        ));
        assert!(matches!(
            TurnWeights::exponential(3, 0.5),
            Err(ScoringError::InvalidBase(_))
        ));
    }

    #[test]
    fn exponential_weights_reject_zero_turns() {
        assert!(matches!(
            TurnWeights::exponential(0, 4.0),
            Err(ScoringError::NoCounterpartTurns)
        ));
    }

    proptest! {
        #[test]
        fn exponential_weights_strictly_increase_with_recency(
            count in 1usize..20,
            base in 1.01f64..16.0,
        ) {
            let weights = TurnWeights::exponential(count, base).unwrap();
            let slice = weights.as_slice();
            for pair in slice.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
            let sum: f64 = slice.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    /// Knowledge base stub returning fixed per-query score vectors.
    struct StubKnowledge;

    #[async_trait]
    impl KnowledgeBase for StubKnowledge {
        async fn random_opening_claim(&self) -> Result<String, KnowledgeBaseError> {
            Ok("stub claim".to_string())
        }

        async fn closest_claims(
            &self,
            _query: &str,
            _n: usize,
            _filter: ClaimFilter,
        ) -> Result<Vec<String>, KnowledgeBaseError> {
            Ok(vec![])
        }

        async fn score_all(
            &self,
            query: &str,
            _filter: ClaimFilter,
        ) -> Result<ScoreVector, KnowledgeBaseError> {
            // Candidate 0 matches "old", candidate 1 matches "new".
            match query {
                "old" => Ok(ScoreVector::new(vec![9.0, 1.0])),
                _ => Ok(ScoreVector::new(vec![1.0, 9.0])),
            }
        }

        async fn max_score(
            &self,
            _query: &str,
            _filter: ClaimFilter,
        ) -> Result<f64, KnowledgeBaseError> {
            Ok(0.0)
        }

        async fn pros_of(&self, _claim: &str) -> Result<Vec<String>, KnowledgeBaseError> {
            Ok(vec![])
        }

        async fn cons_of(&self, _claim: &str) -> Result<Vec<String>, KnowledgeBaseError> {
            Ok(vec![])
        }

        async fn resolve_by_index(
            &self,
            _query: &str,
            _index: usize,
            _filter: ClaimFilter,
        ) -> Result<String, KnowledgeBaseError> {
            Ok("stub claim".to_string())
        }
    }

    fn speaker(name: &str) -> SpeakerName {
        SpeakerName::new(name).unwrap()
    }

    #[tokio::test]
    async fn scorer_weights_recent_counterpart_turns_heavier() {
        let agent = speaker("Aria");
        let sam = speaker("Sam");

        let mut dialogue = Dialogue::new();
        dialogue.push(Turn::new(sam.clone(), "old"));
        dialogue.push(Turn::new(agent.clone(), "agent turn is ignored"));
        dialogue.push(Turn::new(sam.clone(), "new"));

        let scorer = RelevanceScorer::new(4.0).unwrap();
        let scores = scorer.score(&StubKnowledge, &dialogue, &agent).await.unwrap();

        // Weights are 0.2 / 0.8, so the candidate matching the newer turn
        // must win even though the older turn matched candidate 0 equally
        // strongly.
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.argmax(), Some(1));
    }

    #[tokio::test]
    async fn scorer_fails_without_counterpart_turns() {
        let agent = speaker("Aria");

        let mut dialogue = Dialogue::new();
        dialogue.push(Turn::new(agent.clone(), "talking to myself"));

        let scorer = RelevanceScorer::new(4.0).unwrap();
        let err = scorer.score(&StubKnowledge, &dialogue, &agent).await.unwrap_err();
        assert!(matches!(err, ScoringError::NoCounterpartTurns));
    }
}
