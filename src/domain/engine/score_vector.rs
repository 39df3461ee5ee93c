//! Per-candidate relevance scores from a single knowledge-base query.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Fixed-length vector of similarity scores, one entry per candidate claim.
///
/// Produced by one `score_all` query and never mutated afterwards; scoring
/// combines several of them into a new vector instead. All vectors being
/// combined must come from the same, consistently-ordered candidate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector(Vec<f64>);

impl ScoreVector {
    /// Wraps raw per-candidate scores.
    pub fn new(scores: Vec<f64>) -> Self {
        Self(scores)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the candidate set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Score of candidate `index`, if in range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Scores as a slice, in candidate order.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Index of the highest-scoring candidate. Ties resolve to the lowest
    /// index; `None` for an empty vector.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &score) in self.0.iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Indices of the `k` highest-scoring candidates, best first. Returns
    /// fewer than `k` when the candidate set is smaller.
    pub fn top_k(&self, k: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.0.len()).collect();
        indices.sort_by(|&a, &b| {
            self.0[b]
                .partial_cmp(&self.0[a])
                .unwrap_or(Ordering::Equal)
        });
        indices.truncate(k);
        indices
    }

    /// Weighted elementwise sum over equal-length vectors.
    ///
    /// `vectors` and `weights` must have the same count and every vector the
    /// same length.
    pub fn combine(vectors: &[ScoreVector], weights: &[f64]) -> Result<Self, ScoreVectorError> {
        if vectors.is_empty() {
            return Err(ScoreVectorError::NothingToCombine);
        }
        if vectors.len() != weights.len() {
            return Err(ScoreVectorError::WeightCountMismatch {
                vectors: vectors.len(),
                weights: weights.len(),
            });
        }

        let len = vectors[0].len();
        let mut combined = vec![0.0; len];
        for (vector, &weight) in vectors.iter().zip(weights) {
            if vector.len() != len {
                return Err(ScoreVectorError::LengthMismatch {
                    expected: len,
                    got: vector.len(),
                });
            }
            for (slot, &score) in combined.iter_mut().zip(vector.as_slice()) {
                *slot += weight * score;
            }
        }

        Ok(Self(combined))
    }
}

/// Errors from score vector combination.
#[derive(Debug, thiserror::Error)]
pub enum ScoreVectorError {
    /// Combine was called with no vectors.
    #[error("no score vectors to combine")]
    NothingToCombine,

    /// Vector and weight counts differ.
    #[error("{vectors} score vectors but {weights} weights")]
    WeightCountMismatch {
        /// Number of vectors.
        vectors: usize,
        /// Number of weights.
        weights: usize,
    },

    /// Vectors over differently-sized candidate sets cannot be combined.
    #[error("score vector length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Length of the first vector.
        expected: usize,
        /// Length of the offending vector.
        got: usize,
    },
}
