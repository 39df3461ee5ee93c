//! Knowledge Base Port - Interface to the pro/con claim store.
//!
//! The knowledge base owns claim parsing, the argument graph, and
//! nearest-neighbor lookup over claims; this crate only consumes those
//! capabilities. Claims are opaque text keys: the engine never constructs
//! them, it only receives them together with their ordered pro/con argument
//! lists.
//!
//! # Candidate-ordering invariant
//!
//! [`KnowledgeBase::score_all`] must score the same candidate set in the
//! same, stable order on every call. The relevance scorer combines score
//! vectors from several calls elementwise; if the implementation reorders
//! candidates between calls, the combined scores are meaningless.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::engine::ScoreVector;

/// Restricts which claims a query considers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimFilter {
    /// Every claim in the knowledge base.
    #[default]
    All,
    /// Only claims that list at least one counter-argument.
    HasCounterArguments,
}

/// Port for knowledge-base lookups.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// A random claim suitable as an opening move.
    async fn random_opening_claim(&self) -> Result<String, KnowledgeBaseError>;

    /// The `n` claims closest to `query`, best first.
    async fn closest_claims(
        &self,
        query: &str,
        n: usize,
        filter: ClaimFilter,
    ) -> Result<Vec<String>, KnowledgeBaseError>;

    /// Similarity of `query` to every candidate claim, in the stable
    /// candidate order (see module docs).
    async fn score_all(
        &self,
        query: &str,
        filter: ClaimFilter,
    ) -> Result<ScoreVector, KnowledgeBaseError>;

    /// The highest similarity of `query` to any candidate claim.
    async fn max_score(&self, query: &str, filter: ClaimFilter)
        -> Result<f64, KnowledgeBaseError>;

    /// Ordered supporting arguments attached to `claim`.
    async fn pros_of(&self, claim: &str) -> Result<Vec<String>, KnowledgeBaseError>;

    /// Ordered opposing arguments attached to `claim`.
    async fn cons_of(&self, claim: &str) -> Result<Vec<String>, KnowledgeBaseError>;

    /// Resolves a candidate index from a [`score_all`](Self::score_all)
    /// vector back to its claim key.
    async fn resolve_by_index(
        &self,
        query: &str,
        index: usize,
        filter: ClaimFilter,
    ) -> Result<String, KnowledgeBaseError>;
}

/// Errors from the knowledge base.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    /// The store holds no claims matching the filter.
    #[error("no claims match filter {filter:?}")]
    NoMatchingClaims {
        /// Filter that produced the empty result.
        filter: ClaimFilter,
    },

    /// A claim key was not found in the store.
    #[error("unknown claim: {0}")]
    UnknownClaim(String),

    /// A candidate index fell outside the scored candidate set.
    #[error("candidate index {index} out of range for {len} candidates")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of candidates.
        len: usize,
    },

    /// Backend failure (storage, embedding service, ...).
    #[error("knowledge base backend error: {0}")]
    Backend(String),
}
