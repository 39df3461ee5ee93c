//! In-memory knowledge base.
//!
//! A small, deterministic claim store for tests and demos. Similarity is
//! plain token overlap, not an embedding model; the real knowledge base is
//! an external collaborator and this adapter only has to honor the port
//! contract, in particular the stable candidate ordering that `score_all`
//! promises (candidates are always visited in insertion order).

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::domain::engine::ScoreVector;
use crate::ports::{ClaimFilter, KnowledgeBase, KnowledgeBaseError};

/// One claim with its attached argument lists.
#[derive(Debug, Clone)]
struct ClaimRecord {
    text: String,
    pros: Vec<String>,
    cons: Vec<String>,
}

impl ClaimRecord {
    fn matches(&self, filter: ClaimFilter) -> bool {
        match filter {
            ClaimFilter::All => true,
            ClaimFilter::HasCounterArguments => !self.cons.is_empty(),
        }
    }
}

/// Deterministic in-memory claim store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeBase {
    claims: Vec<ClaimRecord>,
}

impl InMemoryKnowledgeBase {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a claim with its pro and con argument lists.
    pub fn with_claim(
        mut self,
        text: impl Into<String>,
        pros: Vec<String>,
        cons: Vec<String>,
    ) -> Self {
        self.claims.push(ClaimRecord {
            text: text.into(),
            pros,
            cons,
        });
        self
    }

    /// Number of stored claims.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// True when no claims are stored.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Claims passing `filter`, in insertion order.
    fn candidates(&self, filter: ClaimFilter) -> Vec<&ClaimRecord> {
        self.claims.iter().filter(|c| c.matches(filter)).collect()
    }

    fn non_empty_candidates(
        &self,
        filter: ClaimFilter,
    ) -> Result<Vec<&ClaimRecord>, KnowledgeBaseError> {
        let candidates = self.candidates(filter);
        if candidates.is_empty() {
            return Err(KnowledgeBaseError::NoMatchingClaims { filter });
        }
        Ok(candidates)
    }

    fn find(&self, claim: &str) -> Result<&ClaimRecord, KnowledgeBaseError> {
        self.claims
            .iter()
            .find(|c| c.text == claim)
            .ok_or_else(|| KnowledgeBaseError::UnknownClaim(claim.to_string()))
    }

    /// Number of distinct lowercased tokens shared by `query` and `claim`.
    fn similarity(query: &str, claim: &str) -> f64 {
        let query_tokens = tokens(query);
        let claim_tokens = tokens(claim);
        query_tokens.intersection(&claim_tokens).count() as f64
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[async_trait]
impl KnowledgeBase for InMemoryKnowledgeBase {
    async fn random_opening_claim(&self) -> Result<String, KnowledgeBaseError> {
        let mut rng = rand::thread_rng();
        self.claims
            .choose(&mut rng)
            .map(|c| c.text.clone())
            .ok_or(KnowledgeBaseError::NoMatchingClaims {
                filter: ClaimFilter::All,
            })
    }

    async fn closest_claims(
        &self,
        query: &str,
        n: usize,
        filter: ClaimFilter,
    ) -> Result<Vec<String>, KnowledgeBaseError> {
        let candidates = self.non_empty_candidates(filter)?;

        let mut scored: Vec<(f64, &ClaimRecord)> = candidates
            .into_iter()
            .map(|c| (Self::similarity(query, &c.text), c))
            .collect();
        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(n)
            .map(|(_, c)| c.text.clone())
            .collect())
    }

    async fn score_all(
        &self,
        query: &str,
        filter: ClaimFilter,
    ) -> Result<ScoreVector, KnowledgeBaseError> {
        let candidates = self.non_empty_candidates(filter)?;
        Ok(ScoreVector::new(
            candidates
                .into_iter()
                .map(|c| Self::similarity(query, &c.text))
                .collect(),
        ))
    }

    async fn max_score(
        &self,
        query: &str,
        filter: ClaimFilter,
    ) -> Result<f64, KnowledgeBaseError> {
        let candidates = self.non_empty_candidates(filter)?;
        Ok(candidates
            .into_iter()
            .map(|c| Self::similarity(query, &c.text))
            .fold(0.0, f64::max))
    }

    async fn pros_of(&self, claim: &str) -> Result<Vec<String>, KnowledgeBaseError> {
        Ok(self.find(claim)?.pros.clone())
    }

    async fn cons_of(&self, claim: &str) -> Result<Vec<String>, KnowledgeBaseError> {
        Ok(self.find(claim)?.cons.clone())
    }

    async fn resolve_by_index(
        &self,
        _query: &str,
        index: usize,
        filter: ClaimFilter,
    ) -> Result<String, KnowledgeBaseError> {
        let candidates = self.candidates(filter);
        candidates
            .get(index)
            .map(|c| c.text.clone())
            .ok_or(KnowledgeBaseError::IndexOutOfRange {
                index,
                len: candidates.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    fn sample_kb() -> InMemoryKnowledgeBase {
        InMemoryKnowledgeBase::new()
            .with_claim(
                "Zoos should be closed down",
                args(&["Animals suffer in captivity"]),
                args(&["Zoos fund conservation", "Zoos educate visitors"]),
            )
            .with_claim(
                "School uniforms should be mandatory",
                args(&["Uniforms reduce peer pressure"]),
                args(&["Uniforms limit self-expression"]),
            )
            .with_claim(
                "Everyone agrees water is wet",
                args(&["It just is"]),
                vec![], // no cons: excluded by the counter-argument filter
            )
    }

    #[test]
    fn similarity_counts_shared_tokens() {
        assert_eq!(
            InMemoryKnowledgeBase::similarity("zoos should close", "Zoos should be closed down"),
            2.0 // "zoos", "should"
        );
        assert_eq!(InMemoryKnowledgeBase::similarity("unrelated", "Zoos"), 0.0);
    }

    #[tokio::test]
    async fn closest_claims_orders_by_overlap() {
        let kb = sample_kb();
        let closest = kb
            .closest_claims("should zoos be closed", 2, ClaimFilter::HasCounterArguments)
            .await
            .unwrap();

        assert_eq!(closest[0], "Zoos should be closed down");
        assert_eq!(closest.len(), 2);
    }

    #[tokio::test]
    async fn filter_excludes_claims_without_cons() {
        let kb = sample_kb();
        let scores = kb
            .score_all("water", ClaimFilter::HasCounterArguments)
            .await
            .unwrap();
        // Only the two claims with cons are candidates.
        assert_eq!(scores.len(), 2);

        let all = kb.score_all("water", ClaimFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn score_all_argmax_agrees_with_resolve_by_index() {
        let kb = sample_kb();
        let query = "mandatory school uniforms";

        let scores = kb
            .score_all(query, ClaimFilter::HasCounterArguments)
            .await
            .unwrap();
        let index = scores.argmax().unwrap();
        let claim = kb
            .resolve_by_index(query, index, ClaimFilter::HasCounterArguments)
            .await
            .unwrap();

        assert_eq!(claim, "School uniforms should be mandatory");
    }

    #[tokio::test]
    async fn max_score_matches_best_candidate() {
        let kb = sample_kb();
        let score = kb
            .max_score("zoos should be closed down", ClaimFilter::HasCounterArguments)
            .await
            .unwrap();
        assert_eq!(score, 5.0);
    }

    #[tokio::test]
    async fn empty_store_reports_no_matching_claims() {
        let kb = InMemoryKnowledgeBase::new();

        assert!(matches!(
            kb.random_opening_claim().await,
            Err(KnowledgeBaseError::NoMatchingClaims { .. })
        ));
        assert!(matches!(
            kb.closest_claims("q", 3, ClaimFilter::All).await,
            Err(KnowledgeBaseError::NoMatchingClaims { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_claim_is_an_error() {
        let kb = sample_kb();
        assert!(matches!(
            kb.pros_of("never stored").await,
            Err(KnowledgeBaseError::UnknownClaim(_))
        ));
    }

    #[tokio::test]
    async fn out_of_range_index_is_an_error() {
        let kb = sample_kb();
        let err = kb
            .resolve_by_index("q", 9, ClaimFilter::HasCounterArguments)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            KnowledgeBaseError::IndexOutOfRange { index: 9, len: 2 }
        ));
    }

    #[tokio::test]
    async fn opening_claim_comes_from_the_store() {
        let kb = sample_kb();
        let claim = kb.random_opening_claim().await.unwrap();
        assert!(kb.claims.iter().any(|c| c.text == claim));
    }
}
