//! Polemic - Debate Agent Response Orchestration
//!
//! This crate turns a two-party dialogue history into a single agent reply by
//! scoring knowledge-base claims for relevance, choosing between direct
//! retrieval and grounded generation, and sanitizing the generated text.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
