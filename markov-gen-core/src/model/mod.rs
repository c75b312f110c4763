//! Top-level module for the Markov sentence generation system.
//!
//! This crate provides a word-level Markov text generator, including:
//! - The fixed-order chain model (`MarkovChain`)
//! - Word tokenization and sentence splitting (`tokenizer`)
//! - Internal state management (`State`)
//! - Generation configuration (`GenerationInput`)

/// Fixed-order Markov chain over word contexts (`n >= 1`).
///
/// Handles corpus ingestion, transition counting, sentence-boundary
/// tracking, weighted sentence generation, and model merging.
pub mod markov_chain;

/// Word tokenization and sentence splitting.
///
/// Pure functions converting raw text into normalized word tokens
/// and delimiter-exclusive sentence segments.
pub mod tokenizer;

/// Internal representation of a single chain state (word context).
///
/// Tracks outgoing transitions and supports weighted random sampling.
/// This module is not exposed publicly.
mod state;

/// Generation configuration structure.
///
/// Stores generation parameters such as sentence length bounds,
/// sentence count, and the boundary stop probability.
pub mod generation_input;
