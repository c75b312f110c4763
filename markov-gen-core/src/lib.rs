//! Word-level Markov chain text generation library.
//!
//! This crate provides an n-gram sentence generation system including:
//! - Word tokenization with sentence-boundary splitting
//! - A fixed-order Markov chain over word contexts
//! - Weighted probabilistic sentence generation with boundary-aware stopping
//! - Internal utilities for corpus loading
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core Markov chain model and generation logic.
///
/// This module exposes the high-level chain interface while keeping
/// internal state representations private.
pub mod model;

/// I/O utilities (corpus loading).
///
/// Not exposed
pub(crate) mod io;
