use std::collections::HashMap;

use rand::Rng;

use serde::{Deserialize, Serialize};


/// Represents a state in the Markov chain.
///
/// A `State` corresponds to a fixed n-word context (`key`) and stores
/// all observed transitions from this context to the next word.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Predict the next word using weighted random sampling
/// - Merge with another state having the same key (parallel training support)
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct State {
	/// Identifier of the state (space-joined n-word context).
	key: String,
	/// Outgoing transitions indexed by the next word.
	/// The value represents how many times this transition was observed.
	/// Example: { "sat" => 42, "ran" => 3 }
	transitions: HashMap<String, usize>
}

impl State {
	/// Creates a new empty state for the given context.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			transitions: HashMap::new(),
		}
	}

	/// Records an occurrence of a transition toward `next_word`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, next_word: &str) {
		*self.transitions.entry(next_word.to_owned()).or_insert(0) += 1;
	}

	/// Returns how many times the transition toward `next_word` was observed.
	pub fn occurrence(&self, next_word: &str) -> usize {
		self.transitions.get(next_word).copied().unwrap_or(0)
	}

	/// Predicts the next word using weighted random sampling.
	///
	/// The probability of selecting a word is proportional to its
	/// occurrence count.
	///
	/// This method performs:
	/// - an O(n) scan over the transitions
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict(&self) -> Option<&str> {
		if self.transitions.is_empty() {
			return None;
		}

		// Compute the total number of occurrences
		let total: usize = self.transitions.iter().map(|(_, occurrence)| occurrence).sum();
		if total == 0 {
			// Should not happen due to invariants, but kept for safety
			return None;
		}

		// Randomly select a word
		let mut r = rand::rng().random_range(0..total);

		let mut fallback: Option<&str> = None;
		for (next_word, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next_word);
			}
			r -= occurrence;
			fallback = Some(next_word);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same context (`key`).
	/// Transition occurrence counts are summed.
	///
	/// This method is intended for parallel training,
	/// where multiple partial models are combined into a single one.
	///
	/// # Errors
	/// Returns an error if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err("Key mismatch".to_owned());
		}

		for (next_word, occurrence) in &other.transitions {
			*self.transitions.entry(next_word.clone()).or_insert(0) += *occurrence;
		}

		Ok(())
	}
}
