use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use rand::Rng;
use rand::prelude::IteratorRandom;
use serde::{Deserialize, Serialize};

use crate::io;
use super::generation_input::GenerationInput;
use super::state::State;
use super::tokenizer;

/// Returned by `generate_sentence` when the chain holds no context at all.
const NO_DATA: &str = "No data available. Train the model first.";

/// Returned by `generate_sentence` when generation produced no token.
const EMPTY_GENERATION: &str = "Could not generate sentence.";

/// Represents a word-level Markov chain of fixed order `n`.
///
/// The `MarkovChain` stores states for contexts of `n` consecutive words
/// and allows probabilistic generation of sentences based on learned
/// word sequences. Words observed at sentence boundaries are tracked
/// separately to bias where generated sentences start and stop.
///
/// # Responsibilities
/// - Build the chain from a text corpus (in-memory or from a file)
/// - Accumulate transition counts for each word context
/// - Track sentence-starting and sentence-ending words
/// - Generate sentences by weighted random walk over the context space
/// - Merge with another chain of the same order `n`
///
/// # Invariants
/// - `n` is always >= 1
/// - Each state in `states` corresponds to a unique context of exactly `n` words
/// - All state transitions have occurrence counts >= 1
/// - `states`, `starters` and `enders` only grow; training is additive
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MarkovChain {
	/// The order of the chain (number of words in a context)
	n: usize, // must be >= 1

	/// Mapping from a space-joined context of `n` words to its state
	states: HashMap<String, State>,

	/// Words observed as the first token of a training sentence
	starters: HashSet<String>,

	/// Words observed as the last token of a training sentence
	enders: HashSet<String>,
}

impl MarkovChain {
	/// Creates a new Markov chain of order `n`.
	///
	/// # Errors
	/// Returns an error if `n < 1`.
	pub fn new(n: usize) -> Result<Self, String> {
		if n < 1 {
			return Err("n must be >= 1".to_owned());
		}
		Ok(Self {
			n,
			states: HashMap::new(),
			starters: HashSet::new(),
			enders: HashSet::new(),
		})
	}

	/// Returns the order of the chain.
	pub fn n(&self) -> usize {
		self.n
	}

	/// Returns the number of distinct contexts stored in the chain.
	pub fn context_count(&self) -> usize {
		self.states.len()
	}

	/// Returns true if the chain holds no context.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Returns how many times the transition from `context` (space-joined
	/// words) toward `next_word` was observed during training.
	///
	/// Unknown contexts yield 0.
	pub fn transition_count(&self, context: &str, next_word: &str) -> usize {
		self.states.get(context).map_or(0, |state| state.occurrence(next_word))
	}

	/// Trains the chain on an in-memory corpus.
	///
	/// The corpus is split into sentence segments on `.`, `!` and `?`,
	/// each segment is tokenized, and every window of `n + 1` consecutive
	/// tokens increments the corresponding transition count.
	///
	/// # Notes
	/// - Segments with fewer than `n` tokens are ignored entirely.
	/// - Safe to call multiple times: counts accumulate, nothing is reset.
	pub fn train_text(&mut self, corpus: &str) {
		for segment in tokenizer::split_sentences(corpus) {
			self.add_segment(segment);
		}
	}

	/// Trains the chain from a corpus file, splitting the work across threads.
	///
	/// # Parameters
	/// - `filepath`: Path to a UTF-8 text corpus.
	///
	/// # Returns
	/// - `Ok(())`: The corpus was ingested.
	/// - `Err(...)`: If the source cannot be located or read; the error is
	///   raised before any tokenization happens.
	///
	/// # Behavior
	/// - Splits the corpus into sentence segments, then into chunks
	///   (based on CPU cores * factor).
	/// - Spawns threads building a partial chain per chunk.
	/// - Merges all partial chains sequentially into this one.
	///
	/// # Notes
	/// - Uses MPSC channels to collect partial chains from threads.
	/// - Merging sums counts and unions boundary sets, so the result is
	///   exactly the one `train_text` would produce on the same content.
	pub fn train_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<(), Box<dyn std::error::Error>> {
		let text = io::read_file(&filepath)?;

		let segments: Vec<String> = tokenizer::split_sentences(&text)
			.map(str::to_owned)
			.collect();
		if segments.is_empty() {
			return Ok(());
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = ((segments.len() + chunks - 1) / chunks).max(1);

		let (tx, rx) = mpsc::channel();
		for chunk in segments.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();
			let n = self.n;

			thread::spawn(move || {
				// Cannot fail, the owning chain already validated n >= 1
				let mut partial_chain = MarkovChain::new(n).unwrap();
				for segment in &chunk {
					partial_chain.add_segment(segment);
				}
				tx.send(partial_chain).expect("Failed to send from thread");
			});
		}
		drop(tx);

		for partial_chain in rx.iter() {
			self.merge(&partial_chain)?;
		}

		Ok(())
	}

	/// Adds one sentence segment to the chain.
	///
	/// # Behavior
	/// - Tokenizes the segment; segments with fewer than `n` tokens are
	///   skipped before anything is recorded.
	/// - Records the first token as a starter and the last as an ender.
	/// - Increments one transition count per window of `n + 1` tokens.
	fn add_segment(&mut self, segment: &str) {
		let tokens = tokenizer::tokenize(segment);
		if tokens.len() < self.n {
			// Not enough words to form even one context
			return;
		}

		if let Some(first) = tokens.first() {
			self.starters.insert(first.clone());
		}
		if let Some(last) = tokens.last() {
			self.enders.insert(last.clone());
		}

		// For each (context, next word) window in the segment
		for i in 0..tokens.len() - self.n {
			let context = tokens[i..i + self.n].join(" ");
			let next_word = &tokens[i + self.n];

			// Get or create the state for this context
			let state = self.states.entry(context.clone()).or_insert_with(|| State::new(&context));
			state.add_transition(next_word);
		}
	}

	/// Merges another Markov chain into this one.
	///
	/// # Notes
	/// - Both chains must have the same order `n`.
	/// - Occurrence counts for matching states and transitions are summed.
	/// - Starter and ender sets are unioned.
	///
	/// # Errors
	/// Returns an error if the chain orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.n != other.n {
			return Err("N mismatch".to_owned());
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		self.starters.extend(other.starters.iter().cloned());
		self.enders.extend(other.enders.iter().cloned());

		Ok(())
	}

	/// Generates a single sentence by weighted random walk over the chain.
	///
	/// # Parameters
	/// - `input`: Generation parameters (length bounds, stop probability).
	///
	/// # Behavior
	/// - Picks a starting context uniformly among contexts whose first word
	///   is a known sentence starter, falling back to any context if none
	///   qualifies.
	/// - Extends the sentence with words sampled proportionally to their
	///   observed counts, advancing the trailing context each step.
	/// - Stops when the trailing context is unknown or when `input.max_length`
	///   tokens are reached. Once `input.min_length` tokens are reached and
	///   the appended word is a known sentence ender, it also stops with
	///   probability `input.stop_probability`.
	/// - Capitalizes the first word and ensures terminal punctuation.
	///
	/// # Notes
	/// - An untrained chain yields a fixed "no data" sentinel.
	/// - Never fails once the chain is non-empty.
	pub fn generate_sentence(&self, input: &GenerationInput) -> String {
		if self.states.is_empty() {
			return NO_DATA.to_owned();
		}

		let seed = self.states.keys()
			.filter(|key| {
				let first = key.split(' ').next().unwrap_or_default();
				self.starters.contains(first)
			})
			.choose(&mut rand::rng())
			.or_else(|| self.states.keys().choose(&mut rand::rng()));

		let mut sentence: Vec<String> = match seed {
			Some(seed) => seed.split(' ').map(str::to_owned).collect(),
			None => return EMPTY_GENERATION.to_owned(),
		};

		while sentence.len() < input.max_length {
			let context = sentence[sentence.len() - self.n..].join(" ");
			let next_word = match self.states.get(&context).and_then(State::predict) {
				Some(word) => word.to_owned(),
				// The walk reached a context with no known successor
				None => break,
			};

			let reached_ender = self.enders.contains(&next_word);
			sentence.push(next_word);

			if reached_ender
				&& sentence.len() >= input.min_length
				&& rand::rng().random_range(0.0..1.0) < input.stop_probability()
			{
				break;
			}
		}

		if sentence.is_empty() {
			return EMPTY_GENERATION.to_owned();
		}

		let capitalized: String = {
			let mut chars = sentence[0].chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect(),
				None => String::new(),
			}
		};
		sentence[0] = capitalized;

		if let Some(last) = sentence.last_mut() {
			if !last.ends_with(['.', '!', '?']) {
				last.push('.');
			}
		}

		sentence.join(" ")
	}

	/// Generates `input.sentence_count` independent sentences and joins
	/// them with single spaces.
	pub fn generate_text(&self, input: &GenerationInput) -> String {
		(0..input.sentence_count)
			.map(|_| self.generate_sentence(input))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_rejects_order_zero() {
		assert!(MarkovChain::new(0).is_err());
		assert!(MarkovChain::new(1).is_ok());
	}

	#[test]
	fn every_context_has_exactly_n_words() {
		let mut chain = MarkovChain::new(3).unwrap();
		chain.train_text("the quick brown fox jumps over the lazy dog. pack my box with five dozen jugs.");
		assert!(!chain.is_empty());
		for key in chain.states.keys() {
			assert_eq!(key.split(' ').count(), 3, "bad context: {key}");
		}
	}

	#[test]
	fn training_records_exact_counts_and_boundaries() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("The cat sat. The cat ran.");

		let starters: HashSet<String> = ["the".to_owned()].into();
		let enders: HashSet<String> = ["sat".to_owned(), "ran".to_owned()].into();
		assert_eq!(chain.starters, starters);
		assert_eq!(chain.enders, enders);

		assert_eq!(chain.context_count(), 1);
		assert_eq!(chain.transition_count("the cat", "sat"), 1);
		assert_eq!(chain.transition_count("the cat", "ran"), 1);

		// Sentence-final windows never become contexts, so the walk has
		// nothing to look up after "cat sat" / "cat ran" and must stop there
		assert!(!chain.states.contains_key("cat sat"));
		assert!(!chain.states.contains_key("cat ran"));
	}

	#[test]
	fn generation_from_boundary_context_stops_immediately() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("The cat sat. The cat ran.");
		let input = GenerationInput::default();
		for _ in 0..20 {
			let sentence = chain.generate_sentence(&input);
			assert!(
				sentence == "The cat sat." || sentence == "The cat ran.",
				"unexpected sentence: {sentence}"
			);
		}
	}

	#[test]
	fn untrained_chain_yields_no_data_sentinel() {
		let chain = MarkovChain::new(2).unwrap();
		assert_eq!(
			chain.generate_sentence(&GenerationInput::default()),
			"No data available. Train the model first."
		);
	}

	#[test]
	fn under_length_segments_are_ignored_entirely() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("word. another.");
		assert!(chain.is_empty());
		// Skipped segments contribute no boundary words either
		assert!(chain.starters.is_empty());
		assert!(chain.enders.is_empty());
	}

	#[test]
	fn segment_of_exactly_n_words_records_boundaries_only() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("the cat.");
		assert!(chain.is_empty());
		assert!(chain.starters.contains("the"));
		assert!(chain.enders.contains("cat"));
		assert_eq!(
			chain.generate_sentence(&GenerationInput::default()),
			"No data available. Train the model first."
		);
	}

	#[test]
	fn forced_path_generation_is_reproducible() {
		// Every choice point has exactly one candidate, so the output is
		// exact whatever the random source does
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("alpha beta gamma delta.");
		assert_eq!(
			chain.generate_sentence(&GenerationInput::default()),
			"Alpha beta gamma delta."
		);
	}

	#[test]
	fn stop_probability_one_stops_at_first_ender_past_min_length() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("alpha beta alpha beta alpha beta alpha beta.");

		let mut input = GenerationInput::default();
		input.set_stop_probability(1.0).unwrap();

		// "beta" is the only ender; the first one at or past 5 tokens is
		// the 6th word, so the walk always stops there
		assert_eq!(
			chain.generate_sentence(&input),
			"Alpha beta alpha beta alpha beta."
		);
	}

	#[test]
	fn stop_probability_zero_runs_to_max_length() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("alpha beta alpha beta alpha beta alpha beta.");

		let mut input = GenerationInput::default();
		input.set_stop_probability(0.0).unwrap();

		let sentence = chain.generate_sentence(&input);
		assert_eq!(sentence.split_whitespace().count(), 15);
		assert_eq!(
			sentence,
			"Alpha beta alpha beta alpha beta alpha beta alpha beta alpha beta alpha beta alpha."
		);
	}

	#[test]
	fn sentences_never_exceed_max_length() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("alpha beta alpha beta alpha beta alpha beta.");
		let input = GenerationInput::default();
		for _ in 0..50 {
			let sentence = chain.generate_sentence(&input);
			assert!(sentence.split_whitespace().count() <= input.max_length);
		}
	}

	#[test]
	fn order_one_chain_generates_from_single_word_contexts() {
		let mut chain = MarkovChain::new(1).unwrap();
		chain.train_text("a b.");
		assert_eq!(chain.transition_count("a", "b"), 1);
		assert_eq!(chain.generate_sentence(&GenerationInput::default()), "A b.");
	}

	#[test]
	fn training_twice_doubles_counts_without_new_contexts() {
		let corpus = "The cat sat. The cat ran.";
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text(corpus);
		let contexts_after_one = chain.context_count();

		chain.train_text(corpus);
		assert_eq!(chain.context_count(), contexts_after_one);
		assert_eq!(chain.transition_count("the cat", "sat"), 2);
		assert_eq!(chain.transition_count("the cat", "ran"), 2);
	}

	#[test]
	fn merge_rejects_order_mismatch() {
		let mut left = MarkovChain::new(2).unwrap();
		let right = MarkovChain::new(3).unwrap();
		assert!(left.merge(&right).is_err());
	}

	#[test]
	fn merge_sums_counts_and_unions_boundaries() {
		let mut left = MarkovChain::new(2).unwrap();
		left.train_text("The cat sat.");
		let mut right = MarkovChain::new(2).unwrap();
		right.train_text("The cat ran. A dog barked loudly.");

		left.merge(&right).unwrap();
		assert_eq!(left.transition_count("the cat", "sat"), 1);
		assert_eq!(left.transition_count("the cat", "ran"), 1);
		assert_eq!(left.transition_count("a dog", "barked"), 1);
		assert!(left.starters.contains("a"));
		assert!(left.enders.contains("loudly"));
	}

	#[test]
	fn train_file_missing_source_fails_fast() {
		let mut chain = MarkovChain::new(2).unwrap();
		let result = chain.train_file("./does/not/exist.txt");
		assert!(result.is_err());
		assert!(chain.is_empty());
	}

	#[test]
	fn train_file_matches_train_text_exactly() {
		let corpus = "The cat sat on the mat. The cat ran away! Did the dog see the cat? The dog barked.";
		let path = std::env::temp_dir().join("markov_gen_train_file_test.txt");
		std::fs::write(&path, corpus).unwrap();

		let mut from_file = MarkovChain::new(2).unwrap();
		from_file.train_file(&path).unwrap();
		let _ = std::fs::remove_file(&path);

		let mut from_text = MarkovChain::new(2).unwrap();
		from_text.train_text(corpus);

		assert_eq!(from_file.context_count(), from_text.context_count());
		assert_eq!(from_file.starters, from_text.starters);
		assert_eq!(from_file.enders, from_text.enders);
		for key in from_text.states.keys() {
			let expected = &from_text.states[key];
			for successor in ["the", "cat", "sat", "on", "mat", "ran", "away", "did", "dog", "see", "barked"] {
				assert_eq!(
					from_file.transition_count(key, successor),
					expected.occurrence(successor),
					"count mismatch for ({key}, {successor})"
				);
			}
		}
	}

	#[test]
	fn generate_text_joins_the_requested_number_of_sentences() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("alpha beta gamma delta.");
		let input = GenerationInput::default();
		assert_eq!(
			chain.generate_text(&input),
			"Alpha beta gamma delta. Alpha beta gamma delta. Alpha beta gamma delta. \
			 Alpha beta gamma delta. Alpha beta gamma delta."
		);
	}
}
