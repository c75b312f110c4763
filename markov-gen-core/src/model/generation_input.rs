/// Input parameters for sentence generation.
///
/// `GenerationInput` contains both **plain parameters** (length bounds,
/// sentence count) and **validated parameters** (the boundary stop
/// probability, which must stay in `[0.0, 1.0]`).
///
/// The defaults reproduce the historical behavior of the system: sentences
/// cap at 15 tokens, a generated text holds 5 sentences, and once a sentence
/// reaches 5 tokens each observed sentence-ending word stops the sentence
/// with probability 0.7. None of these values is tied to a corpus property,
/// so all of them are adjustable.
///
/// # Responsibilities
/// - Track generation parameters (`max_length`, `sentence_count`, `min_length`, `stop_probability`)
/// - Validate the stop probability range
///
/// # Invariants
/// - `stop_probability` is always within `[0.0, 1.0]`
#[derive(Clone, Debug)]
pub struct GenerationInput {
	/// Maximum number of tokens in a generated sentence.
	pub max_length: usize,

	/// Number of sentences concatenated by `generate_text`.
	pub sentence_count: usize,

	/// Minimum number of tokens before the stop rule may trigger.
	pub min_length: usize,

	/// Probability of stopping once an ender word is appended past `min_length`.
	stop_probability: f32,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			max_length: 15,
			sentence_count: 5,
			min_length: 5,
			stop_probability: 0.7,
		}
	}
}

impl GenerationInput {
	/// Returns the current stop probability.
	pub fn stop_probability(&self) -> f32 {
		self.stop_probability
	}

	/// Sets the stop probability (0.0..1.0).
	///
	/// # Errors
	/// Returns an error if the value is outside the valid range.
	pub fn set_stop_probability(&mut self, stop_probability: f32) -> Result<(), String> {
		if !(0.0..=1.0).contains(&stop_probability) {
			return Err("Stop probability must be between 0.0 and 1.0".to_owned());
		}
		self.stop_probability = stop_probability;
		Ok(())
	}
}
