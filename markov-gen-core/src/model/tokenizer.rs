/// Splits raw text into sentence-candidate segments.
///
/// Segments are delimiter-exclusive: any `.`, `!` or `?` character ends the
/// current segment. Runs of delimiters produce empty segments, which tokenize
/// to nothing and are ignored downstream.
pub fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
	text.split(['.', '!', '?'])
}

/// Converts raw text into a sequence of normalized word tokens.
///
/// A token is a maximal run of word characters (Unicode alphanumeric or `_`),
/// apostrophes and hyphens, trimmed so that it starts and ends on a word
/// character. Every token is lowercased. Empty results are discarded.
///
/// Pure and deterministic; empty input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut tokens = Vec::new();
	let mut current = String::new();

	for c in text.chars() {
		if is_word_char(c) || c == '\'' || c == '-' {
			// Lowercasing can expand to several characters
			current.extend(c.to_lowercase());
		} else {
			flush(&mut current, &mut tokens);
		}
	}
	flush(&mut current, &mut tokens);

	tokens
}

/// Word characters follow the usual word-boundary definition:
/// alphanumeric (Unicode) plus underscore.
fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

/// Terminates the current run: trims leading/trailing apostrophes and
/// hyphens (a token must begin and end on a word character) and keeps
/// the result if anything remains.
fn flush(current: &mut String, tokens: &mut Vec<String>) {
	if current.is_empty() {
		return;
	}
	let trimmed = current.trim_matches(|c: char| c == '\'' || c == '-');
	if !trimmed.is_empty() {
		tokens.push(trimmed.to_owned());
	}
	current.clear();
}
