//! Confidence scoring for substring-based fuzzy name matches.
//!
//! `confidence = 0.7 * word_overlap + 0.3 * char_overlap`. Character overlap is positional:
//! index `i` counts when both lower-cased strings hold the same character at `i`.

pub const WORD_OVERLAP_WEIGHT: f32 = 0.7;
pub const CHAR_OVERLAP_WEIGHT: f32 = 0.3;
/// Upper bound for a fuzzy score when the two strings are not character-identical.
pub const FUZZY_CONFIDENCE_CEILING: f32 = 0.99;

pub fn fuzzy_confidence(query: &str, matched: &str) -> f32 {
	if query == matched {
		return 1.0;
	}

	let score = WORD_OVERLAP_WEIGHT * word_overlap(query, matched)
		+ CHAR_OVERLAP_WEIGHT * char_overlap(query, matched);

	score.clamp(0.0, FUZZY_CONFIDENCE_CEILING)
}

/// Share of query tokens that contain, or are contained in, some token of the matched name.
pub fn word_overlap(query: &str, matched: &str) -> f32 {
	let query_tokens = tokenize(query);
	let matched_tokens = tokenize(matched);
	let denom = query_tokens.len().max(matched_tokens.len());

	if denom == 0 {
		return 0.0;
	}

	let hits = query_tokens
		.iter()
		.filter(|query_token| {
			matched_tokens.iter().any(|matched_token| {
				matched_token.contains(query_token.as_str())
					|| query_token.contains(matched_token.as_str())
			})
		})
		.count();

	hits as f32 / denom as f32
}

pub fn char_overlap(query: &str, matched: &str) -> f32 {
	let query_chars: Vec<char> = query.to_lowercase().chars().collect();
	let matched_chars: Vec<char> = matched.to_lowercase().chars().collect();
	let denom = query_chars.len().max(matched_chars.len());

	if denom == 0 {
		return 0.0;
	}

	let hits = query_chars.iter().zip(matched_chars.iter()).filter(|(a, b)| a == b).count();

	hits as f32 / denom as f32
}

pub fn tokenize(text: &str) -> Vec<String> {
	text.split_whitespace().map(str::to_lowercase).collect()
}
