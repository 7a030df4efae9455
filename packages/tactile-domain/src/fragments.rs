//! Heuristic extraction of catalog-name fragments from free-form questions.
//!
//! A fragment is a run of capitalized words ("Gateron Yellow V99"). Leading question and filler
//! words are stripped. Single-word runs survive only when they look like a model code, i.e.
//! they contain a digit or at least two uppercase letters ("U4T", "JWK").

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

pub const MIN_FRAGMENT_CHARS: usize = 2;

const LEADING_STOP_WORDS: &[&str] = &[
	"a", "an", "and", "are", "between", "can", "compare", "could", "describe", "do", "does",
	"explain", "give", "how", "i", "is", "list", "or", "please", "should", "show", "tell", "the",
	"versus", "vs", "what", "when", "where", "which", "who", "why", "would",
];

static CAPITALIZED_RUN: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"\b[A-Z][A-Za-z0-9'-]*(?:[ \t]+[A-Z0-9][A-Za-z0-9'-]*)*").ok());

pub fn extract_name_fragments(query: &str) -> Vec<String> {
	let Some(pattern) = CAPITALIZED_RUN.as_ref() else { return Vec::new() };
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for found in pattern.find_iter(query) {
		let words: Vec<&str> = found
			.as_str()
			.split_whitespace()
			.skip_while(|word| LEADING_STOP_WORDS.contains(&word.to_lowercase().as_str()))
			.collect();

		if !keeps_fragment(&words) {
			continue;
		}

		let fragment = words.join(" ");

		if fragment.chars().count() < MIN_FRAGMENT_CHARS {
			continue;
		}
		if seen.insert(fragment.to_lowercase()) {
			out.push(fragment);
		}
	}

	out
}

fn keeps_fragment(words: &[&str]) -> bool {
	match words {
		[] => false,
		[single] => looks_like_model_code(single),
		_ => true,
	}
}

fn looks_like_model_code(word: &str) -> bool {
	word.chars().any(|ch| ch.is_ascii_digit())
		|| word.chars().filter(|ch| ch.is_uppercase()).count() >= 2
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_multi_word_names() {
		assert_eq!(
			extract_name_fragments("How does the Gateron Yellow compare to Cherry MX Red?"),
			vec!["Gateron Yellow", "Cherry MX Red"]
		);
	}

	#[test]
	fn strips_leading_question_words() {
		assert_eq!(extract_name_fragments("Compare Oil King and Holy Panda"), vec![
			"Oil King",
			"Holy Panda"
		]);
	}

	#[test]
	fn keeps_model_codes_and_drops_plain_words() {
		assert_eq!(extract_name_fragments("Is Boba U4T better? Tactile feel matters"), vec![
			"Boba U4T"
		]);
		assert_eq!(extract_name_fragments("What about JWK stems?"), vec!["JWK"]);
		assert!(extract_name_fragments("Linear switches are smooth").is_empty());
	}

	#[test]
	fn deduplicates_case_insensitively() {
		assert_eq!(extract_name_fragments("Cherry MX Red or CHERRY MX RED"), vec![
			"Cherry MX Red"
		]);
	}

	#[test]
	fn lowercase_query_yields_nothing() {
		assert!(extract_name_fragments("which switch is quietest").is_empty());
	}
}
