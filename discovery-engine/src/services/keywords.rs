//! Keyword extraction for relevance matching
//!
//! Pure tokenizer: lowercase alphabetic tokens of length >= 3 with stop
//! words removed. Deterministic, no side effects.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Articles, common pronouns and auxiliary verbs excluded from keyword
/// matching.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Articles, conjunctions, short prepositions
        "the", "and", "for", "are", "was", "were",
        // Pronouns
        "you", "your", "they", "their", "them", "she", "her", "him", "his", "its", "our", "who",
        "that", "this", "these", "those", "what", "which",
        // Auxiliary verbs and common fillers
        "has", "have", "had", "been", "will", "would", "can", "could", "should", "may", "might",
        "must", "shall", "does", "did", "not", "but", "with", "from", "into", "about", "than",
        "then", "when", "where", "how", "all", "any", "each", "more", "most", "other", "some",
        "such", "only", "own", "same", "too", "very", "just", "also",
    ]
    .into_iter()
    .collect()
});

const MIN_TOKEN_LEN: usize = 3;

/// Extract the normalized keyword set from free text.
/// Empty or whitespace-only input yields an empty set.
pub fn extract_keywords(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphabetic())
        .map(|token| token.to_lowercase())
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .filter(|token| !STOP_WORDS.contains(token.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   ").is_empty());
    }

    #[test]
    fn test_lowercases_and_dedupes() {
        let keywords = extract_keywords("Django DJANGO django");
        assert_eq!(keywords.len(), 1);
        assert!(keywords.contains("django"));
    }

    #[test]
    fn test_filters_stop_words_and_short_tokens() {
        let keywords = extract_keywords("the quick brown fox is in a box");
        assert!(!keywords.contains("the"));
        assert!(!keywords.contains("is"));
        assert!(!keywords.contains("in"));
        assert!(keywords.contains("quick"));
        assert!(keywords.contains("brown"));
        assert!(keywords.contains("fox"));
        assert!(keywords.contains("box"));
    }

    #[test]
    fn test_splits_on_non_alphabetic() {
        let keywords = extract_keywords("rust-lang 2024: async/await!");
        assert!(keywords.contains("rust"));
        assert!(keywords.contains("lang"));
        assert!(keywords.contains("async"));
        assert!(keywords.contains("await"));
        assert!(!keywords.contains("2024"));
    }
}
