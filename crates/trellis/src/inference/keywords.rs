//! Keyword extraction from free task text.

use std::collections::HashSet;

/// Tokens this short or shorter are never keywords.
const MAX_DISCARDED_TOKEN_LEN: usize = 2;

/// Common English function words that carry no domain meaning.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "before", "being", "but", "by", "can", "could", "did", "does", "each", "for", "from", "had",
    "has", "have", "how", "in", "into", "is", "it", "its", "just", "may", "more", "must", "not",
    "of", "on", "only", "or", "our", "should", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "to", "very", "was",
    "were", "what", "when", "where", "which", "while", "who", "will", "with", "would", "you",
    "your",
];

/// Normalize free text into a set of meaningful keywords.
///
/// The text is lower-cased, every character outside `[a-z0-9]` and
/// whitespace becomes a space, and the result is split on whitespace.
/// Tokens of two characters or fewer and stop words are dropped.
///
/// # Example
///
/// ```
/// use trellis::inference::extract_keywords;
///
/// let keywords = extract_keywords("Set up the Database Schema!");
/// assert_eq!(keywords.len(), 3);
/// assert!(keywords.contains("set"));
/// assert!(keywords.contains("database"));
/// assert!(keywords.contains("schema"));
/// ```
pub fn extract_keywords(text: &str) -> HashSet<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|token| token.len() > MAX_DISCARDED_TOKEN_LEN)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}
