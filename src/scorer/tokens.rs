//! Tokenization and keyword detection
//!
//! Tokens are maximal runs of word characters (letters, digits, underscore)
//! from the lowercased input. A keyword matches a token when either one is a
//! substring of the other, which tolerates naive stemming ("justic" finds
//! "justice") without a morphological analyzer. False positives are an
//! accepted cost of that approximation.

use crate::principles::{Principle, PrincipleTable};

/// Shortest token allowed to match as a fragment of a longer keyword
pub const MIN_STEM_LEN: usize = 3;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split text into lowercase word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Substring relationship in either direction
pub fn keyword_matches(keyword: &str, token: &str) -> bool {
    if token.contains(keyword) {
        return true;
    }
    token.chars().count() >= MIN_STEM_LEN && keyword.contains(token)
}

/// A principle with at least one matching keyword
#[derive(Debug, Clone, PartialEq)]
pub struct Detection<'a> {
    pub principle: &'a Principle,
    pub matched_keywords: Vec<&'a str>,
}

/// Detect principles in table order
pub fn detect<'a>(table: &'a PrincipleTable, tokens: &[String]) -> Vec<Detection<'a>> {
    table
        .iter()
        .filter_map(|principle| {
            let matched_keywords: Vec<&str> = principle
                .keywords
                .iter()
                .map(String::as_str)
                .filter(|keyword| tokens.iter().any(|token| keyword_matches(keyword, token)))
                .collect();

            if matched_keywords.is_empty() {
                None
            } else {
                Some(Detection {
                    principle,
                    matched_keywords,
                })
            }
        })
        .collect()
}
