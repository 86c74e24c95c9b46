//! Positive/negative sentiment stems

/// Stems that raise coherence when contained in a token
pub const POSITIVE_STEMS: &[&str] = &[
    "love", "joy", "peace", "happy", "grateful", "blessed", "hope", "light",
];

/// Stems that lower coherence when contained in a token
pub const NEGATIVE_STEMS: &[&str] = &[
    "hate", "anger", "fear", "conflict", "dark", "confused", "lost", "doubt",
];

/// Adjustment applied per matching token
pub const SENTIMENT_WEIGHT: f64 = 0.15;

/// Net sentiment adjustment over all tokens.
///
/// Every token is checked against both lists independently, so a token such
/// as "lovehate" contributes `+0.15` and `-0.15`. Repeated tokens each count.
pub fn sentiment_adjustment(tokens: &[String]) -> f64 {
    tokens.iter().fold(0.0, |score, token| {
        let mut score = score;
        if POSITIVE_STEMS.iter().any(|stem| token.contains(stem)) {
            score += SENTIMENT_WEIGHT;
        }
        if NEGATIVE_STEMS.iter().any(|stem| token.contains(stem)) {
            score -= SENTIMENT_WEIGHT;
        }
        score
    })
}
