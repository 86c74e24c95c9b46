//! Principle resonance scorer
//!
//! Turns free text into a [`ScoreResult`]:
//!
//! 1. Tokenize and detect principles by keyword ([`tokens`])
//! 2. Start from a base coherence of `0.5`, add `0.08` per matched keyword
//! 3. Apply sentiment adjustments ([`sentiment`])
//! 4. Clamp to `[0.30, 0.95]`, bucket into an [`EmotionalField`]
//! 5. Compose the human-readable message and recommendation
//!
//! Everything except the cosmic-sync pair and the timestamp is a pure
//! function of the text and the principle table. Those two come from the
//! injected [`RandomSource`] and [`Clock`], and [`Scorer::score_with`] takes
//! them explicitly.

pub mod result;
pub mod sentiment;
pub mod sources;
pub mod tokens;

pub use result::{CosmicSync, EmotionalField, ScoreResult};
pub use sources::{
    Clock, FixedClock, FixedRandom, RandomSource, SyncDraws, SystemClock, ThreadRngSource,
};
pub use tokens::{detect, tokenize, Detection};

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::principles::PrincipleTable;

/// Starting coherence before keywords and sentiment
pub const BASE_COHERENCE: f64 = 0.5;

/// Coherence added per matched keyword
pub const KEYWORD_WEIGHT: f64 = 0.08;

/// Lower clamp on fractional coherence
pub const MIN_COHERENCE: f64 = 0.30;

/// Upper clamp on fractional coherence
pub const MAX_COHERENCE: f64 = 0.95;

/// Frequency reported when nothing is detected
pub const DEFAULT_FREQUENCY: u32 = 528;

/// Coherence percentage above which a result is stable
pub const STABLE_THRESHOLD: f64 = 50.0;

pub const MAX_REPORTED_IDS: usize = 5;
pub const MAX_REPORTED_NAMES: usize = 3;

const SYNC_SPAN: f64 = 0.20;
const LUNAR_BASE: f64 = 0.75;
const LUNAR_UPPER: f64 = 0.95;
const GALACTIC_BASE: f64 = 0.65;
const GALACTIC_UPPER: f64 = 0.85;

const EXCELLENT_TAIL: &str = "Excellent alignment! ✨";
const GOOD_TAIL: &str = "Good alignment. 🌟";
const REFINE_TAIL: &str = "Refinement suggested. 💫";
const GENERIC_RECOMMENDATION: &str = "Meditate on the MA'AT principles.";

/// Scores text against a shared principle table
pub struct Scorer {
    table: Arc<PrincipleTable>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl Scorer {
    /// Scorer with thread RNG and the system clock
    pub fn new(table: Arc<PrincipleTable>) -> Self {
        Self::with_sources(table, Arc::new(ThreadRngSource), Arc::new(SystemClock))
    }

    pub fn with_sources(
        table: Arc<PrincipleTable>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            table,
            random,
            clock,
        }
    }

    pub fn table(&self) -> &PrincipleTable {
        &self.table
    }

    /// Score `text`, drawing sync values and the timestamp from the injected sources
    pub fn score(&self, text: &str) -> ScoreResult {
        let draws = SyncDraws::draw(self.random.as_ref());
        self.score_with(text, draws, self.clock.now())
    }

    /// Deterministic scoring with explicit draws and timestamp
    pub fn score_with(&self, text: &str, draws: SyncDraws, now: DateTime<Utc>) -> ScoreResult {
        let tokens = tokenize(text);
        let detections = detect(&self.table, &tokens);

        let fraction = coherence_fraction(&tokens, &detections);
        let emotional_field = EmotionalField::from_fraction(fraction);
        let coherence = fraction * 100.0;

        ScoreResult {
            coherence,
            emotional_field,
            matched_principle_ids: detections
                .iter()
                .take(MAX_REPORTED_IDS)
                .map(|d| d.principle.id)
                .collect(),
            matched_principle_names: detections
                .iter()
                .take(MAX_REPORTED_NAMES)
                .map(|d| d.principle.name.clone())
                .collect(),
            frequency: mean_frequency(&detections),
            cosmic_sync: CosmicSync {
                lunar: sync_value(LUNAR_BASE, LUNAR_UPPER, draws.lunar),
                galactic: sync_value(GALACTIC_BASE, GALACTIC_UPPER, draws.galactic),
            },
            stable: coherence > STABLE_THRESHOLD,
            message: compose_message(&detections, emotional_field, fraction),
            recommendation: compose_recommendation(&detections),
            timestamp: now,
        }
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("principles", &self.table.len())
            .finish_non_exhaustive()
    }
}

/// Clamped fractional coherence.
///
/// Text with no tokens at all sits at the floor.
pub fn coherence_fraction(tokens: &[String], detections: &[Detection<'_>]) -> f64 {
    if tokens.is_empty() {
        return MIN_COHERENCE;
    }

    let keyword_score = detections.iter().fold(BASE_COHERENCE, |score, d| {
        score + KEYWORD_WEIGHT * d.matched_keywords.len() as f64
    });
    let emotional_score = sentiment::sentiment_adjustment(tokens);

    (keyword_score + emotional_score).clamp(MIN_COHERENCE, MAX_COHERENCE)
}

fn mean_frequency(detections: &[Detection<'_>]) -> u32 {
    if detections.is_empty() {
        return DEFAULT_FREQUENCY;
    }
    let total: u64 = detections.iter().map(|d| u64::from(d.principle.frequency)).sum();
    (total as f64 / detections.len() as f64).round() as u32
}

/// `base + unit * 0.20`, kept strictly below `upper`
fn sync_value(base: f64, upper: f64, unit: f64) -> f64 {
    let value = base + unit * SYNC_SPAN;
    if value < upper {
        value
    } else {
        f64::from_bits(upper.to_bits() - 1)
    }
}

fn compose_message(detections: &[Detection<'_>], field: EmotionalField, fraction: f64) -> String {
    if detections.is_empty() {
        return format!(
            "No specific principles detected. The glyph reflects {} energy.",
            field.as_str().to_lowercase()
        );
    }

    let resonant = detections
        .iter()
        .take(MAX_REPORTED_NAMES)
        .map(|d| format!("{} (#{})", d.principle.name, d.principle.id))
        .collect::<Vec<_>>()
        .join(", ");

    let tail = if fraction > 0.8 {
        EXCELLENT_TAIL
    } else if fraction > 0.6 {
        GOOD_TAIL
    } else {
        REFINE_TAIL
    };

    format!(
        "Your thought resonates with: {}. The glyph shows {} energy. {}",
        resonant,
        field.as_str().to_uppercase(),
        tail
    )
}

fn compose_recommendation(detections: &[Detection<'_>]) -> String {
    match detections.first() {
        Some(d) => format!("Focus on embodying {}.", d.principle.name),
        None => GENERIC_RECOMMENDATION.to_string(),
    }
}
