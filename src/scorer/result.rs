//! Score result value object and its wire format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-way bucket derived from fractional coherence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmotionalField {
    Positive,
    Neutral,
    Negative,
}

impl EmotionalField {
    /// Bucket a clamped fractional coherence (`0.30..=0.95`)
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction > 0.75 {
            Self::Positive
        } else if fraction > 0.55 {
            Self::Neutral
        } else {
            Self::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for EmotionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decorative lunar/galactic synchronization pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CosmicSync {
    pub lunar: f64,
    pub galactic: f64,
}

/// Structured outcome of scoring one message
///
/// Produced fresh per call and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Percentage in `[30.0, 95.0]`
    pub coherence: f64,
    pub emotional_field: EmotionalField,
    /// First five detected ids, wire form `"1, 2"` or `"None"`
    #[serde(rename = "principles", with = "principle_ids")]
    pub matched_principle_ids: Vec<u32>,
    /// First three detected names
    #[serde(rename = "principleNames")]
    pub matched_principle_names: Vec<String>,
    pub frequency: u32,
    pub cosmic_sync: CosmicSync,
    pub stable: bool,
    #[serde(rename = "response")]
    pub message: String,
    pub recommendation: String,
    pub timestamp: DateTime<Utc>,
}

impl ScoreResult {
    /// Serialize for the wire
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Comma-joined id list, `"None"` when empty
mod principle_ids {
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NONE: &str = "None";

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(ids: &Vec<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        if ids.is_empty() {
            return serializer.serialize_str(NONE);
        }
        let joined = ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u32>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == NONE || raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        raw.split(',')
            .map(|part| part.trim().parse::<u32>().map_err(de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(ids: Vec<u32>) -> ScoreResult {
        ScoreResult {
            coherence: 74.0,
            emotional_field: EmotionalField::Neutral,
            matched_principle_ids: ids,
            matched_principle_names: vec!["Truth".to_string(), "Justice".to_string()],
            frequency: 437,
            cosmic_sync: CosmicSync {
                lunar: 0.8,
                galactic: 0.7,
            },
            stable: true,
            message: "msg".to_string(),
            recommendation: "Focus on embodying Truth.".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_field_thresholds() {
        assert_eq!(EmotionalField::from_fraction(0.95), EmotionalField::Positive);
        assert_eq!(EmotionalField::from_fraction(0.76), EmotionalField::Positive);
        assert_eq!(EmotionalField::from_fraction(0.75), EmotionalField::Neutral);
        assert_eq!(EmotionalField::from_fraction(0.56), EmotionalField::Neutral);
        assert_eq!(EmotionalField::from_fraction(0.55), EmotionalField::Negative);
        assert_eq!(EmotionalField::from_fraction(0.30), EmotionalField::Negative);
    }

    #[test]
    fn test_wire_field_names() {
        let json: serde_json::Value = serde_json::to_value(sample(vec![1, 2])).unwrap();

        assert_eq!(json["coherence"], 74.0);
        assert_eq!(json["emotionalField"], "Neutral");
        assert_eq!(json["principles"], "1, 2");
        assert_eq!(json["principleNames"][1], "Justice");
        assert_eq!(json["frequency"], 437);
        assert_eq!(json["cosmicSync"]["lunar"], 0.8);
        assert_eq!(json["cosmicSync"]["galactic"], 0.7);
        assert_eq!(json["stable"], true);
        assert_eq!(json["response"], "msg");
        assert_eq!(json["recommendation"], "Focus on embodying Truth.");
        assert_eq!(json["timestamp"], "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_empty_ids_serialize_as_none() {
        let json: serde_json::Value = serde_json::to_value(sample(Vec::new())).unwrap();
        assert_eq!(json["principles"], "None");
    }

    #[test]
    fn test_client_can_parse_wire_form() {
        let sample_result = sample(vec![1, 2, 11]);
        let parsed: ScoreResult = serde_json::from_str(&sample_result.to_json().unwrap()).unwrap();
        assert_eq!(parsed, sample_result);
    }
}
