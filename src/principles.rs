//! MA'AT principle table
//!
//! The table is configuration data: it is built once at startup, validated,
//! and shared read-only (behind an `Arc`) by every scorer. Nothing mutates a
//! principle after load.
//!
//! ## File format
//!
//! A replacement table can be supplied as a JSON array:
//!
//! ```json
//! [
//!   { "id": 1, "name": "Truth", "keywords": ["truth", "honest"], "frequency": 432 }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::types::{MaatError, Result};

/// A named concept with keywords and a nominal resonance frequency (Hz)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principle {
    pub id: u32,
    pub name: String,
    pub keywords: Vec<String>,
    pub frequency: u32,
}

impl Principle {
    pub fn new(id: u32, name: &str, keywords: &[&str], frequency: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            frequency,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.id == 0 {
            return Err(MaatError::Config(format!(
                "principle '{}' must have a positive id",
                self.name
            )));
        }
        if self.name.trim().is_empty() {
            return Err(MaatError::Config(format!("principle #{} has an empty name", self.id)));
        }
        if self.keywords.is_empty() {
            return Err(MaatError::Config(format!(
                "principle #{} ({}) has no keywords",
                self.id, self.name
            )));
        }
        for keyword in &self.keywords {
            if keyword.is_empty() {
                return Err(MaatError::Config(format!(
                    "principle #{} ({}) has an empty keyword",
                    self.id, self.name
                )));
            }
            if keyword.to_lowercase() != *keyword {
                return Err(MaatError::Config(format!(
                    "principle #{} ({}) keyword '{}' must be lowercase",
                    self.id, self.name, keyword
                )));
            }
        }
        if self.frequency == 0 {
            return Err(MaatError::Config(format!(
                "principle #{} ({}) must have a positive frequency",
                self.id, self.name
            )));
        }
        Ok(())
    }
}

/// Ordered, validated, immutable collection of principles
#[derive(Debug, Clone)]
pub struct PrincipleTable {
    principles: Vec<Principle>,
}

impl PrincipleTable {
    /// Build a table, rejecting duplicate ids and malformed entries
    pub fn new(principles: Vec<Principle>) -> Result<Self> {
        if principles.is_empty() {
            return Err(MaatError::Config("principle table is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(principles.len());
        for principle in &principles {
            principle.validate()?;
            if !seen.insert(principle.id) {
                return Err(MaatError::Config(format!(
                    "duplicate principle id #{}",
                    principle.id
                )));
            }
        }

        Ok(Self { principles })
    }

    /// Parse a table from a JSON array
    pub fn from_json(json: &str) -> Result<Self> {
        let principles: Vec<Principle> = serde_json::from_str(json)
            .map_err(|e| MaatError::Config(format!("invalid principle table: {}", e)))?;
        Self::new(principles)
    }

    /// Load a table from a JSON file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            MaatError::Config(format!("cannot read principle table {}: {}", path.display(), e))
        })?;
        let table = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            principles = table.len(),
            "Loaded principle table"
        );
        Ok(table)
    }

    /// Principles in table order
    pub fn iter(&self) -> impl Iterator<Item = &Principle> {
        self.principles.iter()
    }

    pub fn len(&self) -> usize {
        self.principles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principles.is_empty()
    }
}

impl Default for PrincipleTable {
    fn default() -> Self {
        Self {
            principles: vec![
                Principle::new(1, "Truth", &["truth", "honest", "real", "authentic"], 432),
                Principle::new(2, "Justice", &["justice", "fair", "right", "equitable"], 442),
                Principle::new(3, "Harmony", &["harmony", "peace", "accord", "unity"], 452),
                Principle::new(4, "Balance", &["balance", "equilibrium", "even", "centered"], 462),
                Principle::new(5, "Order", &["order", "structure", "organize", "system"], 472),
                Principle::new(8, "Morality", &["morality", "ethics", "principle", "value"], 502),
                Principle::new(
                    11,
                    "Wisdom",
                    &["wisdom", "knowledge", "insight", "understanding"],
                    528,
                ),
                Principle::new(23, "Clarity", &["clarity", "clear", "transparent", "lucid"], 648),
                Principle::new(
                    32,
                    "Liberation",
                    &["liberation", "freedom", "release", "free"],
                    738,
                ),
            ],
        }
    }
}
