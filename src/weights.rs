//! Learned weight vector for the bot's linear policy.
//!
//! The weight file is a JSON array of exactly [`FEATURE_COUNT`] floats in
//! feature order `[bias, is_empty, is_own_territory, would_capture,
//! near_opponent]`. The copy at the crate root ships embedded as the
//! runtime default; the offline trainer overwrites that file after a
//! self-play run. A vector of the wrong length is carried as-is and makes
//! the bot degrade to its deterministic first-candidate fallback - it is
//! never a fatal error.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::FEATURE_COUNT;

/// Weight file shipped with the crate, produced by the offline trainer.
const EMBEDDED_WEIGHTS_JSON: &str = include_str!("../weights.json");

/// Weight vector for the linear move-scoring model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(Vec<f64>);

impl Weights {
    pub fn new(values: Vec<f64>) -> Self {
        Weights(values)
    }

    /// The weights compiled into the binary. A corrupted embedded file
    /// degrades to an empty vector, which the bot treats like any other
    /// length mismatch.
    pub fn embedded() -> Self {
        serde_json::from_str(EMBEDDED_WEIGHTS_JSON).unwrap_or_else(|_| Weights(Vec::new()))
    }

    /// Parse a weight file's contents.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a trained weight file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading weight file {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("parsing weight file {}", path.display()))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// True when the vector matches the feature layout the policy expects.
    pub fn matches_feature_count(&self) -> bool {
        self.0.len() == FEATURE_COUNT
    }

    /// Dot product with a feature vector of the expected length.
    pub fn score(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        self.0
            .iter()
            .zip(features.iter())
            .map(|(w, f)| w * f)
            .sum()
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::embedded()
    }
}
