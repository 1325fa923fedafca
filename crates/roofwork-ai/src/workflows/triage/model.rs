use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ArtifactConfig;

/// Bundled model artifact shipped with the binary. Regenerated offline by
/// the training pipeline; never edited by hand.
const EMBEDDED_ARTIFACT: &str = include_str!("../../../artifacts/roof_model.json");

const DEFAULT_DECISION_THRESHOLD: f64 = 0.232;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("unable to read model artifact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictionError {
    #[error("classifier expects {expected} features per row, got {got}")]
    FeatureWidth { expected: usize, got: usize },
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// Anything able to turn feature rows into positive-class probabilities.
/// The engine depends on this seam so tests can swap in fixed-probability
/// doubles without touching real weights.
pub trait WorkClassifier: Send + Sync {
    fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError>;
}

/// Calibrated logistic regression over the selected feature columns.
/// `weights[i]` pairs with the i-th entry of the artifact's feature list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticScorer {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticScorer {
    fn score_row(&self, row: &[f64]) -> Result<f64, PredictionError> {
        if row.len() != self.weights.len() {
            return Err(PredictionError::FeatureWidth {
                expected: self.weights.len(),
                got: row.len(),
            });
        }
        let logit: f64 = self
            .weights
            .iter()
            .zip(row)
            .map(|(weight, value)| weight * value)
            .sum::<f64>()
            + self.intercept;
        Ok(sigmoid(logit))
    }
}

impl WorkClassifier for LogisticScorer {
    fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
        batch.iter().map(|row| self.score_row(row)).collect()
    }
}

fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

/// Serialized model bundle: the scorer, the feature columns it was trained
/// on, and the decision threshold calibrated alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageArtifact {
    pub classifier: LogisticScorer,
    pub selected_features: Vec<String>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_DECISION_THRESHOLD
}

impl TriageArtifact {
    /// Load the bundle from the configured override path, or fall back to
    /// the artifact embedded at compile time.
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactError> {
        match &config.model_bundle {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&raw).map_err(|source| ArtifactError::Malformed {
                    path: path.clone(),
                    source,
                })
            }
            None => Self::embedded(),
        }
    }

    pub fn embedded() -> Result<Self, ArtifactError> {
        serde_json::from_str(EMBEDDED_ARTIFACT).map_err(|source| ArtifactError::Malformed {
            path: PathBuf::from("artifacts/roof_model.json"),
            source,
        })
    }
}
