//! Roof work triage: feature enrichment over raw intake records and the
//! hybrid rule-then-model decision engine.
//!
//! Deterministic business rules are checked first; only when no rule fires
//! is the record enriched, projected to the trained feature subset, and
//! scored by the calibrated classifier against a fixed threshold.

pub mod domain;
mod engine;
pub(crate) mod enrich;
pub(crate) mod mapping;
pub mod model;
pub(crate) mod normalizer;
pub mod router;
pub(crate) mod select;
pub mod service;

pub use domain::{Decision, DecisionLabel, DecisionSource, RawRecord, RuleInputs};
pub use engine::{HybridDecisionEngine, TriageError};
pub use enrich::{EnrichedRecord, FeatureEnricher, FEATURE_NAMES};
pub use model::{
    ArtifactError, LogisticScorer, PredictionError, TriageArtifact, WorkClassifier,
};
pub use normalizer::RoofCategory;
pub use router::triage_router;
pub use select::{ConfigurationError, FeatureSelector};
pub use service::{RoofTriageService, TriageServiceError};
