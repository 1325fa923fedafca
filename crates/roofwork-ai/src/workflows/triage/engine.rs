use std::fmt;
use std::sync::Arc;

use super::domain::{Decision, DecisionLabel, DecisionSource, RawRecord, RuleInputs};
use super::enrich::FeatureEnricher;
use super::model::{PredictionError, TriageArtifact, WorkClassifier};
use super::select::{ConfigurationError, FeatureSelector};

/// Rule-stage cutoffs. A roof at or past either cutoff is decided without
/// consulting the classifier.
const RULE_AGE_YEARS: f64 = 16.0;
const RULE_LAYER_COUNT: f64 = 4.0;

const AGE_RULE_RATIONALE: &str = "age rule";
const LAYERS_RULE_RATIONALE: &str = "layers rule";

#[derive(Debug)]
pub enum TriageError {
    Configuration(ConfigurationError),
    Prediction(PredictionError),
}

impl fmt::Display for TriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "{err}"),
            Self::Prediction(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TriageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Prediction(err) => Some(err),
        }
    }
}

impl From<ConfigurationError> for TriageError {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}

impl From<PredictionError> for TriageError {
    fn from(err: PredictionError) -> Self {
        Self::Prediction(err)
    }
}

/// Two-stage decision engine: deterministic rules first, then the
/// calibrated classifier for everything the rules leave undecided.
///
/// A classifier failure fails the call; it is never silently replaced by a
/// rule-only answer, because the two stages are calibrated together.
pub struct HybridDecisionEngine {
    enricher: FeatureEnricher,
    selector: FeatureSelector,
    classifier: Arc<dyn WorkClassifier>,
    threshold: f64,
}

impl HybridDecisionEngine {
    pub fn new(
        enricher: FeatureEnricher,
        selector: FeatureSelector,
        classifier: Arc<dyn WorkClassifier>,
        threshold: f64,
    ) -> Self {
        Self {
            enricher,
            selector,
            classifier,
            threshold,
        }
    }

    /// Wire the engine from a loaded model bundle: the selector takes the
    /// bundle's feature columns and the scorer becomes the classifier.
    pub fn from_artifact(artifact: TriageArtifact) -> Self {
        let TriageArtifact {
            classifier,
            selected_features,
            threshold,
        } = artifact;
        Self::new(
            FeatureEnricher::new().fit(),
            FeatureSelector::new(selected_features).fit(),
            Arc::new(classifier),
            threshold,
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn decide(
        &self,
        record: &RawRecord,
        inputs: RuleInputs,
    ) -> Result<Decision, TriageError> {
        let mut decisions = self.decide_batch(&[(record.clone(), inputs)])?;
        Ok(decisions.remove(0))
    }

    /// Decide a batch in input order. Rule-decided records never touch the
    /// model; the rest are enriched, projected, and scored in one pass. Any
    /// model-stage failure fails the whole batch.
    pub fn decide_batch(
        &self,
        batch: &[(RawRecord, RuleInputs)],
    ) -> Result<Vec<Decision>, TriageError> {
        let mut decisions: Vec<Option<Decision>> = Vec::with_capacity(batch.len());
        let mut undecided: Vec<RawRecord> = Vec::new();
        let mut undecided_slots: Vec<usize> = Vec::new();

        for (slot, (record, inputs)) in batch.iter().enumerate() {
            match rule_decision(*inputs) {
                Some(decision) => decisions.push(Some(decision)),
                None => {
                    decisions.push(None);
                    undecided.push(record.clone());
                    undecided_slots.push(slot);
                }
            }
        }

        if !undecided.is_empty() {
            let enriched = self.enricher.transform(&undecided);
            let matrix = self.selector.transform(&enriched)?;
            let probabilities = self.classifier.predict_proba(&matrix)?;
            if probabilities.len() != undecided_slots.len() {
                return Err(TriageError::Prediction(PredictionError::Unavailable(
                    format!(
                        "classifier returned {} probabilities for {} records",
                        probabilities.len(),
                        undecided_slots.len()
                    ),
                )));
            }

            for (slot, probability) in undecided_slots.into_iter().zip(probabilities) {
                decisions[slot] = Some(self.model_decision(probability));
            }
        }

        Ok(decisions.into_iter().flatten().collect())
    }

    fn model_decision(&self, probability: f64) -> Decision {
        let label = if probability >= self.threshold {
            DecisionLabel::Needed
        } else {
            DecisionLabel::NotNeeded
        };
        Decision {
            label,
            source: DecisionSource::Model,
            rationale: format!(
                "classifier probability {probability:.4} against threshold {threshold:.3}",
                threshold = self.threshold
            ),
            confidence: Some(probability),
        }
    }
}

/// The rule stage in evaluation order: the age cutoff is checked before the
/// layer cutoff, so a record past both reports the age rationale.
fn rule_decision(inputs: RuleInputs) -> Option<Decision> {
    let rationale = if inputs.roof_age_years >= RULE_AGE_YEARS {
        AGE_RULE_RATIONALE
    } else if inputs.roof_layer_count >= RULE_LAYER_COUNT {
        LAYERS_RULE_RATIONALE
    } else {
        return None;
    };
    Some(Decision {
        label: DecisionLabel::Needed,
        source: DecisionSource::Rule,
        rationale: rationale.to_string(),
        confidence: None,
    })
}
