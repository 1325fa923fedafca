use std::io::Read;
use std::path::Path;

use tracing::info;

use super::domain::{Decision, DecisionSource, RawRecord, RuleInputs};
use super::engine::{HybridDecisionEngine, TriageError};
use super::model::TriageArtifact;
use crate::workflows::intake::{IntakeImportError, IntakeImporter};

/// Service composing the intake importer and the hybrid decision engine.
pub struct RoofTriageService {
    engine: HybridDecisionEngine,
}

impl RoofTriageService {
    pub fn new(engine: HybridDecisionEngine) -> Self {
        Self { engine }
    }

    pub fn from_artifact(artifact: TriageArtifact) -> Self {
        Self::new(HybridDecisionEngine::from_artifact(artifact))
    }

    pub fn threshold(&self) -> f64 {
        self.engine.threshold()
    }

    /// Decide a single record. Callers that already hold rule-stage scalars
    /// (the interactive intake surface does) pass them through; everyone
    /// else gets them derived from the record.
    pub fn decide(
        &self,
        record: &RawRecord,
        inputs: Option<RuleInputs>,
    ) -> Result<Decision, TriageServiceError> {
        let inputs = inputs.unwrap_or_else(|| RuleInputs::from_record(record));
        let decision = self.engine.decide(record, inputs)?;
        info!(
            label = decision.label.label(),
            source = ?decision.source,
            rationale = %decision.rationale,
            "triage decision"
        );
        Ok(decision)
    }

    /// Decide a batch of records in input order, deriving rule scalars from
    /// each record.
    pub fn decide_batch(&self, records: &[RawRecord]) -> Result<Vec<Decision>, TriageServiceError> {
        let batch: Vec<(RawRecord, RuleInputs)> = records
            .iter()
            .map(|record| (record.clone(), RuleInputs::from_record(record)))
            .collect();
        let decisions = self.engine.decide_batch(&batch)?;

        let rule_decided = decisions
            .iter()
            .filter(|decision| decision.source == DecisionSource::Rule)
            .count();
        info!(
            total = decisions.len(),
            rule_decided,
            model_decided = decisions.len() - rule_decided,
            "triage batch decided"
        );
        Ok(decisions)
    }

    /// Import a CRM opportunity export and decide every row.
    pub fn triage_csv<R: Read>(&self, reader: R) -> Result<Vec<Decision>, TriageServiceError> {
        let records = IntakeImporter::from_reader(reader)?;
        self.decide_batch(&records)
    }

    pub fn triage_csv_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<Decision>, TriageServiceError> {
        let records = IntakeImporter::from_path(path)?;
        self.decide_batch(&records)
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageServiceError {
    #[error(transparent)]
    Import(#[from] IntakeImportError),
    #[error(transparent)]
    Triage(#[from] TriageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::triage::DecisionLabel;
    use std::io::Cursor;

    fn service() -> RoofTriageService {
        RoofTriageService::from_artifact(TriageArtifact::embedded().expect("embedded artifact"))
    }

    #[test]
    fn explicit_rule_inputs_override_record_derivation() {
        let service = service();
        let young = RawRecord {
            roof_age_bracket: Some("0-5 years".to_string()),
            ..RawRecord::default()
        };
        let decision = service
            .decide(
                &young,
                Some(RuleInputs {
                    roof_age_years: 16.0,
                    roof_layer_count: 1.0,
                }),
            )
            .expect("decision");
        assert_eq!(decision.source, DecisionSource::Rule);
        assert_eq!(decision.rationale, "age rule");
    }

    #[test]
    fn derived_inputs_send_unknown_age_to_the_rule_stage() {
        // The intake surface maps "Unknown" age to 15.0, below the age
        // cutoff, so the record falls through to the model.
        let service = service();
        let record = RawRecord {
            roof_age_bracket: Some("Unknown".to_string()),
            roof_layers: Some("1".to_string()),
            ..RawRecord::default()
        };
        let decision = service.decide(&record, None).expect("decision");
        assert_eq!(decision.source, DecisionSource::Model);
    }

    #[test]
    fn csv_import_flows_through_both_stages() {
        let service = service();
        let csv = "How old is the roof?,Number of Roof Layers,Type of Roofing,County,State,Created Date\n\
Above 20 years,1,Asphalt - Pitched,Queens,NY,2025-07-16\n\
0-5 years,1,Metal - Pitched,Albany,NY,2025-01-02\n";

        let decisions = service.triage_csv(Cursor::new(csv)).expect("batch");
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].source, DecisionSource::Rule);
        assert_eq!(decisions[0].rationale, "age rule");
        assert_eq!(decisions[1].source, DecisionSource::Model);
        assert_eq!(decisions[1].label, DecisionLabel::NotNeeded);
    }

    #[test]
    fn malformed_csv_surfaces_an_import_error() {
        let service = service();
        let csv = "How old is the roof?,Number of Roof Layers\nonly-one-cell\n";
        let error = service.triage_csv(Cursor::new(csv)).expect_err("error");
        assert!(matches!(error, TriageServiceError::Import(_)));
    }
}
