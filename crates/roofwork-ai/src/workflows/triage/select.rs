use thiserror::Error;

use super::enrich::EnrichedRecord;

/// The enrichment stage does not know which columns the classifier was
/// trained on. This error surfaces the mismatch when an artifact asks for
/// a feature the enricher never produces.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("feature '{feature}' is not produced by enrichment; the model artifact and the enrichment stage are out of step")]
pub struct ConfigurationError {
    pub feature: String,
}

/// Projects enriched records onto the feature subset the classifier was
/// trained on, in the artifact's column order.
#[derive(Debug, Clone)]
pub struct FeatureSelector {
    features: Vec<String>,
}

impl FeatureSelector {
    pub fn new(features: Vec<String>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Stateless by construction; kept for pipeline symmetry.
    pub fn fit(self) -> Self {
        self
    }

    /// Project a batch onto the configured columns. The first unknown
    /// feature name aborts the whole batch: a partial matrix would feed the
    /// classifier rows of the wrong width.
    pub fn transform(
        &self,
        records: &[EnrichedRecord],
    ) -> Result<Vec<Vec<f64>>, ConfigurationError> {
        records
            .iter()
            .map(|record| {
                self.features
                    .iter()
                    .map(|name| {
                        record.feature(name).ok_or_else(|| ConfigurationError {
                            feature: name.clone(),
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::domain::RawRecord;
    use super::super::enrich::{FeatureEnricher, FEATURE_NAMES};
    use super::*;

    fn enriched_sample() -> Vec<EnrichedRecord> {
        let record = RawRecord {
            roof_age_bracket: Some("16-20 years".into()),
            roof_layers: Some("2".into()),
            roof_type: Some("Metal - Pitched".into()),
            county: Some("Brooklyn".into()),
            ..RawRecord::default()
        };
        FeatureEnricher::new().fit().transform(&[record])
    }

    #[test]
    fn projects_in_configured_order() {
        let records = enriched_sample();
        let selector = FeatureSelector::new(vec![
            "high_risk_county".into(),
            "roof_age_num".into(),
            "roof_type_is_Metal".into(),
        ])
        .fit();

        let matrix = selector.transform(&records).unwrap();
        assert_eq!(matrix, vec![vec![1.0, 18.0, 1.0]]);
    }

    #[test]
    fn full_feature_set_round_trips() {
        let records = enriched_sample();
        let selector =
            FeatureSelector::new(FEATURE_NAMES.iter().map(|name| name.to_string()).collect());

        let matrix = selector.transform(&records).unwrap();
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix[0].len(), FEATURE_NAMES.len());
    }

    #[test]
    fn unknown_feature_fails_the_batch() {
        let records = enriched_sample();
        let selector = FeatureSelector::new(vec!["roof_age_num".into(), "shoe_size".into()]);

        let err = selector.transform(&records).unwrap_err();
        assert_eq!(err.feature, "shoe_size");
    }

    #[test]
    fn empty_batch_yields_empty_matrix() {
        let selector = FeatureSelector::new(vec!["roof_age_num".into()]);
        assert_eq!(selector.transform(&[]).unwrap(), Vec::<Vec<f64>>::new());
    }
}
