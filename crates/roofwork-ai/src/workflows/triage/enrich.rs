use chrono::Datelike;

use super::domain::RawRecord;
use super::mapping;
use super::normalizer::{normalize_roof_type, RoofCategory};

/// Calendar defaults applied when the intake date is absent. Midyear values
/// rather than zeros, so downstream linear effects are not dragged toward
/// an arbitrary edge of the range.
const DEFAULT_MONTH: u32 = 6;
const DEFAULT_WEEKDAY: u32 = 3;
const DEFAULT_QUARTER: u32 = 2;

const STORM_SEASON_MONTHS: [u32; 5] = [5, 6, 7, 8, 9];

const OLD_ROOF_YEARS: f64 = 15.0;
const VERY_OLD_ROOF_YEARS: f64 = 20.0;

/// Ordered names of every enriched field. This order is the contract the
/// feature selector and the trained artifact are both written against.
pub const FEATURE_NAMES: [&str; 23] = [
    "roof_age_num",
    "age_is_unknown",
    "roof_layers_num",
    "layers_is_unknown",
    "is_old_roof",
    "is_very_old_roof",
    "has_multiple_layers",
    "roof_risk_score",
    "high_risk_county",
    "intake_month",
    "intake_weekday",
    "intake_quarter",
    "is_storm_season",
    "roof_type_is_Shingle",
    "roof_type_is_Metal",
    "roof_type_is_Flat",
    "roof_type_is_Tile",
    "roof_type_is_Other",
    "roof_risk_score_x_Shingle",
    "roof_risk_score_x_Metal",
    "roof_risk_score_x_Flat",
    "roof_risk_score_x_Tile",
    "roof_risk_score_x_Other",
];

/// Fully derived numeric/boolean feature set for one intake record.
///
/// Every field is defined for every valid `RawRecord`; unknown categorical
/// input resolves through documented fallbacks, never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub roof_age_num: f64,
    pub age_is_unknown: bool,
    pub roof_layers_num: u32,
    pub layers_is_unknown: bool,
    pub is_old_roof: bool,
    pub is_very_old_roof: bool,
    pub has_multiple_layers: bool,
    pub roof_risk_score: f64,
    pub high_risk_county: bool,
    pub intake_month: u32,
    pub intake_weekday: u32,
    pub intake_quarter: u32,
    pub is_storm_season: bool,
    pub roof_type_is_shingle: bool,
    pub roof_type_is_metal: bool,
    pub roof_type_is_flat: bool,
    pub roof_type_is_tile: bool,
    pub roof_type_is_other: bool,
    pub roof_risk_score_x_shingle: f64,
    pub roof_risk_score_x_metal: f64,
    pub roof_risk_score_x_flat: f64,
    pub roof_risk_score_x_tile: f64,
    pub roof_risk_score_x_other: f64,
}

impl EnrichedRecord {
    /// Numeric view of a named field, for selection into a model input
    /// vector. Booleans become 0.0/1.0, counts become floats.
    pub fn feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            "roof_age_num" => self.roof_age_num,
            "age_is_unknown" => f64::from(self.age_is_unknown as u8),
            "roof_layers_num" => f64::from(self.roof_layers_num),
            "layers_is_unknown" => f64::from(self.layers_is_unknown as u8),
            "is_old_roof" => f64::from(self.is_old_roof as u8),
            "is_very_old_roof" => f64::from(self.is_very_old_roof as u8),
            "has_multiple_layers" => f64::from(self.has_multiple_layers as u8),
            "roof_risk_score" => self.roof_risk_score,
            "high_risk_county" => f64::from(self.high_risk_county as u8),
            "intake_month" => f64::from(self.intake_month),
            "intake_weekday" => f64::from(self.intake_weekday),
            "intake_quarter" => f64::from(self.intake_quarter),
            "is_storm_season" => f64::from(self.is_storm_season as u8),
            "roof_type_is_Shingle" => f64::from(self.roof_type_is_shingle as u8),
            "roof_type_is_Metal" => f64::from(self.roof_type_is_metal as u8),
            "roof_type_is_Flat" => f64::from(self.roof_type_is_flat as u8),
            "roof_type_is_Tile" => f64::from(self.roof_type_is_tile as u8),
            "roof_type_is_Other" => f64::from(self.roof_type_is_other as u8),
            "roof_risk_score_x_Shingle" => self.roof_risk_score_x_shingle,
            "roof_risk_score_x_Metal" => self.roof_risk_score_x_metal,
            "roof_risk_score_x_Flat" => self.roof_risk_score_x_flat,
            "roof_risk_score_x_Tile" => self.roof_risk_score_x_tile,
            "roof_risk_score_x_Other" => self.roof_risk_score_x_other,
            _ => return None,
        };
        Some(value)
    }
}

/// Stateless enrichment stage: identity `fit`, pure `transform`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEnricher;

impl FeatureEnricher {
    pub fn new() -> Self {
        Self
    }

    /// No-op by construction; enrichment carries no fitted state.
    pub fn fit(self) -> Self {
        self
    }

    /// Enrich a batch of raw records. Field-for-field identical to
    /// enriching each record in isolation.
    pub fn transform(&self, records: &[RawRecord]) -> Vec<EnrichedRecord> {
        records.iter().map(enrich_record).collect()
    }
}

fn enrich_record(record: &RawRecord) -> EnrichedRecord {
    let (intake_month, intake_weekday, intake_quarter, is_storm_season) =
        match record.intake_date {
            Some(date) => {
                let month = date.month();
                (
                    month,
                    date.weekday().num_days_from_monday(),
                    (month - 1) / 3 + 1,
                    STORM_SEASON_MONTHS.contains(&month),
                )
            }
            None => (DEFAULT_MONTH, DEFAULT_WEEKDAY, DEFAULT_QUARTER, false),
        };

    let raw_age = record.roof_age_bracket.as_deref();
    let roof_age_num = mapping::age_bracket_feature_value(raw_age);
    let age_is_unknown = raw_age == Some("Unknown");

    let raw_layers = record.roof_layers.as_deref();
    let roof_layers_num = mapping::layer_feature_value(raw_layers);
    let layers_is_unknown = raw_layers == Some("Unknown");

    let category = normalize_roof_type(record.roof_type.as_deref());
    let roof_risk_score = roof_age_num * f64::from(roof_layers_num);
    let interaction = |active: bool| if active { roof_risk_score } else { 0.0 };

    let roof_type_is_shingle = category == RoofCategory::Shingle;
    let roof_type_is_metal = category == RoofCategory::Metal;
    let roof_type_is_flat = category == RoofCategory::Flat;
    let roof_type_is_tile = category == RoofCategory::Tile;
    let roof_type_is_other = category == RoofCategory::Other;

    EnrichedRecord {
        roof_age_num,
        age_is_unknown,
        roof_layers_num,
        layers_is_unknown,
        is_old_roof: roof_age_num >= OLD_ROOF_YEARS,
        is_very_old_roof: roof_age_num >= VERY_OLD_ROOF_YEARS,
        has_multiple_layers: roof_layers_num > 1,
        roof_risk_score,
        high_risk_county: mapping::is_high_risk_county(record.county.as_deref()),
        intake_month,
        intake_weekday,
        intake_quarter,
        is_storm_season,
        roof_type_is_shingle,
        roof_type_is_metal,
        roof_type_is_flat,
        roof_type_is_tile,
        roof_type_is_other,
        roof_risk_score_x_shingle: interaction(roof_type_is_shingle),
        roof_risk_score_x_metal: interaction(roof_type_is_metal),
        roof_risk_score_x_flat: interaction(roof_type_is_flat),
        roof_risk_score_x_tile: interaction(roof_type_is_tile),
        roof_risk_score_x_other: interaction(roof_type_is_other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> RawRecord {
        RawRecord {
            roof_age_bracket: Some("16-20 years".to_string()),
            roof_layers: Some("2".to_string()),
            roof_type: Some("Asphalt - Pitched".to_string()),
            county: Some("Queens".to_string()),
            state: Some("NY".to_string()),
            intake_date: NaiveDate::from_ymd_opt(2025, 7, 16),
        }
    }

    fn enrich(record: RawRecord) -> EnrichedRecord {
        FeatureEnricher::new()
            .fit()
            .transform(std::slice::from_ref(&record))
            .remove(0)
    }

    #[test]
    fn calendar_features_derive_from_intake_date() {
        let enriched = enrich(record());
        // 2025-07-16 is a Wednesday in Q3, inside storm season.
        assert_eq!(enriched.intake_month, 7);
        assert_eq!(enriched.intake_weekday, 2);
        assert_eq!(enriched.intake_quarter, 3);
        assert!(enriched.is_storm_season);
    }

    #[test]
    fn missing_date_uses_midyear_defaults() {
        let mut raw = record();
        raw.intake_date = None;
        let enriched = enrich(raw);
        assert_eq!(enriched.intake_month, 6);
        assert_eq!(enriched.intake_weekday, 3);
        assert_eq!(enriched.intake_quarter, 2);
        assert!(!enriched.is_storm_season);
    }

    #[test]
    fn unknown_age_bracket_keeps_indicator_and_midpoint() {
        let mut raw = record();
        raw.roof_age_bracket = Some("Unknown".to_string());
        let enriched = enrich(raw);
        assert_eq!(enriched.roof_age_num, 11.0);
        assert!(enriched.age_is_unknown);
    }

    #[test]
    fn unmapped_age_bracket_falls_back_without_unknown_flag() {
        let mut raw = record();
        raw.roof_age_bracket = Some("Xylophone".to_string());
        let enriched = enrich(raw);
        assert_eq!(enriched.roof_age_num, 20.0);
        assert!(!enriched.age_is_unknown);
    }

    #[test]
    fn derived_risk_features_follow_thresholds() {
        let enriched = enrich(record());
        assert_eq!(enriched.roof_age_num, 18.0);
        assert_eq!(enriched.roof_layers_num, 2);
        assert!(enriched.is_old_roof);
        assert!(!enriched.is_very_old_roof);
        assert!(enriched.has_multiple_layers);
        assert_eq!(enriched.roof_risk_score, 36.0);
        assert!(enriched.high_risk_county);
    }

    #[test]
    fn interaction_features_activate_only_for_the_normalized_category() {
        let mut raw = record();
        raw.roof_type = Some("Metal - Pitched".to_string());
        let enriched = enrich(raw);
        assert_eq!(enriched.roof_risk_score, 36.0);
        assert_eq!(enriched.roof_risk_score_x_metal, 36.0);
        assert_eq!(enriched.roof_risk_score_x_shingle, 0.0);
        assert_eq!(enriched.roof_risk_score_x_flat, 0.0);
        assert_eq!(enriched.roof_risk_score_x_tile, 0.0);
        assert_eq!(enriched.roof_risk_score_x_other, 0.0);
    }

    #[test]
    fn unknown_roof_type_zeroes_every_one_hot() {
        let mut raw = record();
        raw.roof_type = None;
        let enriched = enrich(raw);
        assert!(!enriched.roof_type_is_shingle);
        assert!(!enriched.roof_type_is_metal);
        assert!(!enriched.roof_type_is_flat);
        assert!(!enriched.roof_type_is_tile);
        assert!(!enriched.roof_type_is_other);
        assert_eq!(enriched.roof_risk_score_x_shingle, 0.0);
        assert_eq!(enriched.roof_risk_score_x_other, 0.0);
    }

    #[test]
    fn batch_transform_matches_per_record_enrichment() {
        let records = vec![
            record(),
            RawRecord::default(),
            RawRecord {
                roof_age_bracket: Some("Unknown".to_string()),
                roof_layers: Some("Unknown".to_string()),
                roof_type: Some("flat".to_string()),
                county: None,
                state: None,
                intake_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            },
        ];

        let enricher = FeatureEnricher::new();
        let batch = enricher.transform(&records);
        for (raw, enriched) in records.iter().zip(&batch) {
            let single = enricher.transform(std::slice::from_ref(raw)).remove(0);
            assert_eq!(&single, enriched);
        }
    }

    #[test]
    fn every_declared_feature_name_resolves() {
        let enriched = enrich(record());
        for name in FEATURE_NAMES {
            assert!(
                enriched.feature(name).is_some(),
                "feature {name} missing from enrichment schema"
            );
        }
        assert!(enriched.feature("no_such_feature").is_none());
    }

    #[test]
    fn fully_empty_record_still_enriches() {
        let enriched = enrich(RawRecord::default());
        assert_eq!(enriched.roof_age_num, 20.0);
        assert_eq!(enriched.roof_layers_num, 2);
        assert!(!enriched.age_is_unknown);
        assert!(!enriched.layers_is_unknown);
        assert_eq!(enriched.intake_month, 6);
        assert!(!enriched.high_risk_county);
        assert_eq!(enriched.roof_risk_score, 40.0);
    }
}
