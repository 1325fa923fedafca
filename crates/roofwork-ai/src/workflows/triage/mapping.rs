use std::collections::HashMap;
use std::sync::OnceLock;

/// Age-bracket midpoints used by enrichment for the model stage.
/// Unmapped brackets (including literal absence) fall back to 20.0.
const AGE_BRACKET_FEATURE_TABLE: &[(&str, f64)] = &[
    ("0-5 years", 2.5),
    ("6-10 years", 8.0),
    ("11-15 years", 13.0),
    ("16-20 years", 18.0),
    ("Above 20 years", 25.0),
    ("Unknown", 11.0),
];

/// Age-bracket values the intake surface computes for the rule stage.
///
/// This table is deliberately NOT the enrichment table above: "Unknown"
/// resolves to 15.0 here versus 11.0 for enrichment, and "11-15 years" to
/// 12.0 versus 13.0. The rule stage has always consumed these coarser
/// values and unifying the two would shift which records bypass the model.
const RULE_STAGE_AGE_TABLE: &[(&str, f64)] = &[
    ("0-5 years", 2.5),
    ("6-10 years", 8.0),
    ("11-15 years", 12.0),
    ("16-20 years", 18.0),
    ("Above 20 years", 25.0),
    ("Unknown", 15.0),
];

const HIGH_RISK_COUNTIES: &[&str] = &[
    "Queens",
    "Fairfield",
    "Westchester",
    "Staten Island",
    "Hartford",
    "New Haven",
    "Middlesex",
    "Brooklyn",
    "Suffolk",
    "Nassau",
];

const AGE_FEATURE_FALLBACK: f64 = 20.0;
const LAYER_FEATURE_FALLBACK: u32 = 2;

static AGE_FEATURE_MAP: OnceLock<HashMap<&'static str, f64>> = OnceLock::new();
static RULE_AGE_MAP: OnceLock<HashMap<&'static str, f64>> = OnceLock::new();

fn age_feature_map() -> &'static HashMap<&'static str, f64> {
    AGE_FEATURE_MAP.get_or_init(|| AGE_BRACKET_FEATURE_TABLE.iter().copied().collect())
}

fn rule_age_map() -> &'static HashMap<&'static str, f64> {
    RULE_AGE_MAP.get_or_init(|| RULE_STAGE_AGE_TABLE.iter().copied().collect())
}

/// Enrichment value for a raw age bracket, with the documented fallback for
/// unmapped input.
pub(crate) fn age_bracket_feature_value(raw: Option<&str>) -> f64 {
    raw.and_then(|value| age_feature_map().get(value).copied())
        .unwrap_or(AGE_FEATURE_FALLBACK)
}

/// Rule-stage value for a raw age bracket. Absent or unmapped input
/// resolves like the "Unknown" selection.
pub(crate) fn rule_stage_age_years(raw: Option<&str>) -> f64 {
    const UNKNOWN_AGE_YEARS: f64 = 15.0;
    raw.and_then(|value| rule_age_map().get(value).copied())
        .unwrap_or(UNKNOWN_AGE_YEARS)
}

/// Enrichment value for the raw layer-count string: "1".."5" map to the
/// corresponding integer, everything else falls back to 2.
pub(crate) fn layer_feature_value(raw: Option<&str>) -> u32 {
    match raw {
        Some("1") => 1,
        Some("2") => 2,
        Some("3") => 3,
        Some("4") => 4,
        Some("5") => 5,
        _ => LAYER_FEATURE_FALLBACK,
    }
}

/// Rule-stage layer count: "Unknown" (or absence) counts as a single layer,
/// matching the intake surface.
pub(crate) fn rule_stage_layer_count(raw: Option<&str>) -> f64 {
    match raw {
        Some(value) => value.parse::<u32>().map(f64::from).unwrap_or(1.0),
        None => 1.0,
    }
}

/// Exact-match membership in the fixed high-risk county list.
pub(crate) fn is_high_risk_county(county: Option<&str>) -> bool {
    match county {
        Some(value) => HIGH_RISK_COUNTIES.contains(&value),
        None => false,
    }
}
