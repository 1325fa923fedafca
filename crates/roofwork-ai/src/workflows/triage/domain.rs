use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::mapping;

/// Raw intake fields for a single roofing job, exactly as supplied by the
/// intake surface. Identifier columns (opportunity id/name, intake number)
/// never reach this struct; the intake parser drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Age bracket selection, e.g. "6-10 years" or "Unknown".
    #[serde(default)]
    pub roof_age_bracket: Option<String>,
    /// Layer count as a string digit "1".."5", or "Unknown".
    #[serde(default)]
    pub roof_layers: Option<String>,
    /// Free-form roof type description, e.g. "Asphalt - Pitched".
    #[serde(default)]
    pub roof_type: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    /// Informational only; never feeds a feature.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub intake_date: Option<NaiveDate>,
}

/// Coarse scalars consumed by the rule stage only.
///
/// These are supplied by the caller at intake resolution and are *not* the
/// values enrichment derives for the model stage: the intake surface maps
/// "Unknown" age to 15.0 where enrichment uses 11.0, and "11-15 years" to
/// 12.0 where enrichment uses 13.0. The two tables are intentionally kept
/// separate; see `mapping`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleInputs {
    pub roof_age_years: f64,
    pub roof_layer_count: f64,
}

impl RuleInputs {
    /// Derive the rule-stage scalars from a raw record using the intake
    /// surface's mapping tables.
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            roof_age_years: mapping::rule_stage_age_years(record.roof_age_bracket.as_deref()),
            roof_layer_count: mapping::rule_stage_layer_count(record.roof_layers.as_deref()),
        }
    }
}

/// Binary triage outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionLabel {
    Needed,
    NotNeeded,
}

impl DecisionLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Needed => "Roof Work Needed",
            Self::NotNeeded => "Roof Work Not Needed",
        }
    }
}

/// Which stage produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Rule,
    Model,
}

/// Final triage decision with an auditable rationale.
///
/// `confidence` is the classifier probability of the positive class and is
/// present only when the decision came from the model stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub label: DecisionLabel,
    pub source: DecisionSource,
    pub rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
