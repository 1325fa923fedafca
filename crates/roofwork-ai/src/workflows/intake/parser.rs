use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::triage::RawRecord;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<IntakeRow>() {
        records.push(record?.into_record());
    }

    Ok(records)
}

/// One row of the CRM opportunity export. Identifier columns (opportunity
/// id/name, intake number) are not listed and are therefore dropped.
#[derive(Debug, Deserialize)]
struct IntakeRow {
    #[serde(
        rename = "How old is the roof?",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    roof_age: Option<String>,
    #[serde(
        rename = "Number of Roof Layers",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    roof_layers: Option<String>,
    #[serde(
        rename = "Type of Roofing",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    roof_type: Option<String>,
    #[serde(rename = "County", default, deserialize_with = "empty_string_as_none")]
    county: Option<String>,
    #[serde(rename = "State", default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(
        rename = "Created Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    created_date: Option<String>,
}

impl IntakeRow {
    fn into_record(self) -> RawRecord {
        // Unparseable dates coerce to absence, never to an import failure;
        // enrichment substitutes its calendar defaults downstream.
        let intake_date = self.created_date.as_deref().and_then(parse_date);
        RawRecord {
            roof_age_bracket: self.roof_age,
            roof_layers: self.roof_layers,
            roof_type: self.roof_type,
            county: self.county,
            state: self.state,
            intake_date,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
