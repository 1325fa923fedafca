use crate::infra::build_triage_service;
use chrono::{Local, NaiveDate};
use clap::Args;
use roofwork_ai::config::AppConfig;
use roofwork_ai::error::AppError;
use roofwork_ai::workflows::triage::{Decision, DecisionSource, RawRecord, RoofTriageService};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DecideArgs {
    /// Roof age bracket as supplied at intake, e.g. "6-10 years" or "Unknown"
    #[arg(long)]
    pub(crate) roof_age: Option<String>,
    /// Roof layer count as supplied at intake, "1".."5" or "Unknown"
    #[arg(long)]
    pub(crate) roof_layers: Option<String>,
    /// Free-form roof type description, e.g. "Asphalt - Pitched"
    #[arg(long)]
    pub(crate) roof_type: Option<String>,
    /// County named on the opportunity
    #[arg(long)]
    pub(crate) county: Option<String>,
    /// State named on the opportunity (informational only)
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// Intake date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) intake_date: Option<NaiveDate>,
    /// Emit the decision as JSON instead of plain text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Path to a CRM opportunity export CSV
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Emit decisions as JSON instead of plain text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Intake date stamped on the canned demo records (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) intake_date: Option<NaiveDate>,
    /// Triage a real CRM export instead of the canned records
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) fn run_triage_decide(args: DecideArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let record = RawRecord {
        roof_age_bracket: args.roof_age,
        roof_layers: args.roof_layers,
        roof_type: args.roof_type,
        county: args.county,
        state: args.state,
        intake_date: args.intake_date,
    };

    let decision = service.decide(&record, None)?;
    if args.json {
        print_json(&decision)?;
    } else {
        render_decision("record", &decision);
    }
    Ok(())
}

pub(crate) fn run_triage_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let decisions = service.triage_csv_path(&args.input)?;

    if args.json {
        print_json(&decisions)?;
        return Ok(());
    }

    println!("Triaged {} records from {}", decisions.len(), args.input.display());
    for (index, decision) in decisions.iter().enumerate() {
        render_decision(&format!("row {}", index + 1), decision);
    }
    summarize(&decisions);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = load_service()?;

    if let Some(path) = args.csv {
        let decisions = service.triage_csv_path(&path)?;
        println!("Roof work triage demo ({} records from export)", decisions.len());
        for (index, decision) in decisions.iter().enumerate() {
            render_decision(&format!("row {}", index + 1), decision);
        }
        summarize(&decisions);
        return Ok(());
    }

    let intake_date = args.intake_date.unwrap_or_else(|| Local::now().date_naive());
    println!("Roof work triage demo (canned records, intake {intake_date})");
    println!(
        "Decision threshold: {:.3} probability of needing work",
        service.threshold()
    );

    let mut decisions = Vec::new();
    for (description, record) in demo_records(intake_date) {
        let decision = service.decide(&record, None)?;
        render_decision(description, &decision);
        decisions.push(decision);
    }
    summarize(&decisions);
    Ok(())
}

fn load_service() -> Result<RoofTriageService, AppError> {
    let config = AppConfig::load()?;
    build_triage_service(&config.artifact)
}

fn demo_records(intake_date: NaiveDate) -> Vec<(&'static str, RawRecord)> {
    vec![
        (
            "aging shingle roof in Queens",
            RawRecord {
                roof_age_bracket: Some("Above 20 years".to_string()),
                roof_layers: Some("2".to_string()),
                roof_type: Some("Asphalt - Pitched".to_string()),
                county: Some("Queens".to_string()),
                state: Some("NY".to_string()),
                intake_date: Some(intake_date),
            },
        ),
        (
            "stacked layers, age unknown",
            RawRecord {
                roof_age_bracket: Some("Unknown".to_string()),
                roof_layers: Some("4".to_string()),
                roof_type: Some("Pitched roof".to_string()),
                county: Some("Hartford".to_string()),
                state: Some("CT".to_string()),
                intake_date: Some(intake_date),
            },
        ),
        (
            "mid-life shingle roof in Brooklyn",
            RawRecord {
                roof_age_bracket: Some("11-15 years".to_string()),
                roof_layers: Some("3".to_string()),
                roof_type: Some("Architectural shingle".to_string()),
                county: Some("Brooklyn".to_string()),
                state: Some("NY".to_string()),
                intake_date: Some(intake_date),
            },
        ),
        (
            "new metal roof upstate",
            RawRecord {
                roof_age_bracket: Some("0-5 years".to_string()),
                roof_layers: Some("1".to_string()),
                roof_type: Some("Metal - Pitched".to_string()),
                county: Some("Albany".to_string()),
                state: Some("NY".to_string()),
                intake_date: Some(intake_date),
            },
        ),
    ]
}

fn render_decision(description: &str, decision: &Decision) {
    let stage = match decision.source {
        DecisionSource::Rule => "rule",
        DecisionSource::Model => "model",
    };
    match decision.confidence {
        Some(confidence) => println!(
            "- {description}: {} [{stage}] ({}, confidence {confidence:.2})",
            decision.label.label(),
            decision.rationale
        ),
        None => println!(
            "- {description}: {} [{stage}] ({})",
            decision.label.label(),
            decision.rationale
        ),
    }
}

fn summarize(decisions: &[Decision]) {
    let rule_decided = decisions
        .iter()
        .filter(|decision| decision.source == DecisionSource::Rule)
        .count();
    println!(
        "Summary: {} decided by rules, {} by the model",
        rule_decided,
        decisions.len() - rule_decided
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            Ok(())
        }
        Err(err) => {
            println!("decision payload unavailable: {err}");
            Ok(())
        }
    }
}
