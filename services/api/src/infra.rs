use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use roofwork_ai::config::ArtifactConfig;
use roofwork_ai::error::AppError;
use roofwork_ai::workflows::triage::{RoofTriageService, TriageArtifact};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the triage service from the configured artifact location, falling
/// back to the bundle embedded in the library crate.
pub(crate) fn build_triage_service(config: &ArtifactConfig) -> Result<RoofTriageService, AppError> {
    let artifact = TriageArtifact::load(config)?;
    Ok(RoofTriageService::from_artifact(artifact))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
