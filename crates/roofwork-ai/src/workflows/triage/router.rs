use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Decision, DecisionSource, RawRecord, RuleInputs};
use super::service::{RoofTriageService, TriageServiceError};

/// Router builder exposing HTTP endpoints for single-record and CSV batch
/// triage.
pub fn triage_router(service: Arc<RoofTriageService>) -> Router {
    Router::new()
        .route("/api/v1/roof/triage", post(decide_handler))
        .route("/api/v1/roof/triage/batch", post(batch_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TriageRequest {
    #[serde(flatten)]
    record: RawRecord,
    #[serde(default)]
    rule_inputs: Option<RuleInputs>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchTriageRequest {
    csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DecisionView {
    decision: &'static str,
    source: DecisionSource,
    rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

impl From<Decision> for DecisionView {
    fn from(decision: Decision) -> Self {
        Self {
            decision: decision.label.label(),
            source: decision.source,
            rationale: decision.rationale,
            confidence: decision.confidence,
        }
    }
}

pub(crate) async fn decide_handler(
    State(service): State<Arc<RoofTriageService>>,
    axum::Json(request): axum::Json<TriageRequest>,
) -> Response {
    match service.decide(&request.record, request.rule_inputs) {
        Ok(decision) => {
            (StatusCode::OK, axum::Json(DecisionView::from(decision))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn batch_handler(
    State(service): State<Arc<RoofTriageService>>,
    axum::Json(request): axum::Json<BatchTriageRequest>,
) -> Response {
    match service.triage_csv(Cursor::new(request.csv)) {
        Ok(decisions) => {
            let views: Vec<DecisionView> = decisions.into_iter().map(DecisionView::from).collect();
            let payload = json!({
                "total": views.len(),
                "decisions": views,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: TriageServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    let status = match error {
        TriageServiceError::Import(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TriageServiceError::Triage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(payload)).into_response()
}
