//! HTTP-level tests for the triage endpoints, driven through the router
//! with in-process requests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use roofwork_ai::workflows::triage::{triage_router, RoofTriageService, TriageArtifact};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> axum::Router {
    let service = Arc::new(RoofTriageService::from_artifact(
        TriageArtifact::embedded().expect("bundled artifact"),
    ));
    triage_router(service)
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("encode")))
        .expect("request")
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn triage_endpoint_decides_by_rule() {
    let payload = json!({
        "roof_age_bracket": "Above 20 years",
        "roof_layers": "2",
        "roof_type": "Asphalt - Pitched",
        "county": "Queens",
        "state": "NY",
        "intake_date": "2025-07-16",
    });

    let response = router()
        .oneshot(post_json("/api/v1/roof/triage", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "Roof Work Needed");
    assert_eq!(body["source"], "rule");
    assert_eq!(body["rationale"], "age rule");
    assert!(body.get("confidence").is_none());
}

#[tokio::test]
async fn triage_endpoint_scores_with_the_model() {
    let payload = json!({
        "roof_age_bracket": "0-5 years",
        "roof_layers": "1",
        "roof_type": "Metal - Pitched",
        "county": "Albany",
    });

    let response = router()
        .oneshot(post_json("/api/v1/roof/triage", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "Roof Work Not Needed");
    assert_eq!(body["source"], "model");
    assert!(body["confidence"].is_f64());
}

#[tokio::test]
async fn triage_endpoint_honors_caller_rule_scalars() {
    let payload = json!({
        "roof_age_bracket": "0-5 years",
        "rule_inputs": { "roof_age_years": 25.0, "roof_layer_count": 1.0 },
    });

    let response = router()
        .oneshot(post_json("/api/v1/roof/triage", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["source"], "rule");
    assert_eq!(body["rationale"], "age rule");
}

#[tokio::test]
async fn batch_endpoint_triages_inline_csv() {
    let csv = "How old is the roof?,Number of Roof Layers,Type of Roofing,County,State,Created Date\n\
Above 20 years,1,Pitched roof,Queens,NY,2025-07-16\n\
0-5 years,1,Metal - Pitched,Albany,NY,2025-01-02\n";

    let response = router()
        .oneshot(post_json(
            "/api/v1/roof/triage/batch",
            &json!({ "csv": csv }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total"], 2);
    let decisions = body["decisions"].as_array().expect("decisions array");
    assert_eq!(decisions[0]["decision"], "Roof Work Needed");
    assert_eq!(decisions[0]["source"], "rule");
    assert_eq!(decisions[1]["decision"], "Roof Work Not Needed");
    assert_eq!(decisions[1]["source"], "model");
}

#[tokio::test]
async fn batch_endpoint_rejects_malformed_csv() {
    let csv = "How old is the roof?,Number of Roof Layers\nonly-one-cell\n";

    let response = router()
        .oneshot(post_json(
            "/api/v1/roof/triage/batch",
            &json!({ "csv": csv }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("invalid intake CSV data"));
}

#[tokio::test]
async fn empty_record_still_gets_a_model_decision() {
    let response = router()
        .oneshot(post_json("/api/v1/roof/triage", &json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["source"], "model");
    assert!(body["confidence"].is_f64());
}
