//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use pv_sizer::api::{AppState, router};
use pv_sizer::config::ScenarioConfig;

fn build_api_state(preset: &str) -> Arc<AppState> {
    let scenario = ScenarioConfig::from_preset(preset).expect("preset exists");
    assert!(scenario.validate().is_empty());
    Arc::new(AppState { scenario })
}

async fn send(state: Arc<AppState>, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn three_mppt_preset_sizing() {
    let req = Request::builder()
        .uri("/sizing")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(build_api_state("residential_3mppt"), req).await;

    assert_eq!(status, StatusCode::OK);
    let mppts = json["mppts"].as_array().unwrap();
    assert_eq!(mppts.len(), 3);
    assert_eq!(mppts[2]["mppt"], 3);
    assert!(mppts.iter().all(|m| m["issues"].as_array().is_some_and(Vec::is_empty)));
    assert_eq!(json["summary"]["total_panels"], 24);
    assert_eq!(json["summary"]["ratio_class"], "optimal");
}

#[tokio::test]
async fn posted_reference_example() {
    let body = r#"{
        "panel": {"pmax_w": 410.0, "vmp_v": 34.0, "imp_a": 12.0, "voc_v": 41.0, "isc_a": 12.8},
        "inverter": {"rated_ac_w": 5000.0, "vdc_max_v": 1000.0, "mppt_v_min": 200.0,
                     "mppt_v_max": 850.0, "idc_max_per_mppt_a": 15.0, "efficiency": 0.97,
                     "mppt_count": 2},
        "derating": {"min_cell_temp_c": -10.0, "voc_temp_coeff": -0.003, "safety_margin_pct": 5.0},
        "array": {"series": 10, "parallel": 2}
    }"#;
    let (status, json) = send(build_api_state("default"), post_json("/sizing", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mppts"][0]["issues"], serde_json::json!(["CURRENT_EXCEEDS_MPPT_LIMIT"]));
    assert_eq!(json["mppts"][0]["compliant"], true);
    assert_eq!(json["summary"]["total_dc_power"], 16400.0);
    assert_eq!(json["summary"]["ratio_class"], "oversized");
}

#[tokio::test]
async fn posted_autonomy_matrix() {
    let body = r#"{
        "batteries": [{"name": "A", "capacity_kwh": 10.0}, {"name": "B", "capacity_kwh": 5.0}],
        "dod": 0.8,
        "loads_w": [400.0, 800.0]
    }"#;
    let (status, json) = send(build_api_state("default"), post_json("/autonomy", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["batteries"], serde_json::json!(["A", "B"]));
    assert_eq!(json["hours"][0][0], 20.0);
    assert_eq!(json["hours"][1][1], 5.0);
}

#[tokio::test]
async fn posted_autonomy_bad_dod_returns_422() {
    let body = r#"{"batteries": [], "dod": 1.5, "loads_w": [400.0]}"#;
    let (status, json) = send(build_api_state("default"), post_json("/autonomy", body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("depth of discharge"));
}
