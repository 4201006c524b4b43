//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::AppState;
use super::types::{AutonomyRequest, ErrorResponse, SizingRequest, SizingResponse};
use crate::autonomy::{self, AutonomyTable};
use crate::error::SizingError;
use crate::sizing::{self, ArrayConfig, DeratingParams, InverterSpec, PanelSpec};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Sizing report for the loaded scenario.
///
/// `GET /sizing` → 200 + `SizingResponse` JSON
pub async fn get_sizing(State(state): State<Arc<AppState>>) -> Result<Json<SizingResponse>, ApiError> {
    let s = &state.scenario;
    run_sizing(&s.panel, &s.inverter, &s.derating, &s.array).map(Json)
}

/// Sizing report for the posted inputs.
///
/// `POST /sizing` → 200 + `SizingResponse` JSON, or 422 + `ErrorResponse`
pub async fn post_sizing(Json(req): Json<SizingRequest>) -> Result<Json<SizingResponse>, ApiError> {
    run_sizing(&req.panel, &req.inverter, &req.derating, &req.array).map(Json)
}

/// Autonomy table for the loaded scenario.
///
/// `GET /autonomy` → 200 + `AutonomyTable` JSON
pub async fn get_autonomy(State(state): State<Arc<AppState>>) -> Result<Json<AutonomyTable>, ApiError> {
    let au = &state.scenario.autonomy;
    au.batteries()
        .and_then(|batteries| autonomy::estimate(&batteries, au.dod, &au.loads_w))
        .map(Json)
        .map_err(unprocessable)
}

/// Autonomy table for the posted inputs.
///
/// `POST /autonomy` → 200 + `AutonomyTable` JSON, or 422 + `ErrorResponse`
pub async fn post_autonomy(Json(req): Json<AutonomyRequest>) -> Result<Json<AutonomyTable>, ApiError> {
    autonomy::estimate(&req.batteries, req.dod, &req.loads_w)
        .map(Json)
        .map_err(unprocessable)
}

fn run_sizing(
    panel: &PanelSpec,
    inverter: &InverterSpec,
    derating: &DeratingParams,
    array: &ArrayConfig,
) -> Result<SizingResponse, ApiError> {
    let report = sizing::size_array(panel, inverter, derating, array).map_err(unprocessable)?;
    tracing::debug!(
        ratio = report.summary.dc_ac_ratio,
        compliant = report.summary.compliant,
        "sized array"
    );
    Ok(SizingResponse {
        report,
        recommended_parallel: sizing::recommend_parallel_strings(panel, inverter, array.series),
    })
}

fn unprocessable(err: SizingError) -> ApiError {
    tracing::warn!(error = %err, "rejected request");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
