//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::autonomy::BatterySpec;
use crate::sizing::{ArrayConfig, DeratingParams, InverterSpec, PanelSpec, SizingReport};

/// Sizing inputs. Omitted sections fall back to the reference scenario.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingRequest {
    /// Panel datasheet ratings.
    pub panel: PanelSpec,
    /// Inverter limits.
    pub inverter: InverterSpec,
    /// Cold-case Voc derating.
    pub derating: DeratingParams,
    /// String layout per MPPT input.
    pub array: ArrayConfig,
}

/// Sizing report plus the advisory parallel-string suggestion.
#[derive(Debug, Serialize)]
pub struct SizingResponse {
    /// Per-MPPT results and summary.
    #[serde(flatten)]
    pub report: SizingReport,
    /// Suggested parallel strings per MPPT for a 1.2 DC/AC ratio. Not applied.
    pub recommended_parallel: u32,
}

/// Autonomy matrix inputs.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutonomyRequest {
    /// Labeled batteries.
    pub batteries: Vec<BatterySpec>,
    /// Depth of discharge (0.0–1.0).
    pub dod: f64,
    /// Candidate loads (W).
    pub loads_w: Vec<f64>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
