//! Cold-case open-circuit voltage correction.

use super::types::DeratingParams;

/// Cell temperature at standard test conditions (°C).
pub const STC_TEMP_C: f64 = 25.0;

/// Open-circuit voltage corrected from STC to `temp_c`.
///
/// `voc_stc * (1 + coeff * (temp_c - 25))`. With the usual negative
/// coefficient, temperatures below STC raise the voltage.
///
/// # Examples
///
/// ```
/// use pv_sizer::sizing::derating::corrected_voc;
///
/// let v = corrected_voc(41.0, -10.0, -0.003);
/// assert!((v - 45.305).abs() < 1e-9);
/// ```
pub fn corrected_voc(voc_stc: f64, temp_c: f64, coeff: f64) -> f64 {
    voc_stc * (1.0 + coeff * (temp_c - STC_TEMP_C))
}

/// Inflates an already temperature-corrected voltage by a percentage margin.
pub fn apply_safety_margin(voc: f64, margin_pct: f64) -> f64 {
    voc * (1.0 + margin_pct / 100.0)
}

/// Worst-case per-panel Voc: temperature correction first, then the margin.
pub fn derated_panel_voc(voc_stc: f64, params: &DeratingParams) -> f64 {
    let cold = corrected_voc(voc_stc, params.min_cell_temp_c, params.voc_temp_coeff);
    apply_safety_margin(cold, params.safety_margin_pct)
}
