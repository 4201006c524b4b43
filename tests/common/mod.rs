//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use pv_sizer::autonomy::BatterySpec;
use pv_sizer::sizing::{ArrayConfig, DeratingParams, InverterSpec, PanelSpec};

/// 410 W panel: Vmp 34 V, Imp 12 A, Voc 41 V, Isc 12.8 A.
pub fn reference_panel() -> PanelSpec {
    PanelSpec {
        pmax_w: 410.0,
        vmp_v: 34.0,
        imp_a: 12.0,
        voc_v: 41.0,
        isc_a: 12.8,
    }
}

/// 5 kW inverter: 1000 V Vdc_max, 200–850 V MPPT window, 15 A per MPPT, 2 MPPT, 97 %.
pub fn reference_inverter() -> InverterSpec {
    InverterSpec {
        rated_ac_w: 5000.0,
        vdc_max_v: 1000.0,
        mppt_v_min: 200.0,
        mppt_v_max: 850.0,
        idc_max_per_mppt_a: 15.0,
        efficiency: 0.97,
        mppt_count: 2,
    }
}

/// −10 °C minimum, −0.3 %/°C, 5 % margin.
pub fn reference_derating() -> DeratingParams {
    DeratingParams {
        min_cell_temp_c: -10.0,
        voc_temp_coeff: -0.003,
        safety_margin_pct: 5.0,
    }
}

/// 10 panels in series, 2 strings per MPPT.
pub fn reference_layout() -> ArrayConfig {
    ArrayConfig::new(10, 2)
}

/// Three LFP banks of 5, 10 and 15 kWh.
pub fn battery_bank() -> Vec<BatterySpec> {
    vec![
        BatterySpec::new("LFP 5", 5.0),
        BatterySpec::new("LFP 10", 10.0),
        BatterySpec::new("LFP 15", 15.0),
    ]
}

/// Asserts two floats agree to within `1e-9` relative tolerance.
pub fn assert_close(actual: f64, expected: f64) {
    let tol = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual}"
    );
}
