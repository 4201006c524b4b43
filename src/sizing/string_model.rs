//! Linear electrical model of the strings on one MPPT input.

use super::types::{ArrayConfig, PanelSpec};

/// Voltage, current and power seen by a single MPPT input.
///
/// Series count scales voltage, parallel count scales current, and power
/// scales with both. No mismatch or wiring losses are modeled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringElectricals {
    /// Worst-case string open-circuit voltage (V).
    pub string_voc: f64,
    /// String voltage at maximum power (V).
    pub string_vmp: f64,
    /// Combined current of the parallel strings at maximum power (A).
    pub string_imp: f64,
    /// Combined short-circuit current of the parallel strings (A).
    pub string_isc: f64,
    /// DC power at STC for this input (W).
    pub dc_power: f64,
}

impl StringElectricals {
    /// Scales panel ratings by the array layout.
    ///
    /// # Arguments
    ///
    /// * `panel` - Panel datasheet ratings
    /// * `config` - Series/parallel layout of this MPPT input
    /// * `derated_voc_per_panel` - Per-panel Voc after cold-case derating and margin
    pub fn compute(panel: &PanelSpec, config: &ArrayConfig, derated_voc_per_panel: f64) -> Self {
        let series = f64::from(config.series);
        let parallel = f64::from(config.parallel);
        Self {
            string_voc: derated_voc_per_panel * series,
            string_vmp: panel.vmp_v * series,
            string_imp: panel.imp_a * parallel,
            string_isc: panel.isc_a * parallel,
            dc_power: panel.pmax_w * series * parallel,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn reference_layout() {
        let e = StringElectricals::compute(&PanelSpec::default(), &ArrayConfig::new(10, 2), 47.57025);
        assert!((e.string_voc - 475.7025).abs() < 1e-9);
        assert_eq!(e.string_vmp, 340.0);
        assert_eq!(e.string_imp, 24.0);
        assert_eq!(e.string_isc, 25.6);
        assert_eq!(e.dc_power, 8200.0);
    }

    #[test]
    fn single_panel_matches_datasheet() {
        let panel = PanelSpec::default();
        let e = StringElectricals::compute(&panel, &ArrayConfig::new(1, 1), panel.voc_v);
        assert_eq!(e.string_voc, panel.voc_v);
        assert_eq!(e.string_vmp, panel.vmp_v);
        assert_eq!(e.string_imp, panel.imp_a);
        assert_eq!(e.dc_power, panel.pmax_w);
    }

    proptest! {
        #[test]
        fn doubling_series_doubles_voltage_and_power(series in 1_u32..40, parallel in 1_u32..10) {
            let panel = PanelSpec::default();
            let a = StringElectricals::compute(&panel, &ArrayConfig::new(series, parallel), 47.0);
            let b = StringElectricals::compute(&panel, &ArrayConfig::new(series * 2, parallel), 47.0);
            prop_assert_eq!(b.string_voc, 2.0 * a.string_voc);
            prop_assert_eq!(b.string_vmp, 2.0 * a.string_vmp);
            prop_assert_eq!(b.string_imp, a.string_imp);
            prop_assert_eq!(b.dc_power, 2.0 * a.dc_power);
        }

        #[test]
        fn doubling_parallel_doubles_current_and_power(series in 1_u32..40, parallel in 1_u32..10) {
            let panel = PanelSpec::default();
            let a = StringElectricals::compute(&panel, &ArrayConfig::new(series, parallel), 47.0);
            let b = StringElectricals::compute(&panel, &ArrayConfig::new(series, parallel * 2), 47.0);
            prop_assert_eq!(b.string_imp, 2.0 * a.string_imp);
            prop_assert_eq!(b.dc_power, 2.0 * a.dc_power);
            prop_assert_eq!(b.string_voc, a.string_voc);
            prop_assert_eq!(b.string_vmp, a.string_vmp);
        }
    }
}
