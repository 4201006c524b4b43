//! Immutable input parameter structs for one sizing run.
//!
//! Each struct can be deserialized from a TOML/JSON section with every field
//! defaulted to the reference datasheet scenario (410 W module on a 5 kW,
//! two-MPPT inverter).

use serde::{Deserialize, Serialize};

use crate::error::{Result, SizingError};

/// Maximum number of MPPT inputs supported on one inverter.
pub const MAX_MPPT_INPUTS: u32 = 3;

/// Panel datasheet ratings at standard test conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelSpec {
    /// Rated power Pmax (W).
    pub pmax_w: f64,
    /// Voltage at maximum power Vmp (V).
    pub vmp_v: f64,
    /// Current at maximum power Imp (A).
    pub imp_a: f64,
    /// Open-circuit voltage Voc (V).
    pub voc_v: f64,
    /// Short-circuit current Isc (A).
    pub isc_a: f64,
}

impl Default for PanelSpec {
    fn default() -> Self {
        Self {
            pmax_w: 410.0,
            vmp_v: 34.0,
            imp_a: 12.0,
            voc_v: 41.0,
            isc_a: 12.8,
        }
    }
}

impl PanelSpec {
    /// Returns every invalid field, in declaration order.
    pub fn problems(&self) -> Vec<SizingError> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "pmax_w", self.pmax_w);
        require_positive(&mut errors, "vmp_v", self.vmp_v);
        require_positive(&mut errors, "imp_a", self.imp_a);
        require_positive(&mut errors, "voc_v", self.voc_v);
        require_positive(&mut errors, "isc_a", self.isc_a);
        errors
    }

    /// Fails with the first invalid field.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidInput`] for any non-positive or non-finite rating.
    pub fn validate(&self) -> Result<()> {
        first_problem(self.problems())
    }
}

/// Inverter input and output limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InverterSpec {
    /// Rated AC output power (W).
    pub rated_ac_w: f64,
    /// Absolute maximum DC input voltage Vdc_max (V).
    pub vdc_max_v: f64,
    /// Lower bound of the MPPT operating window (V).
    pub mppt_v_min: f64,
    /// Upper bound of the MPPT operating window (V).
    pub mppt_v_max: f64,
    /// Maximum DC input current per MPPT input (A).
    pub idc_max_per_mppt_a: f64,
    /// DC to AC conversion efficiency, in (0, 1].
    pub efficiency: f64,
    /// Number of independent MPPT inputs (1 to 3).
    pub mppt_count: u32,
}

impl Default for InverterSpec {
    fn default() -> Self {
        Self {
            rated_ac_w: 5000.0,
            vdc_max_v: 1000.0,
            mppt_v_min: 200.0,
            mppt_v_max: 850.0,
            idc_max_per_mppt_a: 15.0,
            efficiency: 0.97,
            mppt_count: 2,
        }
    }
}

impl InverterSpec {
    /// Returns every invalid field, in declaration order.
    pub fn problems(&self) -> Vec<SizingError> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "rated_ac_w", self.rated_ac_w);
        require_positive(&mut errors, "vdc_max_v", self.vdc_max_v);
        require_positive(&mut errors, "mppt_v_min", self.mppt_v_min);
        require_positive(&mut errors, "mppt_v_max", self.mppt_v_max);
        if self.mppt_v_min.is_finite()
            && self.mppt_v_max.is_finite()
            && self.mppt_v_min > self.mppt_v_max
        {
            errors.push(SizingError::invalid(
                "mppt_v_min",
                "must be <= mppt_v_max",
            ));
        }
        require_positive(&mut errors, "idc_max_per_mppt_a", self.idc_max_per_mppt_a);
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            errors.push(SizingError::invalid(
                "efficiency",
                format!("must be in (0.0, 1.0], got {}", self.efficiency),
            ));
        }
        if !(1..=MAX_MPPT_INPUTS).contains(&self.mppt_count) {
            errors.push(SizingError::invalid(
                "mppt_count",
                format!("must be in 1..={MAX_MPPT_INPUTS}, got {}", self.mppt_count),
            ));
        }
        errors
    }

    /// Fails with the first invalid field.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidInput`] for non-positive ratings, an inverted
    /// MPPT window, efficiency outside (0, 1] or an unsupported MPPT count.
    pub fn validate(&self) -> Result<()> {
        first_problem(self.problems())
    }
}

/// Cold-case derating parameters for open-circuit voltage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeratingParams {
    /// Lowest expected cell temperature (°C).
    pub min_cell_temp_c: f64,
    /// Voc temperature coefficient as a fraction per °C (typically negative).
    pub voc_temp_coeff: f64,
    /// Additive headroom on the corrected Voc, in percent (5.0 = 5 %).
    ///
    /// Must be finite and `>= 0`; negative values are rejected as invalid
    /// input rather than shrinking the corrected Voc.
    pub safety_margin_pct: f64,
}

impl Default for DeratingParams {
    fn default() -> Self {
        Self {
            min_cell_temp_c: -10.0,
            voc_temp_coeff: -0.003,
            safety_margin_pct: 5.0,
        }
    }
}

impl DeratingParams {
    /// Returns every invalid field, in declaration order.
    pub fn problems(&self) -> Vec<SizingError> {
        let mut errors = Vec::new();
        if !self.min_cell_temp_c.is_finite() {
            errors.push(SizingError::invalid("min_cell_temp_c", "must be finite"));
        }
        if !self.voc_temp_coeff.is_finite() {
            errors.push(SizingError::invalid("voc_temp_coeff", "must be finite"));
        }
        if !(self.safety_margin_pct.is_finite() && self.safety_margin_pct >= 0.0) {
            errors.push(SizingError::invalid(
                "safety_margin_pct",
                format!("must be >= 0, got {}", self.safety_margin_pct),
            ));
        }
        errors
    }

    /// Fails with the first invalid field.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidInput`] for non-finite values or a negative margin.
    pub fn validate(&self) -> Result<()> {
        first_problem(self.problems())
    }
}

/// String layout applied identically to every MPPT input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    /// Panels in series per string.
    pub series: u32,
    /// Parallel strings per MPPT input.
    pub parallel: u32,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            series: 10,
            parallel: 2,
        }
    }
}

impl ArrayConfig {
    /// Creates a layout of `series` panels per string and `parallel` strings per MPPT.
    pub fn new(series: u32, parallel: u32) -> Self {
        Self { series, parallel }
    }

    /// Returns every invalid field, in declaration order.
    pub fn problems(&self) -> Vec<SizingError> {
        let mut errors = Vec::new();
        if self.series == 0 {
            errors.push(SizingError::invalid("series", "must be > 0"));
        }
        if self.parallel == 0 {
            errors.push(SizingError::invalid("parallel", "must be > 0"));
        }
        errors
    }

    /// Fails with the first invalid field.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidInput`] if either count is zero.
    pub fn validate(&self) -> Result<()> {
        first_problem(self.problems())
    }
}

fn require_positive(errors: &mut Vec<SizingError>, field: &str, value: f64) {
    // NaN fails the comparison as well
    if !(value.is_finite() && value > 0.0) {
        errors.push(SizingError::invalid(field, format!("must be > 0, got {value}")));
    }
}

fn first_problem(problems: Vec<SizingError>) -> Result<()> {
    match problems.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
