//! Per-MPPT sizing and system-level DC/AC summary.

use std::fmt;

use serde::Serialize;

use super::compliance::{self, IssueKind};
use super::derating::derated_panel_voc;
use super::string_model::StringElectricals;
use super::types::{ArrayConfig, DeratingParams, InverterSpec, PanelSpec};
use crate::error::Result;

/// DC/AC ratio above which the array is considered oversized.
pub const OVERSIZED_RATIO: f64 = 1.3;
/// DC/AC ratio below which the inverter is considered underutilized.
pub const UNDERSIZED_RATIO: f64 = 1.0;
/// DC/AC ratio targeted by [`recommend_parallel_strings`].
pub const TARGET_RATIO: f64 = 1.2;

/// Electrical result for one MPPT input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MpptResult {
    /// 1-based MPPT input index.
    pub mppt: u32,
    /// Worst-case string open-circuit voltage (V).
    pub string_voc: f64,
    /// String voltage at maximum power (V).
    pub string_vmp: f64,
    /// Combined parallel-string current at maximum power (A).
    pub string_imp: f64,
    /// Combined parallel-string short-circuit current (A), informational.
    pub string_isc: f64,
    /// DC power at STC on this input (W).
    pub dc_power: f64,
    /// Violated constraints in check order; empty when fully within limits.
    pub issues: Vec<IssueKind>,
    /// `false` only on a hard violation.
    pub compliant: bool,
}

impl MpptResult {
    /// Display label, e.g. `"MPPT 1"`.
    pub fn label(&self) -> String {
        format!("MPPT {}", self.mppt)
    }
}

impl fmt::Display for MpptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Voc={:.2} V | Vmp={:.2} V | Imp={:.2} A | P={:.0} W | ",
            self.label(),
            self.string_voc,
            self.string_vmp,
            self.string_imp,
            self.dc_power
        )?;
        if self.issues.is_empty() {
            f.write_str("OK")
        } else {
            let text: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
            f.write_str(&text.join("; "))
        }
    }
}

/// Advisory classification of the DC/AC ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioClass {
    /// Ratio below 1.0.
    Undersized,
    /// Ratio in `[1.0, 1.3]`.
    Optimal,
    /// Ratio above 1.3.
    Oversized,
}

impl RatioClass {
    /// Classifies a DC/AC ratio.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > OVERSIZED_RATIO {
            Self::Oversized
        } else if ratio < UNDERSIZED_RATIO {
            Self::Undersized
        } else {
            Self::Optimal
        }
    }
}

impl fmt::Display for RatioClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Undersized => "undersized, inverter underutilized",
            Self::Optimal => "optimal",
            Self::Oversized => "oversized, clipping risk",
        })
    }
}

/// System totals derived from the MPPT results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArraySummary {
    /// Panels across all MPPT inputs. Wide enough for any valid layout.
    pub total_panels: u128,
    /// Sum of per-MPPT DC power (W).
    pub total_dc_power: f64,
    /// `total_dc_power * efficiency` (W).
    pub estimated_ac_power: f64,
    /// `total_dc_power / rated_ac_w`.
    pub dc_ac_ratio: f64,
    /// Classification of `dc_ac_ratio`.
    pub ratio_class: RatioClass,
    /// Whether every MPPT input is free of hard violations.
    pub compliant: bool,
}

impl ArraySummary {
    /// Total DC power in kW.
    pub fn total_dc_kw(&self) -> f64 {
        self.total_dc_power / 1000.0
    }

    /// Estimated AC power in kW.
    pub fn estimated_ac_kw(&self) -> f64 {
        self.estimated_ac_power / 1000.0
    }
}

impl fmt::Display for ArraySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- System Summary ---")?;
        writeln!(f, "Total panels:      {}", self.total_panels)?;
        writeln!(f, "Total DC power:    {:.2} kW", self.total_dc_kw())?;
        writeln!(f, "Estimated AC:      {:.2} kW", self.estimated_ac_kw())?;
        writeln!(f, "DC/AC ratio:       {:.2} ({})", self.dc_ac_ratio, self.ratio_class)?;
        write!(
            f,
            "Voltage limits:    {}",
            if self.compliant { "OK" } else { "EXCEEDED" }
        )
    }
}

/// Complete output of one sizing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingReport {
    /// One entry per MPPT input, ordered by index.
    pub mppts: Vec<MpptResult>,
    /// Aggregated totals.
    pub summary: ArraySummary,
}

/// Sizes the same string layout on every MPPT input of `inverter`.
///
/// Inputs are validated up front; nothing is computed for an invalid set.
///
/// # Errors
///
/// Returns [`crate::SizingError::InvalidInput`] for the first invalid field
/// across panel, inverter, derating and layout, checked in that order.
///
/// # Examples
///
/// ```
/// use pv_sizer::sizing::{ArrayConfig, DeratingParams, InverterSpec, PanelSpec, RatioClass, size_array};
///
/// let report = size_array(
///     &PanelSpec::default(),
///     &InverterSpec::default(),
///     &DeratingParams::default(),
///     &ArrayConfig::new(10, 2),
/// )
/// .unwrap();
/// assert_eq!(report.mppts.len(), 2);
/// assert_eq!(report.summary.total_dc_power, 16_400.0);
/// assert_eq!(report.summary.ratio_class, RatioClass::Oversized);
/// ```
pub fn size_array(
    panel: &PanelSpec,
    inverter: &InverterSpec,
    derating: &DeratingParams,
    config: &ArrayConfig,
) -> Result<SizingReport> {
    panel.validate()?;
    inverter.validate()?;
    derating.validate()?;
    config.validate()?;

    let mppts: Vec<MpptResult> = (1..=inverter.mppt_count)
        .map(|mppt| size_mppt(mppt, panel, inverter, derating, config))
        .collect();

    let total_dc_power: f64 = mppts.iter().map(|m| m.dc_power).sum();
    let dc_ac_ratio = total_dc_power / inverter.rated_ac_w;
    let summary = ArraySummary {
        total_panels: u128::from(config.series)
            * u128::from(config.parallel)
            * u128::from(inverter.mppt_count),
        total_dc_power,
        estimated_ac_power: total_dc_power * inverter.efficiency,
        dc_ac_ratio,
        ratio_class: RatioClass::from_ratio(dc_ac_ratio),
        compliant: mppts.iter().all(|m| m.compliant),
    };

    Ok(SizingReport { mppts, summary })
}

fn size_mppt(
    mppt: u32,
    panel: &PanelSpec,
    inverter: &InverterSpec,
    derating: &DeratingParams,
    config: &ArrayConfig,
) -> MpptResult {
    let voc_per_panel = derated_panel_voc(panel.voc_v, derating);
    let strings = StringElectricals::compute(panel, config, voc_per_panel);
    let report = compliance::check_strings(&strings, inverter);

    MpptResult {
        mppt,
        string_voc: strings.string_voc,
        string_vmp: strings.string_vmp,
        string_imp: strings.string_imp,
        string_isc: strings.string_isc,
        dc_power: strings.dc_power,
        issues: report.violations,
        compliant: report.compliant,
    }
}

/// Suggested parallel strings per MPPT to land near a 1.2 DC/AC ratio.
///
/// Advisory only; callers must not apply it without user confirmation.
/// Never returns less than 1.
pub fn recommend_parallel_strings(panel: &PanelSpec, inverter: &InverterSpec, series: u32) -> u32 {
    let per_string_set = panel.pmax_w * f64::from(series) * f64::from(inverter.mppt_count);
    let raw = (inverter.rated_ac_w * TARGET_RATIO / per_string_set).round();
    if raw.is_finite() && raw >= 1.0 {
        // saturating float-to-int cast
        raw as u32
    } else {
        1
    }
}
