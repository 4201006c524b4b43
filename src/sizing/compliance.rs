//! Validation of a string layout against inverter input limits.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::string_model::StringElectricals;
use super::types::InverterSpec;

/// A single violated inverter constraint.
///
/// Variants are declared in check order; sorting a list of issues yields the
/// same order the checker emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Cold-case string Voc above the inverter's absolute DC voltage limit.
    VocExceedsVdcMax,
    /// String Vmp below the MPPT window.
    VmpBelowMpptRange,
    /// String Vmp above the MPPT window.
    VmpAboveMpptRange,
    /// Combined string current above the per-MPPT limit.
    CurrentExceedsMpptLimit,
}

impl IssueKind {
    /// Hard issues make a layout non-compliant; the rest are advisory.
    pub fn is_hard(self) -> bool {
        matches!(self, Self::VocExceedsVdcMax)
    }

    /// Stable machine-readable name, as used in CSV and JSON output.
    pub fn code(self) -> &'static str {
        match self {
            Self::VocExceedsVdcMax => "VOC_EXCEEDS_VDC_MAX",
            Self::VmpBelowMpptRange => "VMP_BELOW_MPPT_RANGE",
            Self::VmpAboveMpptRange => "VMP_ABOVE_MPPT_RANGE",
            Self::CurrentExceedsMpptLimit => "CURRENT_EXCEEDS_MPPT_LIMIT",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::VocExceedsVdcMax => "string Voc exceeds Vdc_max",
            Self::VmpBelowMpptRange => "Vmp below MPPT range",
            Self::VmpAboveMpptRange => "Vmp above MPPT range",
            Self::CurrentExceedsMpptLimit => "current exceeds MPPT limit",
        };
        f.write_str(text)
    }
}

/// Outcome of checking one MPPT input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ComplianceReport {
    /// All violated constraints, in fixed check order.
    pub violations: Vec<IssueKind>,
    /// `false` only when a hard issue is present.
    pub compliant: bool,
}

impl ComplianceReport {
    /// Issues that do not affect `compliant`.
    pub fn advisories(&self) -> impl Iterator<Item = IssueKind> + '_ {
        self.violations.iter().copied().filter(|i| !i.is_hard())
    }

    /// Whether no constraint at all was violated.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Runs all four checks; none short-circuits.
pub fn check(string_voc: f64, string_vmp: f64, string_imp: f64, inverter: &InverterSpec) -> ComplianceReport {
    let mut violations = Vec::with_capacity(4);

    if string_voc > inverter.vdc_max_v {
        violations.push(IssueKind::VocExceedsVdcMax);
    }
    if string_vmp < inverter.mppt_v_min {
        violations.push(IssueKind::VmpBelowMpptRange);
    }
    if string_vmp > inverter.mppt_v_max {
        violations.push(IssueKind::VmpAboveMpptRange);
    }
    if string_imp > inverter.idc_max_per_mppt_a {
        violations.push(IssueKind::CurrentExceedsMpptLimit);
    }

    let compliant = !violations.iter().any(|i| i.is_hard());
    ComplianceReport {
        violations,
        compliant,
    }
}

/// [`check`] applied to computed string electricals.
pub fn check_strings(strings: &StringElectricals, inverter: &InverterSpec) -> ComplianceReport {
    check(strings.string_voc, strings.string_vmp, strings.string_imp, inverter)
}
