//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::autonomy::{self, BatterySpec};
use crate::error::SizingError;
use crate::sizing::{ArrayConfig, DeratingParams, InverterSpec, PanelSpec};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the reference scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::reference`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Panel datasheet ratings.
    #[serde(default)]
    pub panel: PanelSpec,
    /// Inverter limits.
    #[serde(default)]
    pub inverter: InverterSpec,
    /// Cold-case Voc derating.
    #[serde(default)]
    pub derating: DeratingParams,
    /// String layout per MPPT input.
    #[serde(default)]
    pub array: ArrayConfig,
    /// Battery autonomy matrix inputs.
    #[serde(default)]
    pub autonomy: AutonomyConfig,
}

/// Battery autonomy inputs.
///
/// Labels and capacities are separate lists and must have equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutonomyConfig {
    /// Battery labels.
    pub battery_names: Vec<String>,
    /// Battery capacities (kWh), aligned with `battery_names`.
    pub battery_capacities_kwh: Vec<f64>,
    /// Depth of discharge (0.0–1.0).
    pub dod: f64,
    /// Candidate constant loads (W).
    pub loads_w: Vec<f64>,
}

impl Default for AutonomyConfig {
    fn default() -> Self {
        Self {
            battery_names: vec!["LFP 5 kWh".into(), "LFP 10 kWh".into(), "LFP 15 kWh".into()],
            battery_capacities_kwh: vec![5.0, 10.0, 15.0],
            dod: 0.8,
            loads_w: vec![200.0, 400.0, 800.0, 1500.0],
        }
    }
}

impl AutonomyConfig {
    /// Pairs labels with capacities.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::BatteryListMismatch`] if the lists differ in length.
    pub fn batteries(&self) -> Result<Vec<BatterySpec>, SizingError> {
        autonomy::pair_batteries(&self.battery_names, &self.battery_capacities_kwh)
    }

    /// Every problem with this section, named by its TOML keys.
    ///
    /// A length mismatch is reported first; the entries that do pair up are
    /// still checked.
    pub fn problems(&self) -> Vec<SizingError> {
        let mut errors = Vec::new();
        if let Err(e) = self.batteries() {
            errors.push(e);
        }
        let paired: Vec<BatterySpec> = self
            .battery_names
            .iter()
            .zip(&self.battery_capacities_kwh)
            .map(|(name, &cap)| BatterySpec::new(name.clone(), cap))
            .collect();
        errors.extend(
            autonomy::input_problems(&paired, self.dod, &self.loads_w)
                .into_iter()
                .map(|e| match e {
                    SizingError::InvalidInput { field, reason } => {
                        let field = match field.as_str() {
                            "capacity_kwh" => "battery_capacities_kwh",
                            "name" => "battery_names",
                            other => other,
                        }
                        .to_string();
                        SizingError::InvalidInput { field, reason }
                    }
                    other => other,
                }),
        );
        errors
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"inverter.mppt_count"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn from_sizing(section: &str, err: &SizingError) -> Self {
        let field = match err {
            SizingError::BatteryListMismatch { .. } => format!("{section}.battery_names"),
            other => match other.field() {
                Some(f) => format!("{section}.{f}"),
                None => section.to_string(),
            },
        };
        Self {
            field,
            message: err.to_string(),
        }
    }
}

impl ScenarioConfig {
    /// Reference scenario: 410 W panels, 10 × 2 on a 5 kW two-MPPT inverter.
    pub fn reference() -> Self {
        Self {
            panel: PanelSpec::default(),
            inverter: InverterSpec::default(),
            derating: DeratingParams::default(),
            array: ArrayConfig::default(),
            autonomy: AutonomyConfig::default(),
        }
    }

    /// 10 kW three-MPPT inverter with one 8-panel string per input.
    pub fn residential_3mppt() -> Self {
        Self {
            panel: PanelSpec {
                pmax_w: 450.0,
                vmp_v: 41.5,
                imp_a: 10.85,
                voc_v: 49.6,
                isc_a: 11.6,
            },
            inverter: InverterSpec {
                rated_ac_w: 10_000.0,
                idc_max_per_mppt_a: 16.0,
                mppt_count: 3,
                ..InverterSpec::default()
            },
            derating: DeratingParams {
                min_cell_temp_c: -20.0,
                voc_temp_coeff: -0.0027,
                ..DeratingParams::default()
            },
            array: ArrayConfig::new(8, 1),
            autonomy: AutonomyConfig {
                battery_names: vec!["LFP 10 kWh".into(), "LFP 20 kWh".into()],
                battery_capacities_kwh: vec![10.0, 20.0],
                dod: 0.9,
                loads_w: vec![500.0, 1000.0, 2000.0],
            },
        }
    }

    /// Small array on an 8 kW inverter, well below a 1.0 DC/AC ratio.
    pub fn undersized() -> Self {
        Self {
            inverter: InverterSpec {
                rated_ac_w: 8000.0,
                ..InverterSpec::default()
            },
            array: ArrayConfig::new(8, 1),
            ..Self::reference()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "residential_3mppt", "undersized"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::reference()),
            "residential_3mppt" => Ok(Self::residential_3mppt()),
            "undersized" => Ok(Self::undersized()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all sections and returns every problem found.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let sections = [
            ("panel", self.panel.problems()),
            ("inverter", self.inverter.problems()),
            ("derating", self.derating.problems()),
            ("array", self.array.problems()),
            ("autonomy", self.autonomy.problems()),
        ];
        for (section, problems) in &sections {
            errors.extend(problems.iter().map(|e| ConfigError::from_sizing(section, e)));
        }

        errors
    }
}
