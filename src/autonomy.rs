//! Battery autonomy (runtime hours) for a battery × load matrix.
//!
//! Independent of the sizing core; shares no state with it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SizingError};

/// A labeled battery bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatterySpec {
    /// Display label, unique within one estimate.
    pub name: String,
    /// Nominal capacity (kWh).
    pub capacity_kwh: f64,
}

impl BatterySpec {
    /// Creates a labeled battery of `capacity_kwh`.
    pub fn new(name: impl Into<String>, capacity_kwh: f64) -> Self {
        Self {
            name: name.into(),
            capacity_kwh,
        }
    }
}

/// Pairs parallel label and capacity lists.
///
/// # Errors
///
/// Returns [`SizingError::BatteryListMismatch`] when the lists differ in
/// length. Entries are never dropped silently.
pub fn pair_batteries(names: &[String], capacities_kwh: &[f64]) -> Result<Vec<BatterySpec>> {
    if names.len() != capacities_kwh.len() {
        return Err(SizingError::BatteryListMismatch {
            names: names.len(),
            capacities: capacities_kwh.len(),
        });
    }
    Ok(names
        .iter()
        .zip(capacities_kwh)
        .map(|(name, &cap)| BatterySpec::new(name.clone(), cap))
        .collect())
}

/// Runtime in hours of `capacity_kwh` drained to `dod` by a constant `load_w`.
pub fn runtime_hours(capacity_kwh: f64, dod: f64, load_w: f64) -> f64 {
    capacity_kwh * 1000.0 * dod / load_w
}

/// Runtime hours, one row per battery and one column per load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutonomyTable {
    /// Depth of discharge used for every cell.
    pub dod: f64,
    /// Row labels, in input order.
    pub batteries: Vec<String>,
    /// Column loads (W), in input order.
    pub loads_w: Vec<f64>,
    /// `hours[row][col]`.
    pub hours: Vec<Vec<f64>>,
}

impl AutonomyTable {
    /// Looks up the runtime of `battery` under `load_w`.
    pub fn hours(&self, battery: &str, load_w: f64) -> Option<f64> {
        let row = self.batteries.iter().position(|b| b == battery)?;
        let col = self.loads_w.iter().position(|&l| l == load_w)?;
        self.hours.get(row)?.get(col).copied()
    }

    /// Iterates `(battery, hours per load)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.batteries
            .iter()
            .map(String::as_str)
            .zip(self.hours.iter().map(Vec::as_slice))
    }
}

impl fmt::Display for AutonomyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .batteries
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("Battery".len());

        writeln!(f, "--- Autonomy (h) at DOD {:.0}% ---", self.dod * 100.0)?;
        write!(f, "{:<width$}", "Battery")?;
        for load in &self.loads_w {
            write!(f, " | {:>8}", format!("{load:.0} W"))?;
        }
        for (name, row) in self.rows() {
            writeln!(f)?;
            write!(f, "{name:<width$}")?;
            for h in row {
                write!(f, " | {h:>8.2}")?;
            }
        }
        Ok(())
    }
}

/// Returns every problem with a set of autonomy inputs.
///
/// Order: DOD, then each invalid load, then each battery with a non-positive
/// capacity or a repeated label, in input order.
pub fn input_problems(batteries: &[BatterySpec], dod: f64, loads_w: &[f64]) -> Vec<SizingError> {
    let mut errors = Vec::new();
    if !(0.0..=1.0).contains(&dod) {
        errors.push(SizingError::DodOutOfRange { dod });
    }
    errors.extend(
        loads_w
            .iter()
            .filter(|&&w| !(w.is_finite() && w > 0.0))
            .map(|&watts| SizingError::NonPositiveLoad { watts }),
    );

    let mut seen = HashSet::new();
    for b in batteries {
        if !(b.capacity_kwh.is_finite() && b.capacity_kwh > 0.0) {
            errors.push(SizingError::invalid(
                "capacity_kwh",
                format!("must be > 0 for \"{}\", got {}", b.name, b.capacity_kwh),
            ));
        }
        if !seen.insert(b.name.as_str()) {
            errors.push(SizingError::invalid(
                "name",
                format!("duplicate battery \"{}\"", b.name),
            ));
        }
    }
    errors
}

/// Computes the runtime table for every battery under every load.
///
/// # Errors
///
/// Fails without computing anything if `dod` is outside `[0, 1]`, any load
/// is not strictly positive, any capacity is not strictly positive, or a
/// battery label repeats.
///
/// # Examples
///
/// ```
/// use pv_sizer::autonomy::{BatterySpec, estimate};
///
/// let table = estimate(&[BatterySpec::new("LFP 10", 10.0)], 0.8, &[400.0]).unwrap();
/// assert_eq!(table.hours("LFP 10", 400.0), Some(20.0));
/// ```
pub fn estimate(batteries: &[BatterySpec], dod: f64, loads_w: &[f64]) -> Result<AutonomyTable> {
    if let Some(e) = input_problems(batteries, dod, loads_w).into_iter().next() {
        return Err(e);
    }

    let hours = batteries
        .iter()
        .map(|b| {
            loads_w
                .iter()
                .map(|&load| runtime_hours(b.capacity_kwh, dod, load))
                .collect()
        })
        .collect();

    Ok(AutonomyTable {
        dod,
        batteries: batteries.iter().map(|b| b.name.clone()).collect(),
        loads_w: loads_w.to_vec(),
        hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> Vec<BatterySpec> {
        vec![BatterySpec::new("5 kWh", 5.0), BatterySpec::new("10 kWh", 10.0)]
    }

    #[test]
    fn reference_cell() {
        assert_eq!(runtime_hours(10.0, 0.8, 400.0), 20.0);
    }

    #[test]
    fn table_shape_follows_input_order() {
        let table = estimate(&bank(), 0.8, &[200.0, 400.0, 800.0]).unwrap();
        assert_eq!(table.batteries, vec!["5 kWh", "10 kWh"]);
        assert_eq!(table.hours.len(), 2);
        assert!(table.hours.iter().all(|row| row.len() == 3));
        assert_eq!(table.hours("10 kWh", 400.0), Some(20.0));
        assert_eq!(table.hours("5 kWh", 200.0), Some(20.0));
        assert_eq!(table.hours("5 kWh", 800.0), Some(5.0));
    }

    #[test]
    fn zero_load_rejected() {
        let err = estimate(&bank(), 0.8, &[400.0, 0.0]).unwrap_err();
        assert_eq!(err, SizingError::NonPositiveLoad { watts: 0.0 });
    }

    #[test]
    fn negative_load_rejected() {
        assert!(estimate(&bank(), 0.8, &[-100.0]).is_err());
    }

    #[test]
    fn dod_bounds() {
        assert!(estimate(&bank(), 0.0, &[400.0]).is_ok());
        assert!(estimate(&bank(), 1.0, &[400.0]).is_ok());
        assert_eq!(
            estimate(&bank(), 1.2, &[400.0]).unwrap_err(),
            SizingError::DodOutOfRange { dod: 1.2 }
        );
        assert!(estimate(&bank(), f64::NAN, &[400.0]).is_err());
    }

    #[test]
    fn duplicate_label_rejected() {
        let batteries = vec![BatterySpec::new("A", 5.0), BatterySpec::new("A", 10.0)];
        assert!(estimate(&batteries, 0.8, &[400.0]).is_err());
    }

    #[test]
    fn non_positive_capacity_rejected() {
        let batteries = vec![BatterySpec::new("empty", 0.0)];
        let err = estimate(&batteries, 0.8, &[400.0]).unwrap_err();
        assert_eq!(err.field(), Some("capacity_kwh"));
    }

    #[test]
    fn mismatched_lists_rejected() {
        let names = vec!["A".to_string(), "B".to_string()];
        let err = pair_batteries(&names, &[5.0]).unwrap_err();
        assert_eq!(
            err,
            SizingError::BatteryListMismatch {
                names: 2,
                capacities: 1
            }
        );
    }

    #[test]
    fn matched_lists_pair_in_order() {
        let names = vec!["A".to_string(), "B".to_string()];
        let paired = pair_batteries(&names, &[5.0, 10.0]).unwrap();
        assert_eq!(paired, vec![BatterySpec::new("A", 5.0), BatterySpec::new("B", 10.0)]);
    }

    #[test]
    fn input_problems_reports_every_invalid_input() {
        let batteries = vec![
            BatterySpec::new("A", -1.0),
            BatterySpec::new("B", 5.0),
            BatterySpec::new("B", 10.0),
        ];
        let problems = input_problems(&batteries, 1.5, &[400.0, 0.0, -3.0]);
        assert_eq!(
            problems[..3],
            [
                SizingError::DodOutOfRange { dod: 1.5 },
                SizingError::NonPositiveLoad { watts: 0.0 },
                SizingError::NonPositiveLoad { watts: -3.0 },
            ]
        );
        let fields: Vec<_> = problems[3..].iter().filter_map(SizingError::field).collect();
        assert_eq!(fields, vec!["capacity_kwh", "name"]);
    }

    #[test]
    fn lookup_on_ragged_table_returns_none() {
        let table = AutonomyTable {
            dod: 0.8,
            batteries: vec!["A".into(), "B".into()],
            loads_w: vec![100.0, 200.0],
            hours: vec![vec![80.0, 40.0], vec![80.0]],
        };
        assert_eq!(table.hours("A", 200.0), Some(40.0));
        assert_eq!(table.hours("B", 200.0), None);
        assert_eq!(table.hours("C", 100.0), None);
    }

    #[test]
    fn display_has_header_and_rows() {
        let table = estimate(&bank(), 0.8, &[400.0]).unwrap();
        let text = table.to_string();
        assert!(text.contains("DOD 80%"));
        assert!(text.contains("400 W"));
        assert!(text.contains("20.00"));
    }
}
