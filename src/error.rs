//! Input errors raised by the sizing core and the autonomy estimator.

use thiserror::Error;

/// Rejected input. Sizing and autonomy calls fail with one of these before
/// any computation is done for the affected entity.
///
/// Compliance problems are not errors; they are reported through
/// [`crate::sizing::compliance::ComplianceReport`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    /// A rating, count or parameter is outside its valid domain.
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        /// Field name within its parameter struct (e.g. `"vdc_max"`).
        field: String,
        /// Constraint that was violated.
        reason: String,
    },

    /// A candidate load is zero, negative, or not a finite number.
    #[error("invalid input: load must be > 0 W, got {watts}")]
    NonPositiveLoad {
        /// Offending load in watts.
        watts: f64,
    },

    /// Depth of discharge outside `[0, 1]`.
    #[error("invalid input: depth of discharge must be in [0.0, 1.0], got {dod}")]
    DodOutOfRange {
        /// Offending DOD fraction.
        dod: f64,
    },

    /// Battery labels and capacities were supplied as lists of different length.
    #[error("invalid input: {names} battery names but {capacities} capacities")]
    BatteryListMismatch {
        /// Number of labels supplied.
        names: usize,
        /// Number of capacities supplied.
        capacities: usize,
    },
}

impl SizingError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Field name the error refers to, if it concerns a single named field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field.as_str()),
            Self::NonPositiveLoad { .. } => Some("loads_w"),
            Self::DodOutOfRange { .. } => Some("dod"),
            Self::BatteryListMismatch { .. } => None,
        }
    }
}

/// Convenience alias used across the core.
pub type Result<T> = std::result::Result<T, SizingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_message_names_field() {
        let e = SizingError::invalid("vdc_max", "must be > 0");
        assert_eq!(e.to_string(), "invalid input: vdc_max must be > 0");
        assert_eq!(e.field(), Some("vdc_max"));
    }

    #[test]
    fn mismatch_has_no_single_field() {
        let e = SizingError::BatteryListMismatch {
            names: 3,
            capacities: 2,
        };
        assert!(e.field().is_none());
        assert!(e.to_string().contains("3 battery names but 2 capacities"));
    }
}
