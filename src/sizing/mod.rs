//! PV string sizing against inverter MPPT limits.
//!
//! Pipeline per MPPT input: [`derating`] → [`string_model`] → [`compliance`],
//! aggregated by [`sizer`].

/// Cold-case open-circuit voltage correction.
pub mod derating;
pub mod compliance;
pub mod sizer;
pub mod string_model;
pub mod types;

pub use compliance::{ComplianceReport, IssueKind};
pub use sizer::{
    ArraySummary, MpptResult, RatioClass, SizingReport, recommend_parallel_strings, size_array,
};
pub use string_model::StringElectricals;
pub use types::{ArrayConfig, DeratingParams, InverterSpec, PanelSpec};
