//! File output for rendered results.

pub mod export;
