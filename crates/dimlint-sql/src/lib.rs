//! SQL structure extraction
//!
//! This crate handles:
//! - Extracting `ref()` cross-references from dbt SQL
//! - Extracting projected column names from the final select
//!
//! Both are heuristic regex scans; see [`scan`] for the known limits.

pub mod scan;

pub use scan::{StructuralScan, FINAL_PROJECTION_MARKER};
