//! dimlint engine
//!
//! This crate handles:
//! - Structural extraction of registered models (SQL scan + descriptor merge)
//! - Column categorization and role-specific compliance rules
//! - Building per-model reports

pub mod extractor;
pub mod compliance;
pub mod analyzer;

pub use extractor::{ExtractError, ModelExtractor};
pub use compliance::ComplianceRules;
pub use analyzer::{analyze, ModelAnalyzer};
