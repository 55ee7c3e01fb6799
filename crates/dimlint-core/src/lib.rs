//! dimlint core
//!
//! Domain model shared by the registry, extractor and analyzer.
//! Never rename warning codes - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod report;
pub mod config;

pub use diagnostic::{Compliance, ComplianceWarning, Verdict, WarningCode};
pub use schema::{Column, ColumnCategory, Model, ModelRole, TestEntry};
pub use report::{AnalysisOutcome, ColumnReport, ModelReport, ReportVersion, RunReport, Structure};
pub use config::{AllowlistRules, Config, ConfigError};
