//! Report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{Compliance, Verdict};
use crate::schema::{ColumnCategory, ModelRole, TestEntry};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Per-column entry in a model report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub name: String,
    pub category: ColumnCategory,
    pub data_type: String,
    pub description: String,
    pub tests: Vec<TestEntry>,
}

impl ColumnReport {
    /// Names of the column's tests, skipping entries without one
    pub fn test_names(&self) -> Vec<&str> {
        self.tests.iter().filter_map(TestEntry::name).collect()
    }
}

/// Column names grouped by category, each in extraction order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Structure {
    pub key_columns: Vec<String>,
    pub measure_columns: Vec<String>,
    pub timestamp_columns: Vec<String>,
    pub attribute_columns: Vec<String>,
}

impl Structure {
    /// Append a column name to the group for its category
    pub fn push(&mut self, category: ColumnCategory, name: impl Into<String>) {
        let group = match category {
            ColumnCategory::Key => &mut self.key_columns,
            ColumnCategory::Measure => &mut self.measure_columns,
            ColumnCategory::Timestamp => &mut self.timestamp_columns,
            ColumnCategory::Attribute => &mut self.attribute_columns,
        };
        group.push(name.into());
    }

    /// Groups as (label, columns) pairs in display order
    pub fn groups(&self) -> [(&'static str, &[String]); 4] {
        [
            ("key_columns", self.key_columns.as_slice()),
            ("measure_columns", self.measure_columns.as_slice()),
            ("timestamp_columns", self.timestamp_columns.as_slice()),
            ("attribute_columns", self.attribute_columns.as_slice()),
        ]
    }
}

/// Analysis report for a single model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    pub name: String,

    #[serde(rename = "type")]
    pub role: ModelRole,

    pub column_count: usize,

    pub reference_count: usize,

    /// Referenced model names, sorted
    pub references: Vec<String>,

    pub description: String,

    /// Per-column breakdown in extraction order
    pub columns: Vec<ColumnReport>,

    pub structure: Structure,

    pub compliance: Compliance,
}

/// Outcome of asking for one model by name
///
/// Unknown names are a structured result, not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Report(ModelReport),
    NotFound { error: String },
}

impl AnalysisOutcome {
    pub fn not_found(model_name: &str) -> Self {
        Self::NotFound {
            error: format!("model {} not found", model_name),
        }
    }

    pub fn report(&self) -> Option<&ModelReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NotFound { .. } => None,
        }
    }
}

/// A model whose analysis aborted with an IO or parse error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedModel {
    pub name: String,
    pub message: String,
}

/// Summary statistics for a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Models that produced a report
    pub models_analyzed: usize,

    /// Reports with verdict `compliant`
    pub compliant: usize,

    /// Reports with verdict `warnings`
    pub with_warnings: usize,

    /// Total warnings across all reports
    pub total_warnings: usize,

    /// Requested names absent from the catalog
    pub not_found: usize,

    /// Models that failed with IO or parse errors
    pub failed: usize,
}

/// Run report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: RunSummary,

    /// One outcome per requested model that did not fail
    pub results: Vec<AnalysisOutcome>,

    /// Models that failed
    pub failures: Vec<FailedModel>,
}

impl RunReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: RunSummary::default(),
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Add an outcome to the report
    pub fn add_outcome(&mut self, outcome: AnalysisOutcome) {
        match &outcome {
            AnalysisOutcome::Report(report) => {
                self.summary.models_analyzed += 1;
                self.summary.total_warnings += report.compliance.warnings.len();
                match report.compliance.status {
                    Verdict::Compliant => self.summary.compliant += 1,
                    Verdict::Warnings => self.summary.with_warnings += 1,
                }
            }
            AnalysisOutcome::NotFound { .. } => self.summary.not_found += 1,
        }

        self.results.push(outcome);
    }

    /// Record a failed model
    pub fn add_failure(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.summary.failed += 1;
        self.failures.push(FailedModel {
            name: name.into(),
            message: message.into(),
        });
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.summary.with_warnings > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
