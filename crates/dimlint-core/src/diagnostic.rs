//! Compliance warning codes
//!
//! IMPORTANT: Warning codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Warning code registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    // Dimension rules
    /// No column ends with `_key`
    DimMissingSurrogateKey,

    /// No column ends with `_id`
    DimMissingNaturalKey,

    /// Neither `created_at` nor `updated_at` is present
    DimMissingAuditTimestamps,

    // Fact rules
    /// No column is in the measure vocabulary
    FactNoMeasures,

    /// No `_key` column other than `<model>_key`
    FactNoForeignKeys,
}

impl WarningCode {
    /// Get the warning code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DimMissingSurrogateKey => "DIM_MISSING_SURROGATE_KEY",
            Self::DimMissingNaturalKey => "DIM_MISSING_NATURAL_KEY",
            Self::DimMissingAuditTimestamps => "DIM_MISSING_AUDIT_TIMESTAMPS",
            Self::FactNoMeasures => "FACT_NO_MEASURES",
            Self::FactNoForeignKeys => "FACT_NO_FOREIGN_KEYS",
        }
    }

    /// Human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::DimMissingSurrogateKey => "Missing surrogate key",
            Self::DimMissingNaturalKey => "Consider adding natural key",
            Self::DimMissingAuditTimestamps => "Missing audit timestamps",
            Self::FactNoMeasures => "No measures found in fact table",
            Self::FactNoForeignKeys => "No foreign keys to dimensions",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single dimensional-modeling warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    /// Stable warning code
    pub code: WarningCode,

    /// Human-readable message
    pub message: String,
}

impl ComplianceWarning {
    pub fn new(code: WarningCode) -> Self {
        Self {
            code,
            message: code.message().to_string(),
        }
    }
}

impl std::fmt::Display for ComplianceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Compliance verdict. There is no fatal verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Compliant,
    Warnings,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compliant => write!(f, "compliant"),
            Self::Warnings => write!(f, "warnings"),
        }
    }
}

/// Compliance result for one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    pub status: Verdict,
    pub warnings: Vec<ComplianceWarning>,
}

impl Compliance {
    /// Build from a warning list; empty means compliant
    pub fn from_warnings(warnings: Vec<ComplianceWarning>) -> Self {
        let status = if warnings.is_empty() {
            Verdict::Compliant
        } else {
            Verdict::Warnings
        };

        Self { status, warnings }
    }

    pub fn is_compliant(&self) -> bool {
        self.status == Verdict::Compliant
    }

    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}
