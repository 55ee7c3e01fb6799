//! Model and column types
//!
//! A [`Model`] is registered with identity fields only. Its columns and
//! references stay `None` until the model has been explicitly extracted,
//! so "not yet analyzed" is distinguishable from "analyzed, found nothing".

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Data type recorded for columns whose type has not been declared
pub const UNKNOWN_DATA_TYPE: &str = "unknown";

/// Column names treated as measures
pub const MEASURE_COLUMNS: [&str; 5] = ["amount", "quantity", "weight", "price", "cost"];

/// Column names treated as timestamps
pub const TIMESTAMP_COLUMNS: [&str; 3] = ["created_at", "updated_at", "order_date"];

/// Role of a model in a dimensional design
///
/// Derived purely from the model identifier's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    /// `fct_` prefix
    Fact,

    /// `dim_` prefix
    Dimension,

    /// `stg_` prefix
    Staging,

    /// Anything else
    Other,
}

impl ModelRole {
    /// Determine the role from a model identifier
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("fct_") {
            Self::Fact
        } else if name.starts_with("dim_") {
            Self::Dimension
        } else if name.starts_with("stg_") {
            Self::Staging
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fact => "fact",
            Self::Dimension => "dimension",
            Self::Staging => "staging",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ModelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic category of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnCategory {
    Key,
    Measure,
    Timestamp,
    Attribute,
}

impl ColumnCategory {
    /// Categorize a column by name. First match wins: key, measure, timestamp, attribute.
    pub fn of(column_name: &str) -> Self {
        if is_key_column(column_name) {
            Self::Key
        } else if MEASURE_COLUMNS.contains(&column_name) {
            Self::Measure
        } else if TIMESTAMP_COLUMNS.contains(&column_name) {
            Self::Timestamp
        } else {
            Self::Attribute
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Measure => "measure",
            Self::Timestamp => "timestamp",
            Self::Attribute => "attribute",
        }
    }
}

impl std::fmt::Display for ColumnCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn is_key_column(name: &str) -> bool {
    name.ends_with("_key") || name.ends_with("_id")
}

/// A test declared in a descriptor file
///
/// dbt accepts both bare test names (`- unique`) and configured tests
/// (`- name: positive_amount` with extra keys, or `- accepted_values: {...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestEntry {
    /// Plain test identifier
    Name(String),

    /// Key-value test configuration
    Config(serde_json::Map<String, serde_json::Value>),

    /// Anything else the descriptor happens to contain
    Other(serde_json::Value),
}

impl TestEntry {
    /// Display name of the test, if it has one
    ///
    /// Configured tests are named by their `name` field; entries without one have no name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Config(config) => config.get("name").and_then(|v| v.as_str()),
            Self::Other(_) => None,
        }
    }
}

/// One projected output column of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Declared data type (never inferred from SQL text)
    pub data_type: String,

    /// Description from the descriptor file
    pub description: String,

    /// Tests from the descriptor file
    pub tests: Vec<TestEntry>,
}

impl Column {
    /// Create a column with only its name known
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: UNKNOWN_DATA_TYPE.to_string(),
            description: String::new(),
            tests: Vec::new(),
        }
    }

    pub fn category(&self) -> ColumnCategory {
        ColumnCategory::of(&self.name)
    }
}

/// One transformation unit (a dbt model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Identifier, the SQL file name without extension
    pub name: String,

    /// Role, fixed at registration
    pub role: ModelRole,

    /// Path to the SQL transform file
    pub sql_path: PathBuf,

    /// Path to the sibling descriptor file, if one exists
    pub yaml_path: Option<PathBuf>,

    /// Projected columns (`None` until extracted)
    pub columns: Option<Vec<Column>>,

    /// Model description from the descriptor file
    pub description: String,

    /// Model-level tests from the descriptor file
    pub tests: Vec<TestEntry>,

    /// Names of models referenced via `ref()` (`None` until extracted)
    pub references: Option<BTreeSet<String>>,
}

impl Model {
    /// Register a model from its identity fields. The role is derived from the name.
    pub fn new(name: impl Into<String>, sql_path: impl Into<PathBuf>, yaml_path: Option<PathBuf>) -> Self {
        let name = name.into();
        let role = ModelRole::from_name(&name);

        Self {
            name,
            role,
            sql_path: sql_path.into(),
            yaml_path,
            columns: None,
            description: String::new(),
            tests: Vec::new(),
            references: None,
        }
    }

    /// Whether the model has been extracted at least once
    pub fn is_extracted(&self) -> bool {
        self.columns.is_some() && self.references.is_some()
    }

    /// Extracted columns, or an empty slice if not yet extracted
    pub fn columns_or_empty(&self) -> &[Column] {
        self.columns.as_deref().unwrap_or(&[])
    }

    /// Column names in extraction order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns_or_empty().iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_prefix() {
        assert_eq!(ModelRole::from_name("fct_x"), ModelRole::Fact);
        assert_eq!(ModelRole::from_name("dim_x"), ModelRole::Dimension);
        assert_eq!(ModelRole::from_name("stg_x"), ModelRole::Staging);
        assert_eq!(ModelRole::from_name("other_x"), ModelRole::Other);
        // Prefix must match exactly, including the underscore
        assert_eq!(ModelRole::from_name("fct"), ModelRole::Other);
        assert_eq!(ModelRole::from_name("dimension_x"), ModelRole::Other);
    }

    #[test]
    fn key_takes_priority_over_measure() {
        assert_eq!(ColumnCategory::of("cost_id"), ColumnCategory::Key);
        assert_eq!(ColumnCategory::of("amount_key"), ColumnCategory::Key);
        assert_eq!(ColumnCategory::of("cost"), ColumnCategory::Measure);
    }

    #[test]
    fn categories_are_exhaustive() {
        assert_eq!(ColumnCategory::of("customer_key"), ColumnCategory::Key);
        assert_eq!(ColumnCategory::of("customer_id"), ColumnCategory::Key);
        assert_eq!(ColumnCategory::of("quantity"), ColumnCategory::Measure);
        assert_eq!(ColumnCategory::of("order_date"), ColumnCategory::Timestamp);
        assert_eq!(ColumnCategory::of("updated_at"), ColumnCategory::Timestamp);
        assert_eq!(ColumnCategory::of("region"), ColumnCategory::Attribute);
        // Vocabulary matches are exact, not substring
        assert_eq!(ColumnCategory::of("total_amount"), ColumnCategory::Attribute);
        assert_eq!(ColumnCategory::of("shipped_at"), ColumnCategory::Attribute);
    }

    #[test]
    fn new_model_is_not_extracted() {
        let model = Model::new("dim_customers", "models/dim_customers.sql", None);
        assert_eq!(model.role, ModelRole::Dimension);
        assert!(model.columns.is_none());
        assert!(model.references.is_none());
        assert!(!model.is_extracted());
        assert!(model.columns_or_empty().is_empty());
    }

    #[test]
    fn new_column_has_unknown_type() {
        let column = Column::new("amount");
        assert_eq!(column.data_type, UNKNOWN_DATA_TYPE);
        assert!(column.description.is_empty());
        assert!(column.tests.is_empty());
        assert_eq!(column.category(), ColumnCategory::Measure);
    }

    #[test]
    fn test_entry_names() {
        let plain: TestEntry = serde_json::from_str(r#""unique""#).unwrap();
        assert_eq!(plain.name(), Some("unique"));

        let named: TestEntry = serde_json::from_str(r#"{"name": "positive_amount", "severity": "warn"}"#).unwrap();
        assert_eq!(named.name(), Some("positive_amount"));

        let unnamed: TestEntry = serde_json::from_str(r#"{"accepted_values": {"values": ["a"]}}"#).unwrap();
        assert!(matches!(unnamed, TestEntry::Config(_)));
        assert_eq!(unnamed.name(), None);

        let other: TestEntry = serde_json::from_str("42").unwrap();
        assert!(matches!(other, TestEntry::Other(_)));
        assert_eq!(other.name(), None);
    }
}
