//! Descriptor (schema.yml) parsing and metadata merge
//!
//! The document is kept as raw YAML. Only the entry matching the model being
//! merged is converted, and that conversion never fails: a field with an
//! unexpected shape falls back to its default. Content that is not valid YAML
//! is the only parse error.

use dimlint_core::{Model, TestEntry};
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;

/// A parsed descriptor document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    /// Raw `models:` entries
    entries: Vec<Value>,
}

/// Metadata declared for one model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorModel {
    pub name: String,
    pub description: String,
    pub tests: Vec<TestEntry>,
    pub columns: Vec<DescriptorColumn>,
}

/// Metadata declared for one column of a model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorColumn {
    pub name: String,
    pub description: String,
    pub tests: Vec<TestEntry>,
}

impl Descriptor {
    /// Load descriptor from file
    pub fn from_file(path: &Path) -> Result<Self, DescriptorError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DescriptorError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
            .map_err(|e| match e {
                DescriptorError::ParseError(_, message) => {
                    DescriptorError::ParseError(path.display().to_string(), message)
                }
                other => other,
            })
    }

    /// Parse descriptor from YAML string
    ///
    /// A document without a `models` sequence (empty, `models:` with no
    /// value, or not a mapping at all) declares no models.
    pub fn from_str(yaml: &str) -> Result<Self, DescriptorError> {
        let document: Value = serde_yaml::from_str(yaml)
            .map_err(|e| DescriptorError::ParseError("<string>".to_string(), e.to_string()))?;

        let entries = match untagged(&document).get("models").map(untagged) {
            Some(Value::Sequence(entries)) => entries.clone(),
            _ => Vec::new(),
        };

        Ok(Self { entries })
    }

    /// Number of raw model entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names declared by entries that have a string `name`
    pub fn model_names(&self) -> Vec<&str> {
        self.entries.iter().filter_map(entry_name).collect()
    }

    /// First entry declaring the given model name, converted leniently
    pub fn find_model(&self, name: &str) -> Option<DescriptorModel> {
        self.entries
            .iter()
            .find(|entry| entry_name(entry) == Some(name))
            .map(DescriptorModel::from_value)
    }

    /// Copy declared metadata onto an extracted model
    ///
    /// Returns `false` if the descriptor does not mention the model, in which
    /// case the model is left untouched. Declared columns that were not
    /// extracted from the SQL are ignored.
    pub fn merge_into(&self, model: &mut Model) -> bool {
        let Some(entry) = self.find_model(&model.name) else {
            return false;
        };

        let declared: HashMap<&str, &DescriptorColumn> = entry
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c))
            .collect();

        if let Some(columns) = model.columns.as_mut() {
            for column in columns.iter_mut() {
                if let Some(declared_column) = declared.get(column.name.as_str()) {
                    column.description = declared_column.description.clone();
                    column.tests = declared_column.tests.clone();
                }
            }
        }

        model.description = entry.description;
        model.tests = entry.tests;

        true
    }
}

impl DescriptorModel {
    fn from_value(entry: &Value) -> Self {
        let entry = untagged(entry);
        let columns = match entry.get("columns").map(untagged) {
            Some(Value::Sequence(items)) => items.iter().filter_map(DescriptorColumn::from_value).collect(),
            _ => Vec::new(),
        };

        Self {
            name: entry_name(entry).unwrap_or_default().to_string(),
            description: text_field(entry.get("description")),
            tests: test_entries(entry.get("tests")),
            columns,
        }
    }
}

impl DescriptorColumn {
    /// Columns without a string `name` are skipped
    fn from_value(entry: &Value) -> Option<Self> {
        let entry = untagged(entry);
        let name = entry_name(entry)?;

        Some(Self {
            name: name.to_string(),
            description: text_field(entry.get("description")),
            tests: test_entries(entry.get("tests")),
        })
    }
}

/// Strip YAML tags (`!tag value`)
fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn entry_name(entry: &Value) -> Option<&str> {
    untagged(entry).get("name").map(untagged).and_then(Value::as_str)
}

/// String form of a scalar; `None` for null, sequences and mappings
fn scalar_string(value: &Value) -> Option<String> {
    match untagged(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_field(value: Option<&Value>) -> String {
    value.and_then(scalar_string).unwrap_or_default()
}

/// A `tests` value that is not a sequence declares no tests
fn test_entries(value: Option<&Value>) -> Vec<TestEntry> {
    match value.map(untagged) {
        Some(Value::Sequence(items)) => items.iter().map(test_entry).collect(),
        _ => Vec::new(),
    }
}

fn test_entry(value: &Value) -> TestEntry {
    match to_json(value) {
        serde_json::Value::String(name) => TestEntry::Name(name),
        serde_json::Value::Object(config) => TestEntry::Config(config),
        other => TestEntry::Other(other),
    }
}

/// Convert YAML to JSON. Non-string mapping keys use their scalar or YAML text form.
fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Mapping(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, value)| (key_string(key), to_json(value)))
                .collect(),
        ),
        Value::Tagged(tagged) => to_json(&tagged.value),
    }
}

fn key_string(key: &Value) -> String {
    scalar_string(key)
        .or_else(|| serde_yaml::to_string(key).ok().map(|s| s.trim_end().to_string()))
        .unwrap_or_default()
}

/// Descriptor errors
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Failed to read descriptor file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse descriptor {0}: {1}")]
    ParseError(String, String),
}
