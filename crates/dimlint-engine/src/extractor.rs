//! Structural extraction for a registered model
//!
//! Reads the model's SQL, runs the structural scan, and merges metadata from
//! the sibling descriptor. Every read and parse happens before the model is
//! touched, so a failure leaves it exactly as it was.

use dimlint_core::{Column, Model};
use dimlint_dbt::{Descriptor, DescriptorError};
use dimlint_sql::StructuralScan;

/// Populates columns, references and declared metadata on a model
pub struct ModelExtractor;

impl ModelExtractor {
    /// Extract a model in place
    ///
    /// Idempotent: columns, references and model metadata are replaced, never
    /// appended. Metadata the descriptor no longer declares is cleared.
    pub fn extract(model: &mut Model) -> Result<(), ExtractError> {
        let sql = std::fs::read_to_string(&model.sql_path)
            .map_err(|e| ExtractError::IoError(model.sql_path.display().to_string(), e.to_string()))?;

        let descriptor = match &model.yaml_path {
            Some(path) => Some(Descriptor::from_file(path)?),
            None => None,
        };

        let references = StructuralScan::references(&sql);
        let columns: Vec<Column> = StructuralScan::columns(&sql)
            .into_iter()
            .map(Column::new)
            .collect();

        tracing::debug!(
            model = %model.name,
            columns = columns.len(),
            references = references.len(),
            "extracted model structure"
        );

        model.references = Some(references);
        model.columns = Some(columns);
        model.description = String::new();
        model.tests = Vec::new();

        if let Some(descriptor) = descriptor {
            if !descriptor.merge_into(model) {
                tracing::debug!(model = %model.name, "model not declared in descriptor");
            }
        }

        Ok(())
    }
}

/// Extraction errors. Each aborts the analysis of one model only.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to read {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse descriptor {0}: {1}")]
    ParseError(String, String),
}

impl From<DescriptorError> for ExtractError {
    fn from(err: DescriptorError) -> Self {
        match err {
            DescriptorError::IoError(path, message) => Self::IoError(path, message),
            DescriptorError::ParseError(path, message) => Self::ParseError(path, message),
        }
    }
}
