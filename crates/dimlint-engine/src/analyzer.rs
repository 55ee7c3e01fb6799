//! Model analysis
//!
//! [`analyze`] turns an extracted model into a report without any I/O.
//! [`ModelAnalyzer`] owns the catalog and drives extract-then-analyze by name.

use crate::compliance::ComplianceRules;
use crate::extractor::{ExtractError, ModelExtractor};
use dimlint_core::{AnalysisOutcome, ColumnReport, Config, Model, ModelReport, Structure};
use dimlint_dbt::{Catalog, ModelRegistry, RegistryError};
use std::path::Path;

/// Build the report for an already-extracted model
///
/// An unextracted model is reported as having no columns and no references.
pub fn analyze(model: &Model) -> ModelReport {
    let mut structure = Structure::default();
    let mut columns = Vec::with_capacity(model.columns_or_empty().len());

    for column in model.columns_or_empty() {
        let category = column.category();
        structure.push(category, column.name.clone());
        columns.push(ColumnReport {
            name: column.name.clone(),
            category,
            data_type: column.data_type.clone(),
            description: column.description.clone(),
            tests: column.tests.clone(),
        });
    }

    let references: Vec<String> = model
        .references
        .as_ref()
        .map(|refs| refs.iter().cloned().collect())
        .unwrap_or_default();

    ModelReport {
        name: model.name.clone(),
        role: model.role,
        column_count: columns.len(),
        reference_count: references.len(),
        references,
        description: model.description.clone(),
        columns,
        structure,
        compliance: ComplianceRules::check(model),
    }
}

/// Analyzes models from a discovered catalog
pub struct ModelAnalyzer {
    catalog: Catalog,
}

impl ModelAnalyzer {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Discover models under `<project_root>/models`
    pub fn discover(project_root: &Path, descriptor_file: &str) -> Result<Self, RegistryError> {
        let catalog = ModelRegistry::discover(project_root, descriptor_file)?;
        tracing::debug!(models = catalog.len(), root = %project_root.display(), "catalog built");
        Ok(Self::new(catalog))
    }

    /// Discover models using the project root and descriptor name from config
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        Self::discover(&config.project_root, &config.descriptor_file)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Extract and analyze one model by name
    ///
    /// Unknown names yield [`AnalysisOutcome::NotFound`] without touching the
    /// filesystem. IO and parse failures abort this model only.
    pub fn analyze_model(&mut self, name: &str) -> Result<AnalysisOutcome, ExtractError> {
        let Some(model) = self.catalog.get_mut(name) else {
            tracing::debug!(model = %name, "model not in catalog");
            return Ok(AnalysisOutcome::not_found(name));
        };

        ModelExtractor::extract(model)?;
        Ok(AnalysisOutcome::Report(analyze(model)))
    }
}
